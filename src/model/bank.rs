use bevy_ecs::component::Component;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::leader::Leader;
use super::treasury::Treasury;
use crate::error::{GameError, Result};

pub const LOAN_TERMS: (i32, i32) = (5, 50);
pub const INVESTMENT_TERMS: (i32, i32) = (10, 100);
pub const MAX_POLICY_RATE_PERCENT: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub name: String,
    pub amount: i64,
    pub interest_rate: f64,
    pub term: i32,
    pub turns_remaining: i32,
    pub active: bool,
}

impl Loan {
    fn turns_elapsed(&self) -> i32 {
        self.term - self.turns_remaining
    }

    /// Principal plus the interest accrued so far.
    pub fn amount_owed(&self) -> i64 {
        let interest = self.amount as f64 * self.interest_rate * self.turns_elapsed() as f64 / 10.0;
        self.amount + interest as i64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub name: String,
    pub amount: i64,
    pub return_rate: f64,
    pub term: i32,
    pub turns_remaining: i32,
    pub active: bool,
}

impl Investment {
    pub fn expected_return(&self) -> i64 {
        (self.amount as f64 * self.return_rate * self.term as f64 / 10.0) as i64
    }
}

/// What the bank did on its own during a turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankReport {
    pub loans_closed: usize,
    pub defaults: usize,
    /// Gold paid out to the treasury by matured investments.
    pub investment_payout: i64,
}

/// The kingdom's lender of last resort.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bank {
    interest_rate: f64,
    investment_return_rate: f64,
    reserves: i64,
    loan_limit: i64,
    default_risk: i32,
    fraud_level: i32,
    loans: Vec<Loan>,
    investments: Vec<Investment>,
}

impl Default for Bank {
    fn default() -> Self {
        Self::new()
    }
}

impl Bank {
    pub fn new() -> Self {
        Self {
            interest_rate: 0.05,
            investment_return_rate: 0.03,
            reserves: 1000,
            loan_limit: 10_000,
            default_risk: 5,
            fraud_level: 0,
            loans: Vec::new(),
            investments: Vec::new(),
        }
    }

    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    pub fn set_interest_rate(&mut self, rate: f64) {
        self.interest_rate = rate.clamp(0.01, 0.5);
    }

    pub fn investment_return_rate(&self) -> f64 {
        self.investment_return_rate
    }

    pub fn set_investment_return_rate(&mut self, rate: f64) {
        self.investment_return_rate = rate.clamp(0.01, 0.3);
    }

    pub fn reserves(&self) -> i64 {
        self.reserves
    }

    pub fn set_reserves(&mut self, amount: i64) {
        self.reserves = amount.max(0);
    }

    pub fn loan_limit(&self) -> i64 {
        self.loan_limit
    }

    pub fn default_risk(&self) -> i32 {
        self.default_risk
    }

    pub fn set_default_risk(&mut self, risk: i32) {
        self.default_risk = risk.clamp(1, 100);
    }

    pub fn fraud_level(&self) -> i32 {
        self.fraud_level
    }

    pub fn set_fraud_level(&mut self, level: i32) {
        self.fraud_level = level.clamp(0, 100);
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn investments(&self) -> &[Investment] {
        &self.investments
    }

    pub fn active_loans(&self) -> impl Iterator<Item = &Loan> {
        self.loans.iter().filter(|l| l.active)
    }

    pub fn outstanding_principal(&self) -> i64 {
        self.active_loans().map(|l| l.amount).sum()
    }

    /// Everything owed right now, interest included.
    pub fn total_debt(&self) -> i64 {
        self.active_loans().map(Loan::amount_owed).sum()
    }

    /// Lend `amount` from reserves to the treasury for `term` turns.
    pub fn provide_loan(&mut self, amount: i64, term: i32, treasury: &mut Treasury) -> Result<&Loan> {
        if amount <= 0 {
            return Err(GameError::invalid("loan amount must be positive"));
        }
        if !(LOAN_TERMS.0..=LOAN_TERMS.1).contains(&term) {
            return Err(GameError::invalid(format!(
                "loan term must be {}-{} turns",
                LOAN_TERMS.0, LOAN_TERMS.1
            )));
        }
        if amount > self.reserves {
            return Err(GameError::InsufficientFunds {
                required: amount,
                available: self.reserves,
            });
        }
        if self.outstanding_principal() + amount > self.loan_limit {
            return Err(GameError::invalid(format!(
                "loan would exceed the limit of {}",
                self.loan_limit
            )));
        }

        self.loans.push(Loan {
            name: format!("Treasury Loan #{}", self.loans.len() + 1),
            amount,
            interest_rate: self.interest_rate,
            term,
            turns_remaining: term,
            active: true,
        });
        self.reserves -= amount;
        treasury.deposit(amount);
        let index = self.loans.len() - 1;
        Ok(&self.loans[index])
    }

    /// Pay down loans oldest first. Returns the gold actually paid.
    pub fn repay_loans(&mut self, amount: i64, treasury: &mut Treasury) -> Result<i64> {
        if amount <= 0 {
            return Err(GameError::invalid("repayment must be positive"));
        }
        if !treasury.can_afford(amount) {
            return Err(GameError::InsufficientFunds {
                required: amount,
                available: treasury.gold(),
            });
        }

        let mut remaining = amount;
        let mut repaid = 0;
        for loan in self.loans.iter_mut().filter(|l| l.active) {
            if remaining <= 0 {
                break;
            }
            let owed = loan.amount_owed();
            if remaining >= owed {
                remaining -= owed;
                repaid += owed;
                self.reserves += loan.amount;
                loan.amount = 0;
                loan.active = false;
            } else {
                let principal = (loan.amount as f64 * remaining as f64 / owed as f64) as i64;
                loan.amount -= principal;
                self.reserves += principal;
                repaid += remaining;
                remaining = 0;
            }
        }

        treasury.spend(repaid)?;
        Ok(repaid)
    }

    pub fn make_investment(&mut self, amount: i64, term: i32, treasury: &mut Treasury) -> Result<&Investment> {
        if amount <= 0 {
            return Err(GameError::invalid("investment must be positive"));
        }
        if !(INVESTMENT_TERMS.0..=INVESTMENT_TERMS.1).contains(&term) {
            return Err(GameError::invalid(format!(
                "investment term must be {}-{} turns",
                INVESTMENT_TERMS.0, INVESTMENT_TERMS.1
            )));
        }
        treasury.spend(amount)?;

        self.investments.push(Investment {
            name: format!("Investment #{}", self.investments.len() + 1),
            amount,
            return_rate: self.investment_return_rate,
            term,
            turns_remaining: term,
            active: true,
        });
        self.reserves += amount;
        let index = self.investments.len() - 1;
        Ok(&self.investments[index])
    }

    /// Set the policy rate in percent; investments return 70% of it.
    pub fn set_rates(&mut self, percent: f64) -> Result<()> {
        if !(0.0..=MAX_POLICY_RATE_PERCENT).contains(&percent) {
            return Err(GameError::invalid(format!(
                "interest rate must be 0-{MAX_POLICY_RATE_PERCENT}%"
            )));
        }
        self.set_interest_rate(percent / 100.0);
        self.set_investment_return_rate(self.interest_rate * 0.7);
        Ok(())
    }

    /// Drift the rate with the kingdom's stability and the bank's risk.
    /// The adjustment is in percentage points.
    pub fn adjust_interest_rate(&mut self, stability: i32, rng: &mut impl Rng) {
        let points = rng.random_range(-0.5..0.5)
            + (50 - stability) as f64 / 50.0
            + self.default_risk as f64 / 100.0;
        self.set_interest_rate(self.interest_rate + points / 100.0);
    }

    /// A corrupt ruler skims the reserves. Returns what was taken.
    pub fn handle_fraud(&mut self, ruler: &Leader, rng: &mut impl Rng) -> i64 {
        let corruption = ruler.corruption();
        if corruption <= 0 {
            return 0;
        }
        let potential = self.reserves * corruption as i64 / 1000;
        if rng.random_range(1..=100) > corruption / 2 {
            return 0;
        }
        let taken = rng.random_range(potential / 2..=potential);
        self.reserves = (self.reserves - taken).max(0);
        self.set_fraud_level(self.fraud_level + rng.random_range(1..=5));
        taken
    }

    /// Inspect the books. Returns any gold recovered.
    pub fn audit(&mut self, rng: &mut impl Rng) -> i64 {
        self.set_fraud_level(self.fraud_level - rng.random_range(10..=30));
        if self.fraud_level > 30 && rng.random_range(1..=100) <= self.fraud_level / 2 {
            let recovered = rng.random_range(100..=1000);
            self.reserves += recovered;
            self.set_fraud_level(self.fraud_level - 10);
            return recovered;
        }
        0
    }

    pub fn update(&mut self, treasury: &mut Treasury, rng: &mut impl Rng) -> BankReport {
        let mut report = BankReport::default();

        for loan in self.loans.iter_mut().filter(|l| l.active) {
            loan.turns_remaining -= 1;
            if loan.turns_remaining <= 0 {
                let earned = loan.amount as f64 * loan.interest_rate * loan.term as f64 / 100.0;
                self.reserves += earned as i64;
                loan.active = false;
                report.loans_closed += 1;
            }
        }

        let default_chance = self.default_risk / 10;
        for loan in self.loans.iter_mut().filter(|l| l.active) {
            if rng.random_range(1..=100) <= default_chance {
                loan.active = false;
                self.default_risk = (self.default_risk + 5).min(100);
                report.defaults += 1;
            }
        }

        self.set_default_risk(self.default_risk + rng.random_range(-2..=3));
        self.set_fraud_level(self.fraud_level - 1);

        for investment in self.investments.iter_mut().filter(|i| i.active) {
            investment.turns_remaining -= 1;
            if investment.turns_remaining <= 0 {
                let payout = investment.amount + investment.expected_return();
                treasury.deposit(payout);
                self.reserves = (self.reserves - investment.amount).max(0);
                investment.active = false;
                report.investment_payout += payout;
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn loan_moves_gold_from_reserves() {
        let mut bank = Bank::new();
        let mut treasury = Treasury::new(0);
        let loan = bank.provide_loan(400, 10, &mut treasury).unwrap();
        assert_eq!(loan.name, "Treasury Loan #1");
        assert_eq!(bank.reserves(), 600);
        assert_eq!(treasury.gold(), 400);
    }

    #[test]
    fn loan_validation() {
        let mut bank = Bank::new();
        let mut treasury = Treasury::new(0);
        assert!(bank.provide_loan(100, 4, &mut treasury).is_err());
        assert!(bank.provide_loan(100, 51, &mut treasury).is_err());
        assert!(bank.provide_loan(0, 10, &mut treasury).is_err());
        assert!(matches!(
            bank.provide_loan(5000, 10, &mut treasury),
            Err(GameError::InsufficientFunds { .. })
        ));
        assert!(bank.loans().is_empty());
    }

    #[test]
    fn full_repayment_closes_loan() {
        let mut bank = Bank::new();
        let mut treasury = Treasury::new(0);
        bank.provide_loan(500, 10, &mut treasury).unwrap();
        treasury.deposit(100);
        // no turns elapsed, so nothing accrued
        let paid = bank.repay_loans(600, &mut treasury).unwrap();
        assert_eq!(paid, 500);
        assert_eq!(treasury.gold(), 100);
        assert_eq!(bank.reserves(), 1000);
        assert_eq!(bank.active_loans().count(), 0);
    }

    #[test]
    fn partial_repayment_retires_principal_in_proportion() {
        let mut bank = Bank::new();
        let mut treasury = Treasury::new(0);
        bank.provide_loan(400, 10, &mut treasury).unwrap();
        let paid = bank.repay_loans(100, &mut treasury).unwrap();
        assert_eq!(paid, 100);
        assert_eq!(bank.loans()[0].amount, 300);
        assert_eq!(bank.reserves(), 700);
        assert_eq!(treasury.gold(), 300);
    }

    #[test]
    fn repayment_requires_the_gold() {
        let mut bank = Bank::new();
        let mut treasury = Treasury::new(50);
        assert!(matches!(
            bank.repay_loans(100, &mut treasury),
            Err(GameError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn interest_accrues_over_time() {
        let loan = Loan {
            name: "x".into(),
            amount: 1000,
            interest_rate: 0.05,
            term: 10,
            turns_remaining: 6,
            active: true,
        };
        // 1000 * 0.05 * 4 / 10
        assert_eq!(loan.amount_owed(), 1020);
    }

    #[test]
    fn set_rates_links_investment_return() {
        let mut bank = Bank::new();
        bank.set_rates(10.0).unwrap();
        assert!((bank.interest_rate() - 0.10).abs() < 1e-9);
        assert!((bank.investment_return_rate() - 0.07).abs() < 1e-9);
        assert!(bank.set_rates(30.0).is_err());
        bank.set_rates(0.0).unwrap();
        assert!((bank.interest_rate() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn investment_matures_into_treasury() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut bank = Bank::new();
        let mut treasury = Treasury::new(1000);
        bank.make_investment(1000, 10, &mut treasury).unwrap();
        assert_eq!(treasury.gold(), 0);
        assert_eq!(bank.reserves(), 2000);
        let mut payout = 0;
        for _ in 0..10 {
            payout += bank.update(&mut treasury, &mut rng).investment_payout;
        }
        // 1000 * 0.03 * 10 / 10 = 30
        assert_eq!(payout, 1030);
        assert_eq!(treasury.gold(), 1030);
        assert!(!bank.investments()[0].active);
    }

    #[test]
    fn investment_needs_gold_and_valid_term() {
        let mut bank = Bank::new();
        let mut treasury = Treasury::new(100);
        assert!(bank.make_investment(500, 20, &mut treasury).is_err());
        assert!(bank.make_investment(50, 5, &mut treasury).is_err());
        assert!(bank.investments().is_empty());
    }

    #[test]
    fn honest_ruler_steals_nothing() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut bank = Bank::new();
        let mut ruler = Leader::new("Aldric", "King");
        ruler.set_corruption(0);
        assert_eq!(bank.handle_fraud(&ruler, &mut rng), 0);
        assert_eq!(bank.reserves(), 1000);
    }

    #[test]
    fn audit_never_goes_negative() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut bank = Bank::new();
        bank.set_fraud_level(5);
        bank.audit(&mut rng);
        assert_eq!(bank.fraud_level(), 0);
    }

    #[test]
    fn loans_close_at_term() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut bank = Bank::new();
        bank.set_default_risk(1);
        let mut treasury = Treasury::new(0);
        bank.provide_loan(100, 5, &mut treasury).unwrap();
        let mut closed = 0;
        let mut defaults = 0;
        for _ in 0..5 {
            let report = bank.update(&mut treasury, &mut rng);
            closed += report.loans_closed;
            defaults += report.defaults;
        }
        assert_eq!(closed + defaults, 1);
        assert_eq!(bank.active_loans().count(), 0);
    }

    #[test]
    fn interest_rate_stays_in_band() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut bank = Bank::new();
        for _ in 0..500 {
            bank.adjust_interest_rate(0, &mut rng);
        }
        assert!(bank.interest_rate() <= 0.5);
        for _ in 0..500 {
            bank.adjust_interest_rate(100, &mut rng);
        }
        assert!(bank.interest_rate() >= 0.01);
    }
}
