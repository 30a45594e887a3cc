use serde::{Deserialize, Serialize};

use super::army::Army;
use super::population::Population;
use crate::error::{GameError, Result};

/// Royal coffers and the per-turn ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treasury {
    gold: i64,
    tax_income: i64,
    trade_income: i64,
    other_income: i64,
    military_expenses: i64,
    building_expenses: i64,
    other_expenses: i64,
    corruption: i32,
    inflation: f64,
}

impl Default for Treasury {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Treasury {
    pub fn new(gold: i64) -> Self {
        Self {
            gold: gold.max(0),
            tax_income: 0,
            trade_income: 0,
            other_income: 0,
            military_expenses: 0,
            building_expenses: 0,
            other_expenses: 0,
            corruption: 0,
            inflation: 0.0,
        }
    }

    /// The flat ledger a new economy opens with.
    pub fn seeded(gold: i64) -> Self {
        let mut treasury = Self::new(gold);
        treasury.other_income = 100;
        treasury.other_expenses = 80;
        treasury
    }

    pub fn gold(&self) -> i64 {
        self.gold
    }

    pub fn set_gold(&mut self, value: i64) {
        self.gold = value.max(0);
    }

    pub fn income(&self) -> i64 {
        self.tax_income + self.trade_income + self.other_income
    }

    pub fn expenses(&self) -> i64 {
        self.military_expenses + self.building_expenses + self.other_expenses
    }

    pub fn balance(&self) -> i64 {
        self.income() - self.expenses()
    }

    pub fn tax_income(&self) -> i64 {
        self.tax_income
    }

    pub fn trade_income(&self) -> i64 {
        self.trade_income
    }

    pub fn military_expenses(&self) -> i64 {
        self.military_expenses
    }

    pub fn set_tax_income(&mut self, value: i64) {
        self.tax_income = value.max(0);
    }

    pub fn set_trade_income(&mut self, value: i64) {
        self.trade_income = value.max(0);
    }

    pub fn set_other_income(&mut self, value: i64) {
        self.other_income = value.max(0);
    }

    pub fn set_military_expenses(&mut self, value: i64) {
        self.military_expenses = value.max(0);
    }

    pub fn set_building_expenses(&mut self, value: i64) {
        self.building_expenses = value.max(0);
    }

    pub fn set_other_expenses(&mut self, value: i64) {
        self.other_expenses = value.max(0);
    }

    pub fn corruption(&self) -> i32 {
        self.corruption
    }

    pub fn set_corruption(&mut self, value: i32) {
        self.corruption = value.clamp(0, 100);
    }

    pub fn inflation(&self) -> f64 {
        self.inflation
    }

    pub fn set_inflation(&mut self, value: f64) {
        self.inflation = value.clamp(0.0, 50.0);
    }

    pub fn can_afford(&self, amount: i64) -> bool {
        amount <= self.gold
    }

    /// Pay out `amount`. Non-positive amounts are a no-op.
    pub fn spend(&mut self, amount: i64) -> Result<()> {
        if amount <= 0 {
            return Ok(());
        }
        if amount > self.gold {
            return Err(GameError::InsufficientFunds {
                required: amount,
                available: self.gold,
            });
        }
        self.gold -= amount;
        Ok(())
    }

    /// Spend up to `amount`, emptying the coffers if they fall short.
    /// Returns what was actually paid.
    pub fn spend_up_to(&mut self, amount: i64) -> i64 {
        let paid = amount.clamp(0, self.gold);
        self.gold -= paid;
        paid
    }

    pub fn earn(&mut self, amount: i64) {
        if amount > 0 {
            self.gold += amount;
        }
    }

    pub fn deposit(&mut self, amount: i64) {
        self.earn(amount);
    }

    pub fn assess_tax(&mut self, population: &Population) -> i64 {
        let gross = population.tax_revenue() as i64;
        let net = gross - gross * self.corruption as i64 / 100;
        self.set_tax_income(net);
        self.tax_income
    }

    pub fn assess_trade(&mut self, trade_level: i32, resource_count: usize) -> i64 {
        let gross = trade_level as i64 * 2 + resource_count as i64 * 5;
        let net = gross * (100 - self.inflation as i64) / 100;
        self.set_trade_income(net);
        self.trade_income
    }

    pub fn assess_military(&mut self, army: &Army) -> i64 {
        let upkeep = army.maintenance_cost() as i64 * (100 + self.inflation as i64) / 100;
        self.set_military_expenses(upkeep);
        self.military_expenses
    }

    /// Book the turn's balance. Gold never drops below zero.
    pub fn apply_turn_changes(&mut self) {
        self.gold = (self.gold + self.balance()).max(0);
    }
}
