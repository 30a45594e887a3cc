use bevy_ecs::component::Component;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::army::Army;
use super::court::Court;
use super::disease::Disease;
use super::economy::Economy;
use super::environment::Weather;
use super::population::Population;
use super::stats::clamp_pct;

/// Identity and overall stability of a kingdom.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KingdomCore {
    pub name: String,
    pub player: bool,
    pub turn: u32,
    stability: i32,
}

impl KingdomCore {
    pub fn new(name: impl Into<String>, player: bool) -> Self {
        Self {
            name: name.into(),
            player,
            turn: 0,
            stability: 50,
        }
    }

    pub fn stability(&self) -> i32 {
        self.stability
    }

    pub fn set_stability(&mut self, value: i32) {
        self.stability = clamp_pct(value);
    }

    /// Re-derive stability from the state of every subsystem.
    pub fn calculate_stability(&mut self, view: &KingdomView<'_>, rng: &mut impl Rng) -> i32 {
        let mut stability = self.stability;

        if view.population.has_unrest() {
            stability -= 10;
        }

        match view.court.ruler() {
            Some(ruler) => {
                stability += (ruler.leadership_score() - 50) / 10;
                stability -= ruler.corruption() / 10;
            }
            None => stability -= 15,
        }

        let gold = view.economy.treasury.gold();
        if gold < 0 {
            stability -= (gold.abs() / 100).min(15) as i32;
        }

        stability += (view.economy.market_stability() - 50) / 10;
        stability -= view.economy.corruption() / 10;

        if view.army.total_strength() > 500 && view.army.morale() > 70 {
            stability += 5;
        }
        if view.weather.is_extreme() {
            stability -= 3;
        }
        if let Some(disease) = view.disease {
            stability -= disease.severity();
        }

        stability += rng.random_range(-3..=3);
        self.set_stability(stability);
        self.stability
    }
}

/// Borrowed snapshot of one kingdom's subsystems.
#[derive(Debug, Clone, Copy)]
pub struct KingdomView<'a> {
    pub population: &'a Population,
    pub economy: &'a Economy,
    pub army: &'a Army,
    pub court: &'a Court,
    pub weather: &'a Weather,
    pub disease: Option<&'a Disease>,
}

impl KingdomView<'_> {
    /// Final tally when the game ends.
    pub fn score(&self, stability: i32, turn: u32) -> i64 {
        let population = self.population.total() as i64 / 100
            + self.population.health() as i64
            + if self.population.has_unrest() { 0 } else { 100 };

        let treasury = &self.economy.treasury;
        let wealth = treasury.gold() / 100 + if treasury.balance() > 0 { 100 } else { 0 };

        let economy = (self.economy.production_level()
            + self.economy.trade_level()
            + self.economy.market_stability()) as i64;

        let military = (self.army.total_strength() / 10 + self.army.morale()) as i64;

        let leadership = self.court.ruler().map_or(0, |r| r.leadership_score()) as i64;

        let speed_bonus = (1000 - turn as i64 * 5).max(0);

        population + wealth + economy + military + leadership + stability as i64 * 2 + speed_bonus
    }
}
