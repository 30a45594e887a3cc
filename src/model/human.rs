use serde::{Deserialize, Serialize};

use super::disease::Disease;
use super::environment::Weather;
use super::stats::clamp_pct;

/// Wellbeing shared by rulers and social classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Human {
    pub name: String,
    happiness: i32,
    health: i32,
    loyalty: i32,
}

impl Human {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            happiness: 50,
            health: 100,
            loyalty: 50,
        }
    }

    pub fn happiness(&self) -> i32 {
        self.happiness
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn loyalty(&self) -> i32 {
        self.loyalty
    }

    pub fn set_happiness(&mut self, value: i32) {
        self.happiness = clamp_pct(value);
    }

    pub fn set_health(&mut self, value: i32) {
        self.health = clamp_pct(value);
    }

    pub fn set_loyalty(&mut self, value: i32) {
        self.loyalty = clamp_pct(value);
    }

    pub fn adjust_happiness(&mut self, delta: i32) {
        self.set_happiness(self.happiness + delta);
    }

    pub fn adjust_health(&mut self, delta: i32) {
        self.set_health(self.health + delta);
    }

    pub fn adjust_loyalty(&mut self, delta: i32) {
        self.set_loyalty(self.loyalty + delta);
    }

    pub fn is_unrest_likely(&self) -> bool {
        self.happiness < 30 || self.loyalty < 25
    }

    pub fn apply_disease(&mut self, disease: &Disease) {
        let severity = disease.effect.severity();
        self.adjust_health(-2 * severity);
        self.adjust_happiness(-severity);
    }

    pub fn apply_weather(&mut self, weather: &Weather) {
        if weather.is_extreme() {
            self.adjust_happiness(-5);
        }
        self.adjust_happiness(weather.morale_effect());
    }

    /// Slow drift back toward the middle.
    pub fn update(&mut self) {
        if self.health > 20 && self.health < 100 {
            self.health += 1;
        }
        if self.happiness > 90 {
            self.happiness -= 1;
        } else if self.happiness < 10 {
            self.happiness += 1;
        }
    }
}
