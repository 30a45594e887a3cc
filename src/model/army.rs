use bevy_ecs::component::Component;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::environment::{TerrainType, Weather, WeatherType};
use super::leader::Leader;
use super::military::{CombatStrategy, MilitaryUnit};
use super::stats::clamp_pct;
use crate::error::{GameError, Result};

// (name, count, attack, defense, speed, food per soldier)
const STARTING_UNITS: [(&str, i32, i32, i32, i32, i32); 3] = [
    ("Infantry", 100, 30, 50, 5, 10),
    ("Archers", 50, 50, 40, 3, 15),
    ("Cavalry", 80, 70, 60, 8, 25),
];

/// The kingdom's standing army.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Army {
    units: Vec<MilitaryUnit>,
    total_strength: i32,
    morale: i32,
    discipline: i32,
    training: i32,
    food_consumption: i32,
    pub strategy: CombatStrategy,
    last_battle_result: i32,
}

impl Default for Army {
    fn default() -> Self {
        Self::new()
    }
}

impl Army {
    /// An army with the three starting companies.
    pub fn new() -> Self {
        let mut army = Self::empty();
        for (name, count, attack, defense, speed, food) in STARTING_UNITS {
            army.add_unit(MilitaryUnit::new(name, count, attack, defense, speed, food));
        }
        army
    }

    pub fn empty() -> Self {
        Self {
            units: Vec::new(),
            total_strength: 0,
            morale: 70,
            discipline: 65,
            training: 50,
            food_consumption: 0,
            strategy: CombatStrategy::Balanced,
            last_battle_result: 0,
        }
    }

    pub fn units(&self) -> &[MilitaryUnit] {
        &self.units
    }

    pub fn unit(&self, index: usize) -> Result<&MilitaryUnit> {
        let len = self.units.len();
        self.units
            .get(index)
            .ok_or(GameError::out_of_range("unit", index, len))
    }

    pub fn unit_mut(&mut self, index: usize) -> Result<&mut MilitaryUnit> {
        let len = self.units.len();
        self.units
            .get_mut(index)
            .ok_or(GameError::out_of_range("unit", index, len))
    }

    pub fn add_unit(&mut self, unit: MilitaryUnit) {
        self.units.push(unit);
        self.recalculate();
    }

    pub fn remove_unit(&mut self, index: usize) -> Result<MilitaryUnit> {
        if index >= self.units.len() {
            return Err(GameError::out_of_range("unit", index, self.units.len()));
        }
        let removed = self.units.remove(index);
        self.recalculate();
        Ok(removed)
    }

    pub fn total_strength(&self) -> i32 {
        self.total_strength
    }

    pub fn morale(&self) -> i32 {
        self.morale
    }

    pub fn set_morale(&mut self, value: i32) {
        self.morale = clamp_pct(value);
    }

    pub fn discipline(&self) -> i32 {
        self.discipline
    }

    pub fn set_discipline(&mut self, value: i32) {
        self.discipline = clamp_pct(value);
    }

    pub fn training(&self) -> i32 {
        self.training
    }

    pub fn set_training(&mut self, value: i32) {
        self.training = clamp_pct(value);
    }

    pub fn food_consumption(&self) -> i32 {
        self.food_consumption
    }

    pub fn last_battle_result(&self) -> i32 {
        self.last_battle_result
    }

    fn training_factor(&self, value: i32) -> i32 {
        value * (50 + self.training / 2) / 100
    }

    pub fn attack_power(&self) -> i32 {
        let base = self.training_factor(self.total_strength * self.morale / 100);
        let power = match self.strategy {
            CombatStrategy::Aggressive => base * 130 / 100,
            CombatStrategy::Defensive => base * 80 / 100,
            CombatStrategy::Guerrilla => base * 110 / 100,
            CombatStrategy::Balanced => base,
        };
        power.max(1)
    }

    pub fn defense_power(&self) -> i32 {
        let base = self.training_factor(self.total_strength / 2 + self.morale);
        let power = match self.strategy {
            CombatStrategy::Aggressive => base * 70 / 100,
            CombatStrategy::Defensive => base * 140 / 100,
            CombatStrategy::Guerrilla => base * 120 / 100,
            CombatStrategy::Balanced => base,
        };
        power.max(1)
    }

    pub fn maintenance_cost(&self) -> i32 {
        self.units.len() as i32 * 10 + self.total_strength / 5 + self.training
    }

    /// Strength fielded on a particular day: weather, the commander and the
    /// ground all count.
    pub fn field_strength(
        &self,
        weather: &Weather,
        commander: Option<&Leader>,
        terrain: TerrainType,
        rng: &mut impl Rng,
    ) -> i32 {
        self.units
            .iter()
            .map(|u| u.field_strength(self.strategy, weather, commander, terrain, rng))
            .sum()
    }

    pub fn apply_weather(&mut self, weather: &Weather) {
        let mut change = -weather.severity();
        match weather.kind {
            WeatherType::Rainy => change -= 5,
            WeatherType::Stormy => change -= 10,
            WeatherType::Snowy => change -= 15,
            WeatherType::Drought => self.food_consumption = self.food_consumption * 120 / 100,
            WeatherType::Foggy => {}
            WeatherType::Sunny => change = 5,
        }
        self.adjust_morale(change);

        if weather.is_extreme() {
            for unit in &mut self.units {
                let losses = (unit.count() / 20).max(1);
                unit.take_casualties(losses);
            }
            self.recalculate_strength();
        }
    }

    pub fn process_battle_results(&mut self, victory: bool, casualty_pct: i32) {
        let mut remaining = self.total_strength * casualty_pct / 100;
        for unit in &mut self.units {
            if remaining <= 0 {
                break;
            }
            let mut losses = unit.count() * casualty_pct / 100;
            if losses < 1 && unit.count() > 0 {
                losses = 1;
            }
            unit.take_casualties(losses);
            remaining -= losses;
        }
        if victory {
            self.adjust_morale(10);
            self.last_battle_result = 1;
        } else {
            self.adjust_morale(-15);
            self.last_battle_result = -1;
        }
        self.recalculate_strength();
        self.recalculate_morale();
    }

    pub fn adjust_morale(&mut self, change: i32) {
        self.morale = (self.morale + change).clamp(10, 100);
        for unit in &mut self.units {
            unit.adjust_morale(change / 2);
        }
    }

    /// Shift every company's morale, leaving army-wide morale to follow.
    pub fn adjust_unit_morale(&mut self, delta: i32) {
        for unit in &mut self.units {
            unit.adjust_morale(delta);
        }
        self.recalculate_morale();
    }

    pub fn train(&mut self, rng: &mut impl Rng) {
        self.training = (self.training + rng.random_range(1..=5)).min(100);
        for unit in &mut self.units {
            unit.train(rng);
        }
        self.adjust_morale(5);
        self.recalculate_strength();
    }

    /// Train every company once without touching army-wide training.
    pub fn drill_units(&mut self, rng: &mut impl Rng) {
        for unit in &mut self.units {
            unit.train(rng);
        }
        self.recalculate_strength();
    }

    /// Raise every company's attack and defense by `pct` percent (at least
    /// one point each), then drill it.
    pub fn improve_units(&mut self, pct: i32, rng: &mut impl Rng) {
        for unit in &mut self.units {
            let attack = unit.combat.attack();
            let defense = unit.combat.defense();
            unit.combat.set_attack(attack + (attack * pct / 100).max(1));
            unit.combat.set_defense(defense + (defense * pct / 100).max(1));
            unit.train(rng);
        }
        self.recalculate();
    }

    /// Each company is lost outright with `chance` percent. Returns how many fell.
    pub fn lose_units(&mut self, chance: f64, rng: &mut impl Rng) -> usize {
        let before = self.units.len();
        self.units.retain(|_| rng.random::<f64>() * 100.0 >= chance);
        self.recalculate();
        before - self.units.len()
    }

    pub fn update(&mut self, rng: &mut impl Rng) {
        for unit in &mut self.units {
            unit.update(rng);
        }
        self.adjust_morale(1);
        self.recalculate();
    }

    pub(crate) fn recalculate(&mut self) {
        self.recalculate_strength();
        self.recalculate_morale();
        self.food_consumption = self.units.iter().map(MilitaryUnit::food_consumption).sum();
    }

    fn recalculate_strength(&mut self) {
        self.total_strength = self.units.iter().map(MilitaryUnit::combat_strength).sum();
    }

    fn recalculate_morale(&mut self) {
        self.morale = if self.units.is_empty() {
            50
        } else {
            self.units.iter().map(MilitaryUnit::morale).sum::<i32>() / self.units.len() as i32
        };
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn starting_army() {
        let army = Army::new();
        assert_eq!(army.units().len(), 3);
        // infantry 5600 + archers 3150 + cavalry 7280
        assert_eq!(army.total_strength(), 16_030);
        assert_eq!(army.morale(), 70);
        assert_eq!(army.food_consumption(), 1000 + 750 + 2000);
    }

    #[test]
    fn attack_power_follows_strategy() {
        let mut army = Army::new();
        // 16030 * 70 / 100 = 11221, * 75 / 100 = 8415
        assert_eq!(army.attack_power(), 8415);
        army.strategy = CombatStrategy::Aggressive;
        assert_eq!(army.attack_power(), 8415 * 130 / 100);
        army.strategy = CombatStrategy::Defensive;
        assert_eq!(army.attack_power(), 8415 * 80 / 100);
    }

    #[test]
    fn empty_army_still_has_minimum_power() {
        let army = Army::empty();
        assert_eq!(army.attack_power(), 1);
        assert!(army.defense_power() >= 1);
    }

    #[test]
    fn maintenance_formula() {
        let army = Army::new();
        assert_eq!(army.maintenance_cost(), 30 + 16_030 / 5 + 50);
    }

    #[test]
    fn remove_unit_checks_bounds() {
        let mut army = Army::new();
        assert!(army.remove_unit(3).is_err());
        let removed = army.remove_unit(1).unwrap();
        assert_eq!(removed.name(), "Archers");
        assert_eq!(army.units().len(), 2);
    }

    #[test]
    fn defeat_costs_men_and_morale() {
        let mut army = Army::new();
        let before = army.total_strength();
        army.process_battle_results(false, 20);
        assert_eq!(army.last_battle_result(), -1);
        assert!(army.total_strength() < before);
        assert_eq!(army.units()[0].count(), 80);
    }

    #[test]
    fn blizzard_causes_losses() {
        let mut army = Army::new();
        let blizzard = Weather::new("Blizzard", WeatherType::Snowy, 4, 4).unwrap();
        army.apply_weather(&blizzard);
        assert_eq!(army.units()[0].count(), 95);
        assert_eq!(army.morale(), 51);
    }

    #[test]
    fn morale_clamped_after_adjustment() {
        let mut army = Army::new();
        army.adjust_morale(-1000);
        assert_eq!(army.morale(), 10);
        army.adjust_morale(1000);
        assert_eq!(army.morale(), 100);
    }

    #[test]
    fn training_raises_training_level() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut army = Army::new();
        army.train(&mut rng);
        assert!(army.training() > 50);
        assert!(army.units().iter().all(|u| u.experience() > 0));
    }

    #[test]
    fn improving_units_adds_at_least_one_point() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut army = Army::empty();
        army.add_unit(MilitaryUnit::new("Levy", 10, 5, 50, 5, 1));
        army.improve_units(10, &mut rng);
        // 5 * 10% rounds down to zero, so the floor of one applies
        assert!(army.units()[0].combat.attack() >= 6);
        assert!(army.units()[0].combat.defense() >= 55);
    }

    #[test]
    fn certain_losses_wipe_the_army() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut army = Army::new();
        assert_eq!(army.lose_units(0.0, &mut rng), 0);
        assert_eq!(army.lose_units(100.0, &mut rng), 3);
        assert_eq!(army.total_strength(), 0);
        assert_eq!(army.morale(), 50);
    }
}
