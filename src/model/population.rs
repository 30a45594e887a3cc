use bevy_ecs::component::Component;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::disease::Disease;
use super::environment::Weather;
use super::social_class::SocialClass;
use crate::error::{GameError, Result};

// ---------------------------------------------------------------------------
// Constants — Growth
// ---------------------------------------------------------------------------

const BASE_GROWTH: i32 = 5;
const GROWTH_RANGE: (i32, i32) = (-10, 20);
const UNREST_GROWTH_PENALTY: i32 = 5;
const FOOD_PER_CAPITA_RANGE: (i32, i32) = (1, 10);

// ---------------------------------------------------------------------------
// Constants — Default classes (name, share %, tax rate)
// ---------------------------------------------------------------------------

const DEFAULT_CLASSES: [(&str, i32, f64); 3] = [
    ("Peasants", 70, 0.15),
    ("Merchants", 20, 0.25),
    ("Nobles", 10, 0.35),
];

/// What one turn of population change did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulationReport {
    pub starved: i32,
    pub growth: i32,
    pub unrest_started: bool,
    pub unrest_ended: bool,
}

/// The kingdom's people, split into social classes.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    classes: Vec<SocialClass>,
    total: i32,
    growth_rate: i32,
    food_per_capita: i32,
    health: i32,
    unrest: bool,
    susceptibility: i32,
}

impl Population {
    pub fn new(initial: i32) -> Self {
        let mut classes = Vec::new();
        if initial > 0 {
            for (name, share, rate) in DEFAULT_CLASSES {
                if let Ok(class) = SocialClass::new(name, initial * share / 100, rate) {
                    classes.push(class);
                }
            }
        }
        // Health and susceptibility keep their founding values until the first update.
        let total = if classes.is_empty() {
            initial.max(0)
        } else {
            classes.iter().map(SocialClass::population).sum()
        };
        Self {
            classes,
            total,
            growth_rate: BASE_GROWTH,
            food_per_capita: 2,
            health: 70,
            unrest: false,
            susceptibility: 50,
        }
    }

    pub fn total(&self) -> i32 {
        self.total
    }

    pub fn classes(&self) -> &[SocialClass] {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut [SocialClass] {
        &mut self.classes
    }

    pub fn class(&self, index: usize) -> Result<&SocialClass> {
        let len = self.classes.len();
        self.classes
            .get(index)
            .ok_or(GameError::out_of_range("social class", index, len))
    }

    pub fn class_mut(&mut self, index: usize) -> Result<&mut SocialClass> {
        let len = self.classes.len();
        self.classes
            .get_mut(index)
            .ok_or(GameError::out_of_range("social class", index, len))
    }

    pub fn add_class(&mut self, class: SocialClass) {
        self.classes.push(class);
        self.recalculate();
    }

    pub fn growth_rate(&self) -> i32 {
        self.growth_rate
    }

    pub fn set_growth_rate(&mut self, value: i32) {
        self.growth_rate = value.clamp(GROWTH_RANGE.0, GROWTH_RANGE.1);
    }

    pub fn food_per_capita(&self) -> i32 {
        self.food_per_capita
    }

    pub fn set_food_per_capita(&mut self, value: i32) {
        self.food_per_capita = value.clamp(FOOD_PER_CAPITA_RANGE.0, FOOD_PER_CAPITA_RANGE.1);
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    /// Mean loyalty across the social classes.
    pub fn loyalty(&self) -> i32 {
        if self.classes.is_empty() {
            return 50;
        }
        self.classes.iter().map(|c| c.human.loyalty()).sum::<i32>() / self.classes.len() as i32
    }

    pub fn has_unrest(&self) -> bool {
        self.unrest
    }

    pub fn set_unrest(&mut self, unrest: bool) {
        self.unrest = unrest;
    }

    pub fn susceptibility(&self) -> i32 {
        self.susceptibility
    }

    pub fn food_required(&self) -> i32 {
        self.total * self.food_per_capita
    }

    pub fn tax_revenue(&self) -> i32 {
        self.classes.iter().map(SocialClass::tax_revenue).sum()
    }

    fn recalculate(&mut self) {
        self.total = self.classes.iter().map(SocialClass::population).sum();
        self.health = if self.total > 0 {
            let weighted: i64 = self
                .classes
                .iter()
                .map(|c| c.human.health() as i64 * c.population() as i64)
                .sum();
            (weighted / self.total as i64) as i32
        } else {
            50
        };
        self.susceptibility = 100 - self.health / 2;
    }

    /// Advance one turn given the food on hand.
    pub fn update(&mut self, available_food: i32, rng: &mut impl Rng) -> PopulationReport {
        let mut report = PopulationReport::default();
        let was_unrest = self.unrest;
        let required = self.food_required();
        let shortage = if required > 0 && available_food < required {
            (required - available_food) as f64 / required as f64
        } else {
            0.0
        };

        let count = self.classes.len();
        let total_before = self.total;
        for (i, class) in self.classes.iter_mut().enumerate() {
            class.update();
            if shortage > 0.0 {
                let severity = (shortage * (1.0 + i as f64 / count as f64)).min(1.0);
                class.human.adjust_happiness(-((severity * 30.0) as i32));
                class.human.adjust_health(-((severity * 15.0) as i32));
                if severity > 0.5 {
                    let deaths = (class.population() as f64 * (severity - 0.5) * 0.1) as i32;
                    class.adjust_population(-deaths);
                    report.starved += deaths;
                }
            }
            if class.is_unrest_likely() && total_before > 0 {
                let share = class.population() as f64 / total_before as f64;
                if rng.random::<f64>() < share * 0.5 {
                    self.unrest = true;
                }
            }
        }

        self.recalculate();

        let mut growth = BASE_GROWTH + (self.health - 50) / 10 - (shortage * 10.0) as i32;
        if self.unrest {
            growth -= UNREST_GROWTH_PENALTY;
        }
        self.set_growth_rate(growth);

        for class in &mut self.classes {
            let delta = (class.population() as f64 * self.growth_rate as f64 / 1000.0) as i32;
            class.adjust_population(delta);
        }
        self.recalculate();
        report.growth = self.total - total_before + report.starved;

        if self.unrest && rng.random_range(1..=5) == 1 {
            self.unrest = false;
        }
        report.unrest_started = !was_unrest && self.unrest;
        report.unrest_ended = was_unrest && !self.unrest;
        report
    }

    /// Apply a random event's population effect (percent).
    pub fn handle_event(&mut self, effect: i32, rng: &mut impl Rng) {
        if effect == 0 {
            return;
        }
        for class in &mut self.classes {
            let change = (class.population() as f64 * effect as f64 / 100.0) as i32;
            class.adjust_population(change);
            if effect > 0 {
                class.human.adjust_happiness((effect / 2).min(10));
                class.human.adjust_health((effect / 4).min(5));
            } else {
                class.human.adjust_happiness((effect / 2).max(-10));
                class.human.adjust_health((effect / 4).max(-5));
            }
        }
        self.recalculate();

        if effect < -10 && !self.unrest {
            if rng.random_range(1..=4) == 1 {
                self.unrest = true;
            }
        } else if effect > 10 && self.unrest && rng.random_range(1..=3) == 1 {
            self.unrest = false;
        }
    }

    pub fn apply_weather(&mut self, weather: &Weather, rng: &mut impl Rng) -> i32 {
        let deaths: i32 = self.classes.iter_mut().map(|c| c.apply_weather(weather)).sum();
        self.recalculate();
        if weather.is_extreme() && !self.unrest && rng.random_range(1..=4) == 1 {
            self.unrest = true;
        }
        deaths
    }

    pub fn apply_disease(&mut self, disease: &Disease, rng: &mut impl Rng) -> i32 {
        let deaths: i32 = self.classes.iter_mut().map(|c| c.apply_disease(disease)).sum();
        if disease.severity() > 3 {
            for class in &mut self.classes {
                let health = class.human.health();
                class.human.set_health((health - 5).max(10));
            }
            if !self.unrest && rng.random_range(1..=3) == 1 {
                self.unrest = true;
            }
        }
        self.recalculate();
        deaths
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn default_classes_split_population() {
        let p = Population::new(1000);
        let sizes: Vec<i32> = p.classes().iter().map(SocialClass::population).collect();
        assert_eq!(sizes, vec![700, 200, 100]);
        assert_eq!(p.total(), 1000);
        assert_eq!(p.classes()[2].tax_rate(), 0.35);
    }

    #[test]
    fn empty_population_has_no_classes() {
        let p = Population::new(0);
        assert!(p.classes().is_empty());
        assert!(p.class(0).is_err());
    }

    #[test]
    fn class_index_is_checked() {
        let p = Population::new(1000);
        assert!(p.class(2).is_ok());
        assert!(matches!(
            p.class(3),
            Err(GameError::IndexOutOfRange { index: 3, len: 3, .. })
        ));
    }

    #[test]
    fn well_fed_kingdom_grows() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut p = Population::new(1000);
        let report = p.update(10_000, &mut rng);
        assert!(p.total() > 1000);
        assert_eq!(report.starved, 0);
    }

    #[test]
    fn famine_kills_and_shrinks_growth() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut p = Population::new(1000);
        let report = p.update(0, &mut rng);
        assert!(report.starved > 0);
        assert!(p.growth_rate() < BASE_GROWTH);
        assert!(p.total() < 1000);
    }

    #[test]
    fn growth_rate_is_clamped() {
        let mut p = Population::new(1000);
        p.set_growth_rate(99);
        assert_eq!(p.growth_rate(), 20);
        p.set_growth_rate(-99);
        assert_eq!(p.growth_rate(), -10);
    }

    #[test]
    fn positive_event_raises_numbers_and_mood() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut p = Population::new(1000);
        p.handle_event(10, &mut rng);
        assert_eq!(p.total(), 1100);
        assert_eq!(p.classes()[0].human.happiness(), 55);
    }

    #[test]
    fn founding_health_holds_until_first_update() {
        let p = Population::new(1000);
        assert_eq!(p.health(), 70);
        assert_eq!(p.susceptibility(), 50);
        assert!(!p.has_unrest());
    }

    #[test]
    fn susceptibility_tracks_health() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut p = Population::new(1000);
        p.update(10_000, &mut rng);
        assert_eq!(p.susceptibility(), 100 - p.health() / 2);
    }
}
