use rand::Rng;
use serde::{Deserialize, Serialize};

use super::environment::{TerrainType, Weather, WeatherType};
use super::leader::Leader;

// ---------------------------------------------------------------------------
// CombatStrategy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CombatStrategy {
    Aggressive,
    Defensive,
    #[default]
    Balanced,
    Guerrilla,
}

string_enum!(CombatStrategy {
    Aggressive => "aggressive",
    Defensive => "defensive",
    Balanced => "balanced",
    Guerrilla => "guerrilla",
});

// ---------------------------------------------------------------------------
// CombatUnit
// ---------------------------------------------------------------------------

/// Raw fighting stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatUnit {
    pub name: String,
    pub description: String,
    attack: i32,
    defense: i32,
    speed: i32,
}

impl CombatUnit {
    pub fn new(name: impl Into<String>, attack: i32, defense: i32, speed: i32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            attack: attack.max(0),
            defense: defense.max(0),
            speed: speed.max(0),
        }
    }

    pub fn attack(&self) -> i32 {
        self.attack
    }

    pub fn defense(&self) -> i32 {
        self.defense
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn set_attack(&mut self, value: i32) {
        self.attack = value.max(0);
    }

    pub fn set_defense(&mut self, value: i32) {
        self.defense = value.max(0);
    }

    pub fn set_speed(&mut self, value: i32) {
        self.speed = value.max(0);
    }

    pub fn power(&self) -> i32 {
        (self.attack + self.defense) * 2 + self.speed
    }

    pub fn train(&mut self, rng: &mut impl Rng) {
        self.attack += rng.random_range(1..=3);
        self.defense += rng.random_range(1..=2);
        self.speed += rng.random_range(0..=1);
    }

    pub fn deal_damage(&self, strategy: CombatStrategy, rng: &mut impl Rng) -> i32 {
        let base = self.attack;
        match strategy {
            CombatStrategy::Aggressive => base * 130 / 100,
            CombatStrategy::Defensive => base * 70 / 100,
            CombatStrategy::Guerrilla => {
                if rng.random_range(0..=100) < 30 {
                    base * 2
                } else {
                    base / 2
                }
            }
            CombatStrategy::Balanced => base,
        }
    }

    pub fn apply_weather(&mut self, weather: &Weather) {
        match weather.kind {
            WeatherType::Stormy | WeatherType::Rainy => {
                self.speed = (self.speed - 1).max(1);
            }
            WeatherType::Snowy => {
                self.speed = (self.speed - 2).max(1);
                self.attack = (self.attack - 1).max(1);
            }
            WeatherType::Sunny => self.attack += 1,
            WeatherType::Drought | WeatherType::Foggy => {}
        }
    }

    pub fn apply_leader_effects(&mut self, leader: &Leader) {
        if leader.military() > 70 {
            self.attack += 2;
            self.defense += 1;
        } else if leader.military() > 50 {
            self.attack += 1;
        }
        if leader.intelligence() > 70 {
            self.speed += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// MilitaryUnit
// ---------------------------------------------------------------------------

const FAST_UNIT_SPEED: i32 = 8;
const VETERAN_THRESHOLD: i32 = 100;

/// A company of soldiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilitaryUnit {
    pub combat: CombatUnit,
    count: i32,
    max_count: i32,
    morale: i32,
    experience: i32,
    food_per_soldier: i32,
    training: i32,
    veteran: bool,
}

impl MilitaryUnit {
    pub fn new(
        name: impl Into<String>,
        count: i32,
        attack: i32,
        defense: i32,
        speed: i32,
        food_per_soldier: i32,
    ) -> Self {
        let count = count.max(0);
        Self {
            combat: CombatUnit::new(name, attack, defense, speed),
            count,
            max_count: count * 2,
            morale: 70,
            experience: 0,
            food_per_soldier: food_per_soldier.max(0),
            training: 50,
            veteran: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.combat.name
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn max_count(&self) -> i32 {
        self.max_count
    }

    pub fn morale(&self) -> i32 {
        self.morale
    }

    pub fn experience(&self) -> i32 {
        self.experience
    }

    pub fn training(&self) -> i32 {
        self.training
    }

    pub fn is_veteran(&self) -> bool {
        self.veteran
    }

    pub fn adjust_morale(&mut self, delta: i32) {
        self.morale = (self.morale + delta).clamp(10, 100);
    }

    pub fn gain_experience(&mut self, amount: i32) {
        self.experience += amount;
        if self.experience >= VETERAN_THRESHOLD && !self.veteran {
            self.veteran = true;
            self.combat.attack += 5;
            self.combat.defense += 5;
            self.combat.description = format!("Veteran {}", self.combat.name);
        }
    }

    pub fn food_consumption(&self) -> i32 {
        self.food_per_soldier * self.count
    }

    pub fn combat_strength(&self) -> i32 {
        let base = (self.combat.attack + self.combat.defense) * self.count * self.morale / 100;
        if self.veteran { base * 120 / 100 } else { base }
    }

    pub fn take_casualties(&mut self, casualties: i32) {
        if casualties <= 0 {
            return;
        }
        self.count = (self.count - casualties).max(0);
        if casualties > self.count / 10 {
            self.adjust_morale(-10);
        }
    }

    pub fn train(&mut self, rng: &mut impl Rng) {
        self.gain_experience(rng.random_range(1..=5));
        if rng.random_range(1..=100) <= 20 {
            self.combat.attack += 1;
        }
        if rng.random_range(1..=100) <= 20 {
            self.combat.defense += 1;
        }
        self.adjust_morale(5);
        self.training = (self.training + rng.random_range(1..=3)).min(100);
    }

    pub fn recruit(&mut self, soldiers: i32) {
        if soldiers <= 0 {
            return;
        }
        self.count += soldiers;
        if self.count > self.max_count {
            self.max_count = self.count * 2;
        }
        self.adjust_morale(-5);
        self.experience = (self.experience - 5).max(0);
    }

    /// How well this unit fights on the given ground. Fast units love open country.
    pub fn terrain_modifier(&self, terrain: TerrainType) -> f64 {
        let base = terrain.base_modifier();
        if self.combat.speed < FAST_UNIT_SPEED {
            base
        } else if terrain.favors_speed() {
            base + 0.1
        } else {
            base - 0.1
        }
    }

    /// Strength on a given battlefield, after weather and the commander's
    /// influence. The unit itself is left untouched.
    pub fn field_strength(
        &self,
        strategy: CombatStrategy,
        weather: &Weather,
        commander: Option<&Leader>,
        terrain: TerrainType,
        rng: &mut impl Rng,
    ) -> i32 {
        let mut ready = self.combat.clone();
        ready.apply_weather(weather);
        if let Some(commander) = commander {
            ready.apply_leader_effects(commander);
        }
        let hit = ready.deal_damage(strategy, rng);
        let mut strength = (hit + ready.defense) * self.count * self.morale / 100;
        if self.veteran {
            strength = strength * 120 / 100;
        }
        (strength as f64 * self.terrain_modifier(terrain)) as i32
    }

    pub fn update(&mut self, rng: &mut impl Rng) {
        self.adjust_morale(1);
        if self.veteran && rng.random_range(1..=100) <= 10 {
            self.gain_experience(1);
        }
    }
}
