use rand::Rng;
use serde::{Deserialize, Serialize};

use super::economy::Economy;
use super::environment::{EnvironmentalEffect, Weather};
use super::leader::Leader;
use super::population::Population;
use crate::error::{GameError, Result};

// ---------------------------------------------------------------------------
// Constants — Outbreak trigger
// ---------------------------------------------------------------------------

const BASE_OUTBREAK_CHANCE: i32 = 2;
const OUTBREAK_DURATION: (i32, i32) = (3, 8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DiseaseType {
    None,
    CommonCold,
    Dysentery,
    Plague,
    Fever,
}

string_enum!(DiseaseType {
    None => "none",
    CommonCold => "common_cold",
    Dysentery => "dysentery",
    Plague => "plague",
    Fever => "fever",
});

impl DiseaseType {
    pub fn label(self) -> &'static str {
        match self {
            DiseaseType::None => "None",
            DiseaseType::CommonCold => "Common Cold",
            DiseaseType::Dysentery => "Dysentery",
            DiseaseType::Plague => "Plague",
            DiseaseType::Fever => "Fever",
        }
    }

    fn severity_range(self) -> (i32, i32) {
        match self {
            DiseaseType::None | DiseaseType::CommonCold => (1, 2),
            DiseaseType::Dysentery => (2, 3),
            DiseaseType::Fever => (2, 4),
            DiseaseType::Plague => (4, 5),
        }
    }
}

const OUTBREAK_TYPES: [DiseaseType; 4] = [
    DiseaseType::CommonCold,
    DiseaseType::Dysentery,
    DiseaseType::Fever,
    DiseaseType::Plague,
];

/// What one turn of an outbreak did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiseaseReport {
    pub new_infections: i32,
    pub deaths: i32,
    pub recoveries: i32,
}

/// An outbreak sweeping through the kingdom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disease {
    pub effect: EnvironmentalEffect,
    pub kind: DiseaseType,
    infectivity: i32,
    mortality: i32,
    infected: i32,
}

impl Disease {
    pub fn new(
        name: impl Into<String>,
        severity: i32,
        infectivity: i32,
        duration: i32,
        kind: DiseaseType,
    ) -> Result<Self> {
        let effect = EnvironmentalEffect::new(name, severity, duration)?;
        Ok(Self {
            mortality: severity * 2,
            effect,
            kind,
            infectivity: infectivity.clamp(0, 100),
            infected: 0,
        })
    }

    /// Roll for a fresh outbreak. Wet weather, a sickly populace and a
    /// negligent ruler all raise the odds.
    pub fn maybe_outbreak(
        population: &Population,
        weather: &Weather,
        ruler: Option<&Leader>,
        rng: &mut impl Rng,
    ) -> Option<Self> {
        let chance = outbreak_chance(population, weather, ruler);
        if rng.random::<f64>() * 100.0 >= chance {
            return None;
        }
        let kind = OUTBREAK_TYPES[rng.random_range(0..OUTBREAK_TYPES.len())];
        let (lo, hi) = kind.severity_range();
        let severity = rng.random_range(lo..=hi);
        let infectivity = 10 * severity + rng.random_range(0..=20);
        let duration = rng.random_range(OUTBREAK_DURATION.0..=OUTBREAK_DURATION.1);
        let mut disease = Self::new(kind.label(), severity, infectivity, duration, kind).ok()?;
        let initial = (population.total() * severity / 100).max(1);
        disease.outbreak(initial).ok()?;
        Some(disease)
    }

    pub fn name(&self) -> &str {
        &self.effect.name
    }

    pub fn severity(&self) -> i32 {
        self.effect.severity()
    }

    pub fn infectivity(&self) -> i32 {
        self.infectivity
    }

    pub fn set_infectivity(&mut self, value: i32) {
        self.infectivity = value.clamp(0, 100);
    }

    pub fn mortality(&self) -> i32 {
        self.mortality
    }

    pub fn infected(&self) -> i32 {
        self.infected
    }

    pub fn is_active(&self) -> bool {
        self.effect.active
    }

    pub fn outbreak(&mut self, initial_infected: i32) -> Result<()> {
        if initial_infected < 0 {
            return Err(GameError::invalid(format!(
                "initial infected cannot be negative, got {initial_infected}"
            )));
        }
        self.infected = initial_infected;
        self.effect.turns_active = 0;
        self.effect.active = true;
        Ok(())
    }

    /// Infect part of the healthy population. Returns the new cases.
    pub fn spread(&mut self, population: &Population, weather: &Weather, rng: &mut impl Rng) -> i32 {
        let total = population.total();
        if total <= 0 {
            return 0;
        }
        let modified = (self.infectivity + weather.disease_modifier()).clamp(5, 95);
        let healthy = (total - self.infected).max(0);
        let base = (healthy as i64 * modified as i64 * population.susceptibility() as i64 / 10_000) as i32;
        let new_cases = base * (80 + rng.random_range(0..=40)) / 100;
        self.infected = (self.infected + new_cases).min(total);
        new_cases
    }

    /// Deaths among the infected this turn; they leave the infected pool.
    pub fn deaths(&mut self, rng: &mut impl Rng) -> i32 {
        let expected = self.infected * self.mortality / 100;
        let deaths = expected * (90 + rng.random_range(0..=20)) / 100;
        self.infected = (self.infected - deaths).max(0);
        deaths
    }

    pub fn apply(
        &mut self,
        population: &mut Population,
        economy: &mut Economy,
        weather: &Weather,
        rng: &mut impl Rng,
    ) -> DiseaseReport {
        let new_infections = self.spread(population, weather, rng);
        let deaths = self.deaths(rng);
        if deaths > 0 {
            population.apply_disease(self, rng);
        }

        let total = population.total();
        let reduction = self.severity() * self.infected / (total * 5 + 1);
        economy.set_production_level(economy.production_level() - reduction);

        let recoveries = self.infected * (100 - self.severity()) / 300;
        self.infected = (self.infected - recoveries).max(0);

        if self.effect.turns_active >= self.effect.duration() || self.infected == 0 {
            self.effect.active = false;
        }
        DiseaseReport {
            new_infections,
            deaths,
            recoveries,
        }
    }

    pub fn update(&mut self, rng: &mut impl Rng) {
        if !self.effect.active {
            return;
        }
        self.effect.turns_active += 1;
        if rng.random_range(1..=10) == 1 {
            self.effect.lower_severity();
        }
        if self.effect.turns_active > self.effect.duration() / 2 && rng.random_range(1..=10) == 1 {
            self.effect.active = false;
        }
    }
}

/// Percent chance of an outbreak this turn.
pub fn outbreak_chance(population: &Population, weather: &Weather, ruler: Option<&Leader>) -> f64 {
    let raw = (BASE_OUTBREAK_CHANCE
        + weather.disease_modifier() / 5
        + (population.susceptibility() - 50) / 10)
        .max(1);
    let prevention = ruler.map_or(1.0, Leader::disease_prevention_bonus);
    raw as f64 / prevention
}
