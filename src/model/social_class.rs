use serde::{Deserialize, Serialize};

use super::disease::Disease;
use super::environment::Weather;
use super::human::Human;
use crate::error::{GameError, Result};

/// One stratum of the kingdom's people.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialClass {
    pub human: Human,
    population: i32,
    tax_rate: f64,
    disease_resistance: i32,
}

impl SocialClass {
    pub fn new(name: impl Into<String>, population: i32, tax_rate: f64) -> Result<Self> {
        let mut class = Self {
            human: Human::new(name),
            population: population.max(0),
            tax_rate: 0.0,
            disease_resistance: 50,
        };
        class.set_tax_rate(tax_rate)?;
        Ok(class)
    }

    pub fn name(&self) -> &str {
        &self.human.name
    }

    pub fn population(&self) -> i32 {
        self.population
    }

    pub fn set_population(&mut self, value: i32) {
        self.population = value.max(0);
    }

    pub fn adjust_population(&mut self, delta: i32) {
        self.set_population(self.population + delta);
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    /// Rates above half stir resentment.
    pub fn set_tax_rate(&mut self, rate: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(GameError::invalid(format!(
                "tax rate must be between 0 and 1, got {rate}"
            )));
        }
        self.tax_rate = rate;
        if rate > 0.5 {
            self.human.adjust_happiness(-(((rate - 0.5) * 20.0) as i32));
        }
        Ok(())
    }

    pub fn disease_resistance(&self) -> i32 {
        self.disease_resistance
    }

    pub fn set_disease_resistance(&mut self, value: i32) {
        self.disease_resistance = value.clamp(0, 100);
    }

    pub fn tax_revenue(&self) -> i32 {
        (self.population as f64 * self.tax_rate * 10.0) as i32
    }

    pub fn is_unrest_likely(&self) -> bool {
        self.human.is_unrest_likely() || self.tax_rate > 0.7 || self.human.health() < 20
    }

    /// Returns the number who died.
    pub fn apply_disease(&mut self, disease: &Disease) -> i32 {
        self.human.apply_disease(disease);
        let adjusted = disease.severity() * (100 - self.disease_resistance) / 100;
        let mortality = disease.mortality() + (100 - self.human.health()) / 20;
        let deaths = (self.population as i64 * adjusted as i64 * mortality as i64 / 10_000) as i32;
        if deaths > 0 {
            self.adjust_population(-deaths);
            self.human.adjust_happiness(-(deaths / 10).min(10));
        }
        deaths
    }

    /// Returns the number who died; only extreme weather kills.
    pub fn apply_weather(&mut self, weather: &Weather) -> i32 {
        self.human.apply_weather(weather);
        if !weather.is_extreme() {
            return 0;
        }
        let deaths = (self.population * (weather.severity() - self.disease_resistance / 10) / 1000).max(0);
        if deaths > 0 {
            self.adjust_population(-deaths);
            self.human.adjust_happiness(-(deaths / 20).min(5));
        }
        deaths
    }

    pub fn update(&mut self) {
        self.human.update();
        let health = self.human.health() as f64 / 100.0;
        let happiness = self.human.happiness() as f64 / 100.0;
        let growth = (self.population as f64 * (health * happiness) * 0.01) as i32;
        self.adjust_population(growth);
        if self.tax_rate > 0.6 {
            self.human.adjust_loyalty(-1);
        } else if self.tax_rate < 0.2 {
            self.human.adjust_loyalty(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::disease::DiseaseType;
    use crate::model::environment::WeatherType;

    #[test]
    fn tax_rate_must_be_fractional() {
        let mut class = SocialClass::new("Peasants", 700, 0.15).unwrap();
        assert!(class.set_tax_rate(1.5).is_err());
        assert!(class.set_tax_rate(-0.1).is_err());
        assert_eq!(class.tax_rate(), 0.15);
    }

    #[test]
    fn heavy_tax_costs_happiness() {
        let mut class = SocialClass::new("Peasants", 700, 0.15).unwrap();
        class.set_tax_rate(0.9).unwrap();
        assert_eq!(class.human.happiness(), 42);
        assert!(class.is_unrest_likely());
    }

    #[test]
    fn revenue_scales_with_population() {
        let class = SocialClass::new("Merchants", 200, 0.25).unwrap();
        assert_eq!(class.tax_revenue(), 500);
    }

    #[test]
    fn disease_kills_in_proportion() {
        let mut class = SocialClass::new("Peasants", 10_000, 0.15).unwrap();
        let plague = Disease::new("Plague", 5, 50, 5, DiseaseType::Plague).unwrap();
        let deaths = class.apply_disease(&plague);
        // health 90 after the hit: severity 5 halved by resistance, mortality 10 + 0
        assert_eq!(deaths, 10_000 * 2 * 10 / 10_000);
        assert_eq!(class.population(), 10_000 - deaths);
    }

    #[test]
    fn mild_weather_kills_nobody() {
        let mut class = SocialClass::new("Nobles", 100, 0.35).unwrap();
        let fog = Weather::new("Fog", WeatherType::Foggy, 2, 3).unwrap();
        assert_eq!(class.apply_weather(&fog), 0);
        assert_eq!(class.population(), 100);
    }

    #[test]
    fn low_taxes_build_loyalty() {
        let mut class = SocialClass::new("Peasants", 700, 0.1).unwrap();
        class.update();
        assert_eq!(class.human.loyalty(), 51);
        assert!(class.population() > 700);
    }
}
