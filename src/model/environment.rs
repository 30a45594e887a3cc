use bevy_ecs::component::Component;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::army::Army;
use super::economy::{Economy, ResourceType};
use super::leader::Leader;
use super::population::Population;
use crate::error::{GameError, Result};

// ---------------------------------------------------------------------------
// EnvironmentalEffect
// ---------------------------------------------------------------------------

/// Shared lifetime bookkeeping for weather and disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalEffect {
    pub name: String,
    severity: i32,
    duration: i32,
    pub turns_active: i32,
    pub active: bool,
}

impl EnvironmentalEffect {
    pub fn new(name: impl Into<String>, severity: i32, duration: i32) -> Result<Self> {
        let mut effect = Self {
            name: name.into(),
            severity: 1,
            duration: 1,
            turns_active: 0,
            active: true,
        };
        effect.set_severity(severity)?;
        effect.set_duration(duration)?;
        Ok(effect)
    }

    pub fn severity(&self) -> i32 {
        self.severity
    }

    pub fn duration(&self) -> i32 {
        self.duration
    }

    pub fn set_severity(&mut self, severity: i32) -> Result<()> {
        if severity < 1 {
            return Err(GameError::invalid(format!(
                "severity must be at least 1, got {severity}"
            )));
        }
        self.severity = severity;
        Ok(())
    }

    pub fn set_duration(&mut self, duration: i32) -> Result<()> {
        if duration < 1 {
            return Err(GameError::invalid(format!(
                "duration must be at least 1, got {duration}"
            )));
        }
        self.duration = duration;
        Ok(())
    }

    pub fn turns_remaining(&self) -> i32 {
        (self.duration - self.turns_active).max(0)
    }

    pub(crate) fn lower_severity(&mut self) {
        self.severity = (self.severity - 1).max(1);
    }
}

// ---------------------------------------------------------------------------
// TerrainType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TerrainType {
    #[default]
    Plains,
    Forest,
    Mountains,
    Desert,
    Swamp,
}

string_enum!(TerrainType {
    Plains => "plains",
    Forest => "forest",
    Mountains => "mountains",
    Desert => "desert",
    Swamp => "swamp",
});

impl TerrainType {
    /// Base fighting efficiency on this ground.
    pub fn base_modifier(self) -> f64 {
        match self {
            TerrainType::Plains => 1.0,
            TerrainType::Forest => 0.9,
            TerrainType::Mountains => 0.8,
            TerrainType::Desert => 0.9,
            TerrainType::Swamp => 0.8,
        }
    }

    /// Open ground where fast units gain an edge; elsewhere they lose one.
    pub fn favors_speed(self) -> bool {
        matches!(self, TerrainType::Plains | TerrainType::Desert)
    }
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum WeatherType {
    Sunny,
    Rainy,
    Stormy,
    Snowy,
    Drought,
    Foggy,
}

string_enum!(WeatherType {
    Sunny => "sunny",
    Rainy => "rainy",
    Stormy => "stormy",
    Snowy => "snowy",
    Drought => "drought",
    Foggy => "foggy",
});

impl WeatherType {
    pub fn label(self) -> &'static str {
        match self {
            WeatherType::Sunny => "Sunny",
            WeatherType::Rainy => "Rainy",
            WeatherType::Stormy => "Stormy",
            WeatherType::Snowy => "Snowy",
            WeatherType::Drought => "Drought",
            WeatherType::Foggy => "Foggy",
        }
    }

    /// (crop, movement, morale, disease) at severity 3.
    fn base_effects(self) -> (i32, i32, i32, i32) {
        match self {
            WeatherType::Sunny => (10, 10, 5, -5),
            WeatherType::Rainy => (5, -10, -2, 10),
            WeatherType::Stormy => (-15, -30, -10, 0),
            WeatherType::Snowy => (-20, -40, -5, -10),
            WeatherType::Drought => (-30, 0, -15, 5),
            WeatherType::Foggy => (-5, -20, -3, 5),
        }
    }

    fn is_extreme_at(self, severity: i32) -> bool {
        match self {
            WeatherType::Sunny | WeatherType::Foggy => false,
            WeatherType::Rainy => severity > 3,
            WeatherType::Snowy => severity > 2,
            WeatherType::Stormy | WeatherType::Drought => true,
        }
    }

    fn severity_range(self) -> (i32, i32) {
        match self {
            WeatherType::Sunny | WeatherType::Rainy => (1, 3),
            WeatherType::Foggy => (1, 4),
            WeatherType::Snowy => (2, 4),
            WeatherType::Stormy | WeatherType::Drought => (3, 5),
        }
    }
}

const SEVERITY_ADJECTIVES: [&str; 5] = ["Mild", "Moderate", "Strong", "Severe", "Extreme"];

/// The kingdom's current weather.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub effect: EnvironmentalEffect,
    pub kind: WeatherType,
    crop_effect: i32,
    movement_effect: i32,
    morale_effect: i32,
    disease_modifier: i32,
    extreme: bool,
}

impl Weather {
    pub fn new(name: impl Into<String>, kind: WeatherType, severity: i32, duration: i32) -> Result<Self> {
        let mut weather = Self {
            effect: EnvironmentalEffect::new(name, severity, duration)?,
            kind,
            crop_effect: 0,
            movement_effect: 0,
            morale_effect: 0,
            disease_modifier: 0,
            extreme: false,
        };
        weather.recompute_effects();
        Ok(weather)
    }

    /// The mild weather every kingdom starts with.
    pub fn clear_skies(rng: &mut impl Rng) -> Self {
        let mut weather = Self {
            effect: EnvironmentalEffect {
                name: "Clear Skies".to_string(),
                severity: 1,
                duration: rng.random_range(2..=5),
                turns_active: 0,
                active: true,
            },
            kind: WeatherType::Sunny,
            crop_effect: 0,
            movement_effect: 0,
            morale_effect: 0,
            disease_modifier: 0,
            extreme: false,
        };
        weather.recompute_effects();
        weather
    }

    pub fn generate_random(rng: &mut impl Rng) -> Self {
        let kind = WeatherType::ALL[rng.random_range(0..WeatherType::ALL.len())];
        let (lo, hi) = kind.severity_range();
        let severity = rng.random_range(lo..=hi);
        let duration = severity + rng.random_range(1..=3);
        let adjective = SEVERITY_ADJECTIVES[(severity - 1).clamp(0, 4) as usize];
        let mut weather = Self {
            effect: EnvironmentalEffect {
                name: format!("{adjective} {}", kind.label()),
                severity,
                duration,
                turns_active: 0,
                active: true,
            },
            kind,
            crop_effect: 0,
            movement_effect: 0,
            morale_effect: 0,
            disease_modifier: 0,
            extreme: false,
        };
        weather.recompute_effects();
        weather
    }

    fn recompute_effects(&mut self) {
        let severity = self.effect.severity();
        let (crop, movement, morale, disease) = self.kind.base_effects();
        self.crop_effect = crop * severity / 3;
        self.movement_effect = movement * severity / 3;
        self.morale_effect = morale * severity / 3;
        self.disease_modifier = disease * severity / 3;
        self.extreme = self.kind.is_extreme_at(severity);
    }

    pub fn name(&self) -> &str {
        &self.effect.name
    }

    pub fn severity(&self) -> i32 {
        self.effect.severity()
    }

    pub fn is_active(&self) -> bool {
        self.effect.active
    }

    pub fn is_extreme(&self) -> bool {
        self.extreme
    }

    pub fn crop_effect(&self) -> i32 {
        self.crop_effect
    }

    pub fn movement_effect(&self) -> i32 {
        self.movement_effect
    }

    pub fn morale_effect(&self) -> i32 {
        self.morale_effect
    }

    pub fn disease_modifier(&self) -> i32 {
        self.disease_modifier
    }

    /// Push this turn's weather onto the kingdom.
    pub fn apply(
        &self,
        population: &mut Population,
        economy: &mut Economy,
        army: &mut Army,
        ruler: Option<&mut Leader>,
        rng: &mut impl Rng,
    ) {
        population.apply_weather(self, rng);

        economy.set_production_level((economy.production_level() + self.crop_effect / 10).max(10));
        for kind in ResourceType::ALL {
            let resource = economy.resource_mut(*kind);
            let gather = resource.gather_rate();
            let delta = if *kind == ResourceType::Food {
                gather * self.crop_effect as i64 / 100
            } else {
                gather * self.movement_effect as i64 / 200
            };
            resource.set_gather_rate(gather + delta);
        }
        if self.extreme {
            economy.set_trade_level((economy.trade_level() - 10).max(10));
        }

        army.apply_weather(self);

        if let Some(ruler) = ruler {
            if self.extreme && ruler.weather_preparedness_bonus() > 0.5 {
                ruler.gain_experience(rng);
            }
        }
    }

    /// Age the weather; storms may ease off before they end.
    pub fn update(&mut self, rng: &mut impl Rng) {
        if !self.effect.active {
            return;
        }
        self.effect.turns_active += 1;
        if self.effect.severity() > 1 && rng.random_range(1..=3) == 1 {
            self.effect.lower_severity();
            self.crop_effect = self.crop_effect * 2 / 3;
            self.movement_effect = self.movement_effect * 2 / 3;
            self.morale_effect = self.morale_effect * 2 / 3;
            self.disease_modifier = self.disease_modifier * 2 / 3;
            if self.effect.severity() <= 2 {
                self.extreme = false;
            }
        }
        if self.effect.turns_active >= self.effect.duration() {
            self.effect.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn effect_rejects_non_positive_values() {
        assert!(EnvironmentalEffect::new("x", 0, 3).is_err());
        assert!(EnvironmentalEffect::new("x", 2, 0).is_err());
        let mut e = EnvironmentalEffect::new("x", 2, 3).unwrap();
        assert!(e.set_severity(-1).is_err());
        assert_eq!(e.severity(), 2);
    }

    #[test]
    fn turns_remaining_floors_at_zero() {
        let mut e = EnvironmentalEffect::new("x", 1, 3).unwrap();
        e.turns_active = 5;
        assert_eq!(e.turns_remaining(), 0);
        e.turns_active = 1;
        assert_eq!(e.turns_remaining(), 2);
    }

    #[test]
    fn effects_scale_with_severity() {
        let drought = Weather::new("Dry", WeatherType::Drought, 5, 4).unwrap();
        assert_eq!(drought.crop_effect(), -50);
        assert_eq!(drought.morale_effect(), -25);
        assert!(drought.is_extreme());

        let rain = Weather::new("Drizzle", WeatherType::Rainy, 3, 4).unwrap();
        assert!(!rain.is_extreme());
        let downpour = Weather::new("Downpour", WeatherType::Rainy, 4, 4).unwrap();
        assert!(downpour.is_extreme());
    }

    #[test]
    fn generated_weather_respects_ranges() {
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..200 {
            let w = Weather::generate_random(&mut rng);
            let (lo, hi) = w.kind.severity_range();
            assert!((lo..=hi).contains(&w.severity()));
            assert!(w.effect.duration() > w.severity());
            assert!(w.effect.duration() <= w.severity() + 3);
            assert!(w.name().ends_with(w.kind.label()));
        }
    }

    #[test]
    fn weather_expires_after_duration() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut w = Weather::new("Sun", WeatherType::Sunny, 1, 2).unwrap();
        w.update(&mut rng);
        assert!(w.is_active());
        w.update(&mut rng);
        assert!(!w.is_active());
    }

    #[test]
    fn easing_storm_loses_extremity() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut w = Weather::new("Blizzard", WeatherType::Snowy, 3, 50).unwrap();
        for _ in 0..40 {
            w.update(&mut rng);
        }
        assert!(w.severity() <= 2);
        assert!(!w.is_extreme());
    }

    #[test]
    fn clear_skies_is_mild() {
        let mut rng = SmallRng::seed_from_u64(2);
        let w = Weather::clear_skies(&mut rng);
        assert_eq!(w.name(), "Clear Skies");
        assert_eq!(w.kind, WeatherType::Sunny);
        assert!(!w.is_extreme());
        assert!((2..=5).contains(&w.effect.duration()));
    }
}
