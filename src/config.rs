use std::fs;
use std::path::Path;

use bevy_ecs::resource::Resource;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Hardcore,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Hardcore,
    ];

    pub fn starting_gold(self) -> i64 {
        match self {
            Difficulty::Easy => 1000,
            Difficulty::Normal => 500,
            Difficulty::Hard => 200,
            Difficulty::Hardcore => 0,
        }
    }

    /// Added to every stat of a rival ruler.
    pub fn rival_stat_bonus(self) -> i32 {
        match self {
            Difficulty::Easy | Difficulty::Normal => 0,
            Difficulty::Hard => 5,
            Difficulty::Hardcore => 10,
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            "hardcore" => Ok(Difficulty::Hardcore),
            other => Err(GameError::Config(format!("unknown difficulty: {other}"))),
        }
    }
}

/// Settings for a new game.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed for deterministic play.
    pub seed: u64,
    pub difficulty: Difficulty,
    /// The game ends once this many turns have been played.
    pub max_turns: u32,
    pub kingdom_name: String,
    pub ruler_name: String,
    pub ruler_title: String,
    pub rival_count: u32,
    /// Turns between elections.
    pub election_cycle: i32,
    /// A random event strikes with probability 1 in this.
    pub random_event_chance: u32,
    pub stability_warning_threshold: i32,
    /// Re-assess tax, trade and upkeep from the kingdom's state every turn
    /// instead of keeping the flat opening ledger.
    pub live_treasury_accounting: bool,
    /// Let the rival AI govern the player's kingdom too.
    pub autopilot: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            difficulty: Difficulty::Normal,
            max_turns: 100,
            kingdom_name: "New Kingdom".to_string(),
            ruler_name: "Ruler".to_string(),
            ruler_title: "Lord".to_string(),
            rival_count: 1,
            election_cycle: 5,
            random_event_chance: 5,
            stability_warning_threshold: 10,
            live_treasury_accounting: false,
            autopilot: false,
        }
    }
}

impl GameConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_turns == 0 {
            return Err(GameError::Config("max_turns must be at least 1".into()));
        }
        if self.election_cycle < 1 {
            return Err(GameError::Config("election_cycle must be at least 1".into()));
        }
        if self.random_event_chance == 0 {
            return Err(GameError::Config("random_event_chance must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let config = GameConfig::default();
        assert_eq!(config.max_turns, 100);
        assert_eq!(config.kingdom_name, "New Kingdom");
        assert_eq!(config.ruler_title, "Lord");
        assert!(!config.live_treasury_accounting);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn difficulty_sets_starting_gold() {
        let gold: Vec<i64> = Difficulty::ALL.iter().map(|d| d.starting_gold()).collect();
        assert_eq!(gold, vec![1000, 500, 200, 0]);
        assert_eq!(Difficulty::Hardcore.rival_stat_bonus(), 10);
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("nightmare".parse::<Difficulty>().is_err());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"seed": 7, "difficulty": "hard", "rival_count": 3}}"#).unwrap();
        let config = GameConfig::from_file(file.path()).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.rival_count, 3);
        assert_eq!(config.max_turns, 100);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GameConfig::from_file(Path::new("/nonexistent/stronghold.json")).unwrap_err();
        assert!(matches!(err, GameError::Io(_)));
    }

    #[test]
    fn zero_turns_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_turns": 0}}"#).unwrap();
        assert!(matches!(
            GameConfig::from_file(file.path()),
            Err(GameError::Config(_))
        ));
    }
}
