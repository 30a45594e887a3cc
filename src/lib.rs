pub mod advisor;
pub mod config;
pub mod ecs;
pub mod error;
pub mod game;
pub mod model;
pub mod save;

pub use config::{Difficulty, GameConfig};
pub use error::{GameError, Result};
pub use game::{GameSession, TurnSummary};
pub use model::{
    ActionOutcome, ActionResult, BattleKind, CombatStrategy, KingdomAction, ResourceType, TerrainType,
    TrainingProgram, UnitKind,
};
pub use save::{GameSnapshot, flush_chronicle, load_game, save_game};
