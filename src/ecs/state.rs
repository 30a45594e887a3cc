use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;
use bevy_ecs::system::ResMut;
use serde::{Deserialize, Serialize};

use crate::config::Difficulty;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Running,
    Victory,
    Defeat,
    TurnLimit,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Running
    }
}

/// Engine state resource: the turn counter and how the game stands.
///
/// `advance_turn` moves the counter at the end of each played turn (in
/// `TurnPhase::PostUpdate`, before the end checks), so turn 1 is the first
/// turn played.
#[derive(Resource, Debug, Clone)]
pub struct GameState {
    pub turn: u32,
    pub status: GameStatus,
    pub paused: bool,
    speed: u8,
    pub difficulty: Difficulty,
    pub player: Option<Entity>,
    /// Score recorded when the game ended.
    pub final_score: Option<i64>,
}

impl GameState {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            turn: 0,
            status: GameStatus::Running,
            paused: false,
            speed: 1,
            difficulty,
            player: None,
            final_score: None,
        }
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: u8) {
        self.speed = speed.clamp(1, 5);
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running && !self.paused
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Difficulty::Normal)
    }
}

/// Bevy system that advances the engine turn counter by one.
pub fn advance_turn(mut state: ResMut<GameState>) {
    state.turn += 1;
}
