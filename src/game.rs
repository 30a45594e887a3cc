//! `GameSession`: an owned game app with a turn-by-turn API.
//!
//! Wraps the Bevy app so library users and the CLI never touch the world
//! directly: queue actions, play turns, read the player's kingdom, ask the
//! advisor and save.

use std::fmt;
use std::path::Path;

use bevy_app::App;
use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;
use bevy_ecs::schedule::ExecutorKind;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::advisor;
use crate::config::GameConfig;
use crate::ecs::app::build_game_app_with_executor;
use crate::ecs::components::{Affliction, Army, Court, Economy, KingdomCore, Population, Weather};
use crate::ecs::plugin::GamePlugin;
use crate::ecs::resources::{ActionResults, Chronicle, GameRng, PendingActions};
use crate::ecs::schedule::TurnTick;
use crate::ecs::spawn::new_game;
use crate::ecs::state::{GameState, GameStatus};
use crate::error::{GameError, Result};
use crate::model::action::{Action, ActionResult, KingdomAction};
use crate::model::kingdom::KingdomView;
use crate::save;

/// One line of headline numbers for the player's kingdom.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnSummary {
    pub turn: u32,
    pub kingdom: String,
    pub population: i32,
    pub gold: i64,
    pub strength: i32,
    pub morale: i32,
    pub stability: i32,
    pub status: GameStatus,
}

impl fmt::Display for TurnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Turn {:>3} | {} | pop {} | gold {} | strength {} | morale {} | stability {}",
            self.turn, self.kingdom, self.population, self.gold, self.strength, self.morale, self.stability
        )?;
        if self.status.is_over() {
            write!(f, " | {:?}", self.status)?;
        }
        Ok(())
    }
}

pub struct GameSession {
    app: App,
}

impl GameSession {
    /// Start a new game on the single-threaded executor.
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_executor(config, ExecutorKind::SingleThreaded)
    }

    pub fn with_executor(config: GameConfig, executor: ExecutorKind) -> Result<Self> {
        config.validate()?;
        let mut app = build_game_app_with_executor(&config, config.seed, executor);
        app.add_plugins(GamePlugin);
        let player = new_game(app.world_mut(), &config);
        tracing::info!(?player, seed = config.seed, difficulty = ?config.difficulty, "new game");
        Ok(Self { app })
    }

    /// Resume a game written by [`GameSession::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let app = save::load_game(path, ExecutorKind::SingleThreaded)?;
        Ok(Self { app })
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn state(&self) -> &GameState {
        self.app.world().resource::<GameState>()
    }

    pub fn config(&self) -> &GameConfig {
        self.app.world().resource::<GameConfig>()
    }

    pub fn chronicle(&self) -> &Chronicle {
        self.app.world().resource::<Chronicle>()
    }

    pub fn is_over(&self) -> bool {
        self.state().status.is_over()
    }

    /// The player's kingdom entity, while it still stands.
    pub fn player(&self) -> Result<Entity> {
        self.state()
            .player
            .filter(|&entity| self.app.world().get::<KingdomCore>(entity).is_some())
            .ok_or_else(|| GameError::NoKingdom("the player's kingdom has fallen".into()))
    }

    fn player_component<T: Component>(&self) -> Result<&T> {
        let player = self.player()?;
        self.app
            .world()
            .get::<T>(player)
            .ok_or_else(|| GameError::NoKingdom(format!("player kingdom has no {}", std::any::type_name::<T>())))
    }

    pub fn kingdom(&self) -> Result<&KingdomCore> {
        self.player_component()
    }

    /// Borrowed view of the player's subsystems.
    pub fn view(&self) -> Result<KingdomView<'_>> {
        Ok(KingdomView {
            population: self.player_component::<Population>()?,
            economy: self.player_component::<Economy>()?,
            army: self.player_component::<Army>()?,
            court: self.player_component::<Court>()?,
            weather: self.player_component::<Weather>()?,
            disease: self.player_component::<Affliction>()?.disease(),
        })
    }

    pub fn summary(&self) -> Result<TurnSummary> {
        let core = self.kingdom()?;
        let view = self.view()?;
        Ok(TurnSummary {
            turn: self.state().turn,
            kingdom: core.name.clone(),
            population: view.population.total(),
            gold: view.economy.treasury.gold(),
            strength: view.army.total_strength(),
            morale: view.army.morale(),
            stability: core.stability(),
            status: self.state().status,
        })
    }

    /// Queue an action for the player's kingdom; it is applied next turn.
    pub fn queue(&mut self, action: KingdomAction) -> Result<()> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        tracing::debug!(action = action.label(), "action queued");
        self.app
            .world_mut()
            .resource_mut::<PendingActions>()
            .0
            .push(Action::player(action));
        Ok(())
    }

    /// Play one turn. Returns the results of the actions applied this turn.
    pub fn play_turn(&mut self) -> Result<Vec<ActionResult>> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let before = self.app.world().resource::<ActionResults>().0.len();
        self.app.world_mut().run_schedule(TurnTick);
        Ok(self.app.world().resource::<ActionResults>().0[before..].to_vec())
    }

    /// Play up to `turns` turns, stopping early when the game ends. Returns
    /// the number of turns played.
    pub fn run(&mut self, turns: u32) -> Result<u32> {
        let mut played = 0;
        while played < turns && !self.is_over() {
            self.play_turn()?;
            played += 1;
        }
        Ok(played)
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.app.world_mut().resource_mut::<GameState>().paused = paused;
    }

    pub fn set_speed(&mut self, speed: u8) {
        self.app.world_mut().resource_mut::<GameState>().set_speed(speed);
    }

    /// Ask the royal advisor. Answers depend only on the seed, the turn and
    /// the question.
    pub fn advise(&self, question: &str) -> String {
        let seed = self.app.world().resource::<GameRng>().seed;
        let mut rng = SmallRng::seed_from_u64(seed ^ u64::from(self.state().turn));
        advisor::advise(question, self.view().ok().as_ref(), &mut rng)
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        save::save_game(self.app.world_mut(), path)
    }

    pub fn flush_chronicle(&self, path: &Path) -> Result<()> {
        save::flush_chronicle(self.chronicle(), path)
    }
}
