//! Saving and loading whole games as JSON snapshots, and flushing the
//! chronicle to JSONL.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use bevy_app::App;
use bevy_ecs::query::With;
use bevy_ecs::schedule::ExecutorKind;
use bevy_ecs::world::World;
use serde::{Deserialize, Serialize};

use crate::config::{Difficulty, GameConfig};
use crate::ecs::app::build_game_app_with_executor;
use crate::ecs::components::{
    ActiveEvents, Affliction, Army, Bank, Court, Economy, Kingdom, KingdomCore, Population, Weather,
};
use crate::ecs::plugin::GamePlugin;
use crate::ecs::resources::{Chronicle, ChronicleEntry, GameRng};
use crate::ecs::spawn::{KingdomBundle, spawn_kingdom};
use crate::ecs::state::{GameState, GameStatus};
use crate::error::{GameError, Result};

pub const SNAPSHOT_VERSION: u32 = 1;

/// Every component of one kingdom. `core.player` tells the player's kingdom
/// from the rivals.
pub type KingdomSnapshot = KingdomBundle;

/// A complete saved game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub version: u32,
    pub seed: u64,
    pub turn: u32,
    pub status: GameStatus,
    pub paused: bool,
    pub speed: u8,
    pub difficulty: Difficulty,
    pub final_score: Option<i64>,
    pub config: GameConfig,
    /// The player's kingdom first, then the rivals in spawn order.
    pub kingdoms: Vec<KingdomSnapshot>,
    pub chronicle: Vec<ChronicleEntry>,
}

impl GameSnapshot {
    /// Capture the current game.
    pub fn capture(world: &mut World) -> Self {
        let mut query = world.query_filtered::<(
            &KingdomCore,
            &Population,
            &Economy,
            &Army,
            &Court,
            &Bank,
            &Weather,
            &Affliction,
            &ActiveEvents,
        ), With<Kingdom>>();
        let mut kingdoms: Vec<KingdomSnapshot> = query
            .iter(world)
            .map(
                |(core, population, economy, army, court, bank, weather, affliction, events)| KingdomBundle {
                    core: core.clone(),
                    population: population.clone(),
                    economy: economy.clone(),
                    army: army.clone(),
                    court: court.clone(),
                    bank: bank.clone(),
                    weather: weather.clone(),
                    affliction: affliction.clone(),
                    events: events.clone(),
                },
            )
            .collect();
        kingdoms.sort_by_key(|k| !k.core.player);

        let state = world.resource::<GameState>();
        Self {
            version: SNAPSHOT_VERSION,
            seed: world.resource::<GameRng>().seed,
            turn: state.turn,
            status: state.status,
            paused: state.paused,
            speed: state.speed(),
            difficulty: state.difficulty,
            final_score: state.final_score,
            config: world.resource::<GameConfig>().clone(),
            kingdoms,
            chronicle: world.resource::<Chronicle>().entries.clone(),
        }
    }

    /// Rebuild a playable app with every game system installed.
    pub fn restore(self, executor: ExecutorKind) -> Result<App> {
        if self.version != SNAPSHOT_VERSION {
            return Err(GameError::Config(format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                self.version
            )));
        }
        self.config.validate()?;
        for kingdom in &self.kingdoms {
            kingdom.economy.check_resources()?;
        }

        let mut app = build_game_app_with_executor(&self.config, self.seed, executor);
        app.add_plugins(GamePlugin);

        let world = app.world_mut();
        let mut player = None;
        for kingdom in self.kingdoms {
            let is_player = kingdom.core.player;
            let entity = spawn_kingdom(world, kingdom);
            if is_player {
                player = Some(entity);
            }
        }

        let mut state = world.resource_mut::<GameState>();
        state.turn = self.turn;
        state.status = self.status;
        state.paused = self.paused;
        state.set_speed(self.speed);
        state.difficulty = self.difficulty;
        state.final_score = self.final_score;
        state.player = player;
        world.resource_mut::<Chronicle>().entries = self.chronicle;

        tracing::info!(turn = self.turn, "game restored");
        Ok(app)
    }
}

/// Write the game in `world` to `path` as JSON.
pub fn save_game(world: &mut World, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let snapshot = GameSnapshot::capture(world);
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &snapshot)?;
    writer.flush()?;
    tracing::info!(path = %path.display(), turn = snapshot.turn, "game saved");
    Ok(())
}

/// Load a game saved by [`save_game`].
pub fn load_game(path: &Path, executor: ExecutorKind) -> Result<App> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: GameSnapshot = serde_json::from_reader(reader)?;
    snapshot.restore(executor)
}

/// Write the chronicle to a JSONL file (one entry per line).
pub fn flush_chronicle(chronicle: &Chronicle, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    for entry in &chronicle.entries {
        serde_json::to_writer(&mut writer, entry)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::BufRead;

    use super::*;
    use crate::ecs::app::build_game_app_deterministic;
    use crate::ecs::spawn::new_game;
    use crate::ecs::test_helpers::{player, tick_turns};

    fn started_game(config: &GameConfig) -> App {
        let mut app = build_game_app_deterministic(config, config.seed);
        app.add_plugins(GamePlugin);
        new_game(app.world_mut(), config);
        app
    }

    #[test]
    fn snapshot_round_trip_keeps_the_kingdoms() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saves").join("game.json");
        let config = GameConfig {
            rival_count: 2,
            ..GameConfig::default()
        };
        let mut app = started_game(&config);
        tick_turns(&mut app, 5);

        save_game(app.world_mut(), &path).unwrap();
        let mut loaded = load_game(&path, ExecutorKind::SingleThreaded).unwrap();

        let state = loaded.world().resource::<GameState>();
        assert_eq!(state.turn, 5);
        assert_eq!(state.status, GameStatus::Running);
        let original = app.world().get::<Economy>(player(&app)).unwrap().clone();
        let restored = loaded.world().get::<Economy>(player(&loaded)).unwrap().clone();
        assert_eq!(original, restored);

        let mut kingdoms = loaded.world_mut().query::<&KingdomCore>();
        assert_eq!(kingdoms.iter(loaded.world()).count(), 3);
        assert_eq!(
            loaded.world().resource::<Chronicle>().entries,
            app.world().resource::<Chronicle>().entries
        );
    }

    #[test]
    fn resumed_game_plays_out_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        let config = GameConfig::default();

        let mut straight = started_game(&config);
        tick_turns(&mut straight, 20);

        let mut first_half = started_game(&config);
        tick_turns(&mut first_half, 10);
        save_game(first_half.world_mut(), &path).unwrap();
        let mut resumed = load_game(&path, ExecutorKind::SingleThreaded).unwrap();
        tick_turns(&mut resumed, 10);

        assert_eq!(
            straight.world().resource::<Chronicle>().entries,
            resumed.world().resource::<Chronicle>().entries
        );
        let a = straight.world().get::<KingdomCore>(player(&straight)).unwrap();
        let b = resumed.world().get::<KingdomCore>(player(&resumed)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_game(&dir.path().join("nope.json"), ExecutorKind::SingleThreaded);
        assert!(matches!(result, Err(GameError::Io(_))));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let result = load_game(&path, ExecutorKind::SingleThreaded);
        assert!(matches!(result, Err(GameError::Serialization(_))));
    }

    #[test]
    fn future_versions_are_rejected() {
        let mut app = started_game(&GameConfig::default());
        let mut snapshot = GameSnapshot::capture(app.world_mut());
        snapshot.version = SNAPSHOT_VERSION + 1;
        assert!(matches!(
            snapshot.restore(ExecutorKind::SingleThreaded),
            Err(GameError::Config(_))
        ));
    }

    #[test]
    fn chronicle_flushes_one_entry_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chronicle.jsonl");
        let mut chronicle = Chronicle::new();
        chronicle.record(1, "New Kingdom", "unrest_broke", "Unrest spreads among the people");
        chronicle.record(2, "Rival Kingdom", "threat_warning", "Rival Kingdom musters 900 strength");

        flush_chronicle(&chronicle, &path).unwrap();

        let file = BufReader::new(File::open(&path).unwrap());
        let entries: Vec<ChronicleEntry> = file
            .lines()
            .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
            .collect();
        assert_eq!(entries, chronicle.entries);
    }
}
