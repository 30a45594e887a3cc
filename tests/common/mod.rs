#![allow(dead_code)]

use std::path::Path;

use stronghold::{GameConfig, GameSession};

/// A fresh game on the single-threaded executor with `tweak` applied to the
/// default config.
pub fn new_game_with(tweak: impl FnOnce(&mut GameConfig)) -> GameSession {
    let mut config = GameConfig::default();
    tweak(&mut config);
    GameSession::new(config).unwrap()
}

pub fn new_game() -> GameSession {
    new_game_with(|_| {})
}

pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
