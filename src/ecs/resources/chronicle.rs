use bevy_ecs::resource::Resource;
use serde::{Deserialize, Serialize};

/// One line of the kingdom's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChronicleEntry {
    pub turn: u32,
    pub kingdom: String,
    pub kind: String,
    pub description: String,
}

/// Accumulates chronicle entries between flushes.
#[derive(Resource, Debug, Clone, Default)]
pub struct Chronicle {
    pub entries: Vec<ChronicleEntry>,
}

impl Chronicle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn record(
        &mut self,
        turn: u32,
        kingdom: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.entries.push(ChronicleEntry {
            turn,
            kingdom: kingdom.into(),
            kind: kind.into(),
            description: description.into(),
        });
    }

    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a ChronicleEntry> + 'a {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    pub fn for_turn(&self, turn: u32) -> impl Iterator<Item = &ChronicleEntry> {
        self.entries.iter().filter(move |e| e.turn == turn)
    }
}
