use bevy_ecs::component::Component;
use serde::{Deserialize, Serialize};

use crate::model::disease::Disease;

// ---------------------------------------------------------------------------
// Marker components
// ---------------------------------------------------------------------------

/// Present on every kingdom entity.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Kingdom;

/// The kingdom the player governs.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct IsPlayer;

/// A kingdom governed by the rival AI.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Rival;

/// The disease currently ravaging a kingdom, if any.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Affliction(pub Option<Disease>);

impl Affliction {
    pub fn disease(&self) -> Option<&Disease> {
        self.0.as_ref()
    }
}
