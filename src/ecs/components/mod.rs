pub mod common;

pub use common::{Affliction, IsPlayer, Kingdom, Rival};
pub use crate::model::{
    ActiveEvents, Army, Bank, Court, Economy, KingdomCore, Population, Weather,
};
