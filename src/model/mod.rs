#[macro_use]
mod macros;

pub mod action;
pub mod army;
pub mod bank;
pub mod court;
pub mod disease;
pub mod economy;
pub mod environment;
pub mod event;
pub mod human;
pub mod kingdom;
pub mod leader;
pub mod military;
pub mod population;
pub mod social_class;
pub mod stats;
pub mod treasury;

pub use action::{
    Action, ActionOutcome, ActionResult, ActionSource, BattleKind, KingdomAction, TrainingProgram, UnitKind,
};
pub use army::Army;
pub use bank::{Bank, BankReport, Investment, Loan};
pub use court::{Court, CourtOutcome};
pub use disease::{Disease, DiseaseReport, DiseaseType};
pub use economy::{Economy, Resource, ResourceType, TradeRoute};
pub use environment::{EnvironmentalEffect, TerrainType, Weather, WeatherType};
pub use event::{ActiveEvents, EventCategory, EventType, RandomEvent};
pub use human::Human;
pub use kingdom::{KingdomCore, KingdomView};
pub use leader::{Leader, LeadershipTrait, LeadershipTraitType};
pub use military::{CombatStrategy, CombatUnit, MilitaryUnit};
pub use population::{Population, PopulationReport};
pub use social_class::SocialClass;
pub use treasury::Treasury;
