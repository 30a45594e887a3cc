//! Player commands for the action queue.
//!
//! External code queues `Action`s on the world; the actions system drains
//! them at the start of each turn and produces `ActionResult`s.

use serde::{Deserialize, Serialize};

use super::economy::ResourceType;
use super::environment::TerrainType;
use super::military::CombatStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSource {
    /// External player input
    Player,
    /// The player's kingdom governed by the rival AI
    Autopilot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub source: ActionSource,
    pub kind: KingdomAction,
}

impl Action {
    pub fn player(kind: KingdomAction) -> Self {
        Self {
            source: ActionSource::Player,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum KingdomAction {
    // -- Economy --
    SetTaxRate { class: usize, rate: f64 },
    SetGatherRate { resource: ResourceType, rate: i64 },
    SetConsumptionRate { resource: ResourceType, rate: i64 },
    SetStockpile { resource: ResourceType, on: bool },
    Barter { sell: ResourceType, amount: i64, buy: ResourceType },
    EstablishTradeRoute {
        partner: String,
        export: ResourceType,
        export_amount: i64,
        import: ResourceType,
    },
    CancelTradeRoute { index: usize },

    // -- Bank --
    TakeLoan { amount: i64, term: i32 },
    RepayLoans { amount: i64 },
    Invest { amount: i64, term: i32 },
    SetInterestRate { percent: f64 },
    AuditBank,
    ReviewInterestRate,

    // -- Military --
    Recruit { kind: UnitKind, units: u32 },
    Train { program: TrainingProgram },
    Disband { index: usize },
    SetStrategy { strategy: CombatStrategy },
    Battle {
        kind: BattleKind,
        strategy: CombatStrategy,
        #[serde(default)]
        terrain: TerrainType,
    },

    // -- Court --
    HoldElection,
}

impl KingdomAction {
    pub fn label(&self) -> &'static str {
        match self {
            KingdomAction::SetTaxRate { .. } => "set tax rate",
            KingdomAction::SetGatherRate { .. } => "set gather rate",
            KingdomAction::SetConsumptionRate { .. } => "set consumption rate",
            KingdomAction::SetStockpile { .. } => "set stockpile",
            KingdomAction::Barter { .. } => "barter",
            KingdomAction::EstablishTradeRoute { .. } => "establish trade route",
            KingdomAction::CancelTradeRoute { .. } => "cancel trade route",
            KingdomAction::TakeLoan { .. } => "take loan",
            KingdomAction::RepayLoans { .. } => "repay loans",
            KingdomAction::Invest { .. } => "invest",
            KingdomAction::SetInterestRate { .. } => "set interest rate",
            KingdomAction::AuditBank => "audit bank",
            KingdomAction::ReviewInterestRate => "review interest rate",
            KingdomAction::Recruit { .. } => "recruit",
            KingdomAction::Train { .. } => "train",
            KingdomAction::Disband { .. } => "disband",
            KingdomAction::SetStrategy { .. } => "set strategy",
            KingdomAction::Battle { .. } => "battle",
            KingdomAction::HoldElection => "hold election",
        }
    }
}

// ---------------------------------------------------------------------------
// Recruitment
// ---------------------------------------------------------------------------

pub const SOLDIERS_PER_UNIT: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum UnitKind {
    Infantry,
    Archers,
    Cavalry,
    RoyalGuards,
}

string_enum!(UnitKind {
    Infantry => "infantry",
    Archers => "archers",
    Cavalry => "cavalry",
    RoyalGuards => "royal_guards",
});

impl UnitKind {
    pub fn label(&self) -> &'static str {
        match self {
            UnitKind::Infantry => "Infantry",
            UnitKind::Archers => "Archers",
            UnitKind::Cavalry => "Cavalry",
            UnitKind::RoyalGuards => "Royal Guards",
        }
    }

    /// Gold per unit of ten soldiers.
    pub fn cost(&self) -> i64 {
        match self {
            UnitKind::Infantry => 50,
            UnitKind::Archers => 75,
            UnitKind::Cavalry => 100,
            UnitKind::RoyalGuards => 150,
        }
    }

    /// (attack, defense, speed)
    pub fn stats(&self) -> (i32, i32, i32) {
        match self {
            UnitKind::Infantry => (10, 15, 5),
            UnitKind::Archers => (15, 5, 8),
            UnitKind::Cavalry => (20, 10, 15),
            UnitKind::RoyalGuards => (25, 20, 10),
        }
    }
}

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TrainingProgram {
    Basic,
    Advanced,
    Special,
}

string_enum!(TrainingProgram {
    Basic => "basic",
    Advanced => "advanced",
    Special => "special",
});

pub struct ProgramSpec {
    pub cost: i64,
    pub discipline: i32,
    pub morale: i32,
    pub strength_pct: i32,
}

impl TrainingProgram {
    pub fn spec(&self) -> ProgramSpec {
        let (cost, discipline, morale, strength_pct) = match self {
            TrainingProgram::Basic => (50, 10, 5, 5),
            TrainingProgram::Advanced => (100, 5, 10, 10),
            TrainingProgram::Special => (150, 10, 15, 15),
        };
        ProgramSpec {
            cost,
            discipline,
            morale,
            strength_pct,
        }
    }
}

// ---------------------------------------------------------------------------
// Battle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum BattleKind {
    Raid,
    Skirmish,
    Major,
}

string_enum!(BattleKind {
    Raid => "raid",
    Skirmish => "skirmish",
    Major => "major",
});

pub struct BattleSpec {
    /// Enemy strength as a multiple of ours.
    pub enemy_ratio: f64,
    /// (base, random extra)
    pub gold: (i64, i64),
    pub resources: (i64, i64),
    /// Percent chance of losing each unit.
    pub unit_loss_risk: f64,
}

impl BattleKind {
    pub fn spec(&self) -> BattleSpec {
        match self {
            BattleKind::Raid => BattleSpec {
                enemy_ratio: 0.6,
                gold: (200, 300),
                resources: (50, 100),
                unit_loss_risk: 20.0,
            },
            BattleKind::Skirmish => BattleSpec {
                enemy_ratio: 0.9,
                gold: (500, 500),
                resources: (100, 200),
                unit_loss_risk: 40.0,
            },
            BattleKind::Major => BattleSpec {
                enemy_ratio: 1.2,
                gold: (1000, 1000),
                resources: (300, 300),
                unit_loss_risk: 60.0,
            },
        }
    }
}

/// (strength, reward, casualty) multipliers for a battle plan.
pub fn strategy_modifiers(strategy: CombatStrategy) -> (f64, f64, f64) {
    match strategy {
        CombatStrategy::Aggressive => (1.2, 1.3, 1.5),
        CombatStrategy::Defensive => (0.8, 0.7, 0.6),
        CombatStrategy::Balanced | CombatStrategy::Guerrilla => (1.0, 1.0, 1.0),
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResult {
    pub source: ActionSource,
    pub action: &'static str,
    pub outcome: ActionOutcome,
}

impl ActionResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ActionOutcome::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Success { summary: String },
    Failed { reason: String },
}
