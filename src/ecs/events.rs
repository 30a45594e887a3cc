use bevy_ecs::entity::Entity;
use bevy_ecs::message::Message;

use crate::ecs::state::GameStatus;
use crate::model::court::CourtOutcome;

/// Notable things that happened to a kingdom during a turn.
///
/// Systems write these as they go; `record_chronicle` turns them into
/// chronicle entries in `TurnPhase::Reactions`.
#[derive(Message, Clone, Debug, PartialEq)]
pub enum KingdomEvent {
    // -- Court --
    RulerCrowned {
        kingdom: Entity,
        ruler: String,
    },
    ElectionHeld {
        kingdom: Entity,
        winner: String,
        incumbent_won: bool,
    },
    CoupSucceeded {
        kingdom: Entity,
        usurper: String,
        deposed: String,
    },
    CoupFailed {
        kingdom: Entity,
        challenger: String,
    },
    RulerDied {
        kingdom: Entity,
        ruler: String,
    },
    CandidateEmerged {
        kingdom: Entity,
        candidate: String,
    },

    // -- Environment --
    WeatherChanged {
        kingdom: Entity,
        weather: String,
        severity: i32,
    },
    OutbreakStarted {
        kingdom: Entity,
        disease: String,
        severity: i32,
    },
    OutbreakEnded {
        kingdom: Entity,
        disease: String,
    },

    // -- Realm --
    UnrestBroke {
        kingdom: Entity,
    },
    RandomEvent {
        kingdom: Entity,
        name: String,
        magnitude: i32,
    },
    BattleFought {
        kingdom: Entity,
        victory: bool,
        units_lost: usize,
        gold_won: i64,
    },
    Bankruptcy {
        kingdom: Entity,
    },
    ThreatWarning {
        kingdom: Entity,
        strength: i32,
    },
    StabilityWarning {
        kingdom: Entity,
        stability: i32,
    },
    GameEnded {
        kingdom: Entity,
        status: GameStatus,
        score: i64,
    },
}

impl KingdomEvent {
    pub fn from_court(kingdom: Entity, outcome: CourtOutcome) -> Self {
        match outcome {
            CourtOutcome::Crowned { ruler } => KingdomEvent::RulerCrowned { kingdom, ruler },
            CourtOutcome::ElectionHeld {
                winner,
                incumbent_won,
            } => KingdomEvent::ElectionHeld {
                kingdom,
                winner,
                incumbent_won,
            },
            CourtOutcome::CoupSucceeded { usurper, deposed } => KingdomEvent::CoupSucceeded {
                kingdom,
                usurper,
                deposed,
            },
            CourtOutcome::CoupFailed { challenger } => KingdomEvent::CoupFailed {
                kingdom,
                challenger,
            },
            CourtOutcome::RulerDied { ruler } => KingdomEvent::RulerDied { kingdom, ruler },
            CourtOutcome::CandidateEmerged { candidate } => KingdomEvent::CandidateEmerged {
                kingdom,
                candidate,
            },
        }
    }

    pub fn kingdom(&self) -> Entity {
        match self {
            KingdomEvent::RulerCrowned { kingdom, .. }
            | KingdomEvent::ElectionHeld { kingdom, .. }
            | KingdomEvent::CoupSucceeded { kingdom, .. }
            | KingdomEvent::CoupFailed { kingdom, .. }
            | KingdomEvent::RulerDied { kingdom, .. }
            | KingdomEvent::CandidateEmerged { kingdom, .. }
            | KingdomEvent::WeatherChanged { kingdom, .. }
            | KingdomEvent::OutbreakStarted { kingdom, .. }
            | KingdomEvent::OutbreakEnded { kingdom, .. }
            | KingdomEvent::UnrestBroke { kingdom }
            | KingdomEvent::RandomEvent { kingdom, .. }
            | KingdomEvent::BattleFought { kingdom, .. }
            | KingdomEvent::Bankruptcy { kingdom }
            | KingdomEvent::ThreatWarning { kingdom, .. }
            | KingdomEvent::StabilityWarning { kingdom, .. }
            | KingdomEvent::GameEnded { kingdom, .. } => *kingdom,
        }
    }

    /// Short snake_case tag used as the chronicle entry kind.
    pub fn kind(&self) -> &'static str {
        match self {
            KingdomEvent::RulerCrowned { .. } => "ruler_crowned",
            KingdomEvent::ElectionHeld { .. } => "election_held",
            KingdomEvent::CoupSucceeded { .. } => "coup_succeeded",
            KingdomEvent::CoupFailed { .. } => "coup_failed",
            KingdomEvent::RulerDied { .. } => "ruler_died",
            KingdomEvent::CandidateEmerged { .. } => "candidate_emerged",
            KingdomEvent::WeatherChanged { .. } => "weather_changed",
            KingdomEvent::OutbreakStarted { .. } => "outbreak_started",
            KingdomEvent::OutbreakEnded { .. } => "outbreak_ended",
            KingdomEvent::UnrestBroke { .. } => "unrest_broke",
            KingdomEvent::RandomEvent { .. } => "random_event",
            KingdomEvent::BattleFought { .. } => "battle_fought",
            KingdomEvent::Bankruptcy { .. } => "bankruptcy",
            KingdomEvent::ThreatWarning { .. } => "threat_warning",
            KingdomEvent::StabilityWarning { .. } => "stability_warning",
            KingdomEvent::GameEnded { .. } => "game_ended",
        }
    }

    pub fn description(&self) -> String {
        match self {
            KingdomEvent::RulerCrowned { ruler, .. } => format!("{ruler} takes the throne"),
            KingdomEvent::ElectionHeld {
                winner, incumbent_won, ..
            } => {
                if *incumbent_won {
                    format!("{winner} is re-elected")
                } else {
                    format!("{winner} wins the election")
                }
            }
            KingdomEvent::CoupSucceeded { usurper, deposed, .. } => {
                format!("{usurper} overthrows {deposed}")
            }
            KingdomEvent::CoupFailed { challenger, .. } => {
                format!("A coup led by {challenger} is crushed")
            }
            KingdomEvent::RulerDied { ruler, .. } => format!("{ruler} has died"),
            KingdomEvent::CandidateEmerged { candidate, .. } => {
                format!("{candidate} enters the contest for the throne")
            }
            KingdomEvent::WeatherChanged { weather, severity, .. } => {
                format!("{weather} sets in (severity {severity})")
            }
            KingdomEvent::OutbreakStarted { disease, severity, .. } => {
                format!("An outbreak of {disease} (severity {severity})")
            }
            KingdomEvent::OutbreakEnded { disease, .. } => format!("The {disease} has passed"),
            KingdomEvent::UnrestBroke { .. } => "Unrest spreads among the people".to_string(),
            KingdomEvent::RandomEvent { name, magnitude, .. } => format!("{name} ({magnitude:+})"),
            KingdomEvent::BattleFought {
                victory,
                units_lost,
                gold_won,
                ..
            } => {
                if *victory {
                    format!("Victory in battle: {gold_won} gold taken, {units_lost} units lost")
                } else {
                    format!("Defeat in battle: {units_lost} units lost")
                }
            }
            KingdomEvent::Bankruptcy { .. } => "The treasury is empty".to_string(),
            KingdomEvent::ThreatWarning { strength, .. } => {
                format!("Scouts report a threatening army of strength {strength}")
            }
            KingdomEvent::StabilityWarning { stability, .. } => {
                format!("The kingdom is on the verge of collapse (stability {stability})")
            }
            KingdomEvent::GameEnded { status, score, .. } => {
                format!("The game ends in {status:?} with a score of {score}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn court_outcomes_keep_their_names() {
        let mut world = bevy_ecs::world::World::new();
        let kingdom = world.spawn_empty().id();
        let event = KingdomEvent::from_court(
            kingdom,
            CourtOutcome::CoupSucceeded {
                usurper: "Duke Hal".into(),
                deposed: "King Tom".into(),
            },
        );
        assert_eq!(event.kingdom(), kingdom);
        assert_eq!(event.kind(), "coup_succeeded");
        assert_eq!(event.description(), "Duke Hal overthrows King Tom");
    }

    #[test]
    fn battle_description_reports_spoils() {
        let event = KingdomEvent::BattleFought {
            kingdom: Entity::PLACEHOLDER,
            victory: true,
            units_lost: 1,
            gold_won: 420,
        };
        assert_eq!(
            event.description(),
            "Victory in battle: 420 gold taken, 1 units lost"
        );
    }
}
