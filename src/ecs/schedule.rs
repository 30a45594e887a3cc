use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, ScheduleLabel, SystemSet};

use super::conditions::game_running;
use super::state::advance_turn;

/// Schedule label for one game turn.
/// Run manually each turn via `app.world_mut().run_schedule(TurnTick)`.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TurnTick;

/// Ordered phases within each turn.
///
/// Systems are assigned to phases via `.in_set(TurnPhase::Update)` etc.
/// Phases run in declaration order: PreUpdate < Update < PostUpdate < Reactions < Last.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    PreUpdate,
    Update,
    PostUpdate,
    Reactions,
    Last,
}

/// Per-domain system sets within `TurnPhase::Update`.
///
/// Every kingdom walks the same fixed sequence, so the domains form one chain:
/// ```text
/// Actions → Leadership → Weather → Disease → Population → Economy
///         → Military → Court → Events → Bank → Stability → Rivals
/// ```
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainSet {
    Actions,
    Leadership,
    Weather,
    Disease,
    Population,
    Economy,
    Military,
    Court,
    Events,
    Bank,
    Stability,
    Rivals,
}

impl DomainSet {
    pub const ORDER: [DomainSet; 12] = [
        DomainSet::Actions,
        DomainSet::Leadership,
        DomainSet::Weather,
        DomainSet::Disease,
        DomainSet::Population,
        DomainSet::Economy,
        DomainSet::Military,
        DomainSet::Court,
        DomainSet::Events,
        DomainSet::Bank,
        DomainSet::Stability,
        DomainSet::Rivals,
    ];
}

/// Configure the domain chain within `TurnPhase::Update`.
fn configure_domain_ordering(schedule: &mut Schedule) {
    for set in DomainSet::ORDER {
        schedule.configure_sets(set.in_set(TurnPhase::Update));
    }
    for pair in DomainSet::ORDER.windows(2) {
        schedule.configure_sets(pair[1].clone().after(pair[0].clone()));
    }
}

/// Build a configured `TurnTick` schedule with phase ordering.
///
/// `Update` and `PostUpdate` are skipped while the game is paused or over.
/// `Reactions` always runs so the closing messages reach the chronicle.
/// The turn counter advances in `PostUpdate`.
pub fn configure_turn_schedule(executor: ExecutorKind) -> Schedule {
    let mut schedule = Schedule::new(TurnTick);
    schedule.set_executor_kind(executor);
    schedule.configure_sets(
        (
            TurnPhase::PreUpdate,
            TurnPhase::Update,
            TurnPhase::PostUpdate,
            TurnPhase::Reactions,
            TurnPhase::Last,
        )
            .chain(),
    );
    schedule.configure_sets(TurnPhase::Update.run_if(game_running));
    schedule.configure_sets(TurnPhase::PostUpdate.run_if(game_running));
    configure_domain_ordering(&mut schedule);
    schedule.add_systems(advance_turn.in_set(TurnPhase::PostUpdate));
    schedule
}
