use std::hash::{DefaultHasher, Hash, Hasher};

use bevy_ecs::resource::Resource;
use bevy_ecs::world::World;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::ecs::state::GameState;
use crate::model::action::{Action, ActionResult};

/// Deterministic RNG for the game.
#[derive(Resource)]
pub struct GameRng {
    pub rng: SmallRng,
    pub seed: u64,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            seed,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-domain RNG resources
// ---------------------------------------------------------------------------

macro_rules! domain_rng {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Resource)]
        pub struct $name(pub SmallRng);

        impl Default for $name {
            fn default() -> Self {
                Self(SmallRng::seed_from_u64(0))
            }
        }
    };
}

domain_rng!(ActionsRng, "Per-domain RNG for player actions.");
domain_rng!(LeadershipRng, "Per-domain RNG for succession and court politics.");
domain_rng!(WeatherRng, "Per-domain RNG for Weather systems.");
domain_rng!(DiseaseRng, "Per-domain RNG for Disease systems.");
domain_rng!(PopulationRng, "Per-domain RNG for Population systems.");
domain_rng!(EconomyRng, "Per-domain RNG for Economy systems.");
domain_rng!(MilitaryRng, "Per-domain RNG for Military systems.");
domain_rng!(EventsRng, "Per-domain RNG for random events.");
domain_rng!(BankRng, "Per-domain RNG for Bank systems.");
domain_rng!(StabilityRng, "Per-domain RNG for stability.");
domain_rng!(RivalsRng, "Per-domain RNG for rival AI decisions.");

/// Derive a deterministic per-domain seed from the global seed, domain name, and turn.
fn derive_domain_seed(seed: u64, domain: &str, turn: u32) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    domain.hash(&mut hasher);
    turn.hash(&mut hasher);
    hasher.finish()
}

/// Exclusive system that re-seeds all per-domain RNGs each turn.
/// Runs in `TurnPhase::PreUpdate` before any domain systems.
pub fn distribute_rng(world: &mut World) {
    let seed = world.resource::<GameRng>().seed;
    let turn = world.resource::<GameState>().turn;

    macro_rules! reseed {
        ($res:ty, $label:expr) => {
            world.resource_mut::<$res>().0 = SmallRng::seed_from_u64(derive_domain_seed(seed, $label, turn));
        };
    }

    reseed!(ActionsRng, "actions");
    reseed!(LeadershipRng, "leadership");
    reseed!(WeatherRng, "weather");
    reseed!(DiseaseRng, "disease");
    reseed!(PopulationRng, "population");
    reseed!(EconomyRng, "economy");
    reseed!(MilitaryRng, "military");
    reseed!(EventsRng, "events");
    reseed!(BankRng, "bank");
    reseed!(StabilityRng, "stability");
    reseed!(RivalsRng, "rivals");
}

/// Actions queued for processing at the start of the next turn.
#[derive(Resource, Debug, Clone, Default)]
pub struct PendingActions(pub Vec<Action>);

/// Results from processed actions.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActionResults(pub Vec<ActionResult>);

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn domain_seeds_differ_by_domain_and_turn() {
        let a = derive_domain_seed(42, "weather", 1);
        assert_ne!(a, derive_domain_seed(42, "disease", 1));
        assert_ne!(a, derive_domain_seed(42, "weather", 2));
        assert_eq!(a, derive_domain_seed(42, "weather", 1));
    }

    #[test]
    fn distribute_rng_is_repeatable() {
        fn draw(seed: u64) -> u32 {
            let mut world = World::new();
            world.insert_resource(GameRng::new(seed));
            world.insert_resource(GameState::default());
            macro_rules! init {
                ($($res:ty),*) => { $(world.init_resource::<$res>();)* };
            }
            init!(
                ActionsRng, LeadershipRng, WeatherRng, DiseaseRng, PopulationRng, EconomyRng,
                MilitaryRng, EventsRng, BankRng, StabilityRng, RivalsRng
            );
            distribute_rng(&mut world);
            world.resource_mut::<WeatherRng>().0.random()
        }
        assert_eq!(draw(7), draw(7));
        assert_ne!(draw(7), draw(8));
    }
}
