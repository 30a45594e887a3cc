use bevy_ecs::bundle::Bundle;
use bevy_ecs::entity::Entity;
use bevy_ecs::world::{Mut, World};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::ecs::components::{
    ActiveEvents, Affliction, Army, Bank, Court, Economy, IsPlayer, Kingdom, KingdomCore,
    Population, Rival, Weather,
};
use crate::ecs::resources::GameRng;
use crate::ecs::state::GameState;
use crate::model::leader::{Leader, LeadershipTrait, LeadershipTraitType};

pub const STARTING_POPULATION: i32 = 1000;

const RIVAL_NAME: &str = "Rival Kingdom";
const RIVAL_RULER: &str = "AI Ruler";
const RIVAL_TITLE: &str = "Enemy King";

/// Every per-subsystem component a kingdom entity carries.
#[derive(Bundle, Debug, Clone, Serialize, Deserialize)]
pub struct KingdomBundle {
    pub core: KingdomCore,
    pub population: Population,
    pub economy: Economy,
    pub army: Army,
    pub court: Court,
    pub bank: Bank,
    pub weather: Weather,
    pub affliction: Affliction,
    pub events: ActiveEvents,
}

impl KingdomBundle {
    /// A fresh kingdom of 1000 souls with `ruler` on the throne.
    pub fn founded(
        name: impl Into<String>,
        player: bool,
        gold: i64,
        ruler: Leader,
        election_cycle: i32,
        rng: &mut impl Rng,
    ) -> Self {
        let mut court = Court::new(election_cycle, rng);
        court.install_ruler(ruler);
        Self {
            core: KingdomCore::new(name, player),
            population: Population::new(STARTING_POPULATION),
            economy: Economy::with_gold(gold),
            army: Army::new(),
            court,
            bank: Bank::new(),
            weather: Weather::clear_skies(rng),
            affliction: Affliction::default(),
            events: ActiveEvents::default(),
        }
    }
}

/// Spawn a kingdom, tagging it as the player's or a rival from `core.player`.
pub fn spawn_kingdom(world: &mut World, bundle: KingdomBundle) -> Entity {
    let player = bundle.core.player;
    let mut entity = world.spawn((Kingdom, bundle));
    if player {
        entity.insert(IsPlayer);
    } else {
        entity.insert(Rival);
    }
    entity.id()
}

/// The player's ruler: stats 50–80 and a charismatic streak.
pub fn player_ruler(config: &GameConfig, rng: &mut impl Rng) -> Leader {
    let mut ruler = Leader::new(config.ruler_name.as_str(), config.ruler_title.as_str());
    ruler.set_intelligence(rng.random_range(50..=80));
    ruler.set_military(rng.random_range(50..=80));
    ruler.set_economic(rng.random_range(50..=80));
    ruler.add_trait(LeadershipTrait::new(LeadershipTraitType::Charismatic, true));
    ruler
}

/// A rival ruler: stats 60–90, raised by the difficulty bonus.
pub fn rival_ruler(config: &GameConfig, rng: &mut impl Rng) -> Leader {
    let bonus = config.difficulty.rival_stat_bonus();
    let mut ruler = Leader::new(RIVAL_RULER, RIVAL_TITLE);
    ruler.set_intelligence((rng.random_range(60..=90) + bonus).min(100));
    ruler.set_military((rng.random_range(60..=90) + bonus).min(100));
    ruler.set_economic((rng.random_range(60..=90) + bonus).min(100));
    ruler
}

fn rival_name(index: u32, count: u32) -> String {
    if count > 1 {
        format!("{RIVAL_NAME} {}", index + 1)
    } else {
        RIVAL_NAME.to_string()
    }
}

/// Populate the world with the player's kingdom and its rivals.
///
/// Records the player entity in `GameState` and returns it.
pub fn new_game(world: &mut World, config: &GameConfig) -> Entity {
    let (home, rivals) = world.resource_scope(|_world, mut rng: Mut<GameRng>| {
        let rng = &mut rng.rng;
        let gold = config.difficulty.starting_gold();
        let ruler = player_ruler(config, rng);
        let home = KingdomBundle::founded(
            config.kingdom_name.as_str(),
            true,
            gold,
            ruler,
            config.election_cycle,
            rng,
        );
        let rivals: Vec<KingdomBundle> = (0..config.rival_count)
            .map(|i| {
                let ruler = rival_ruler(config, rng);
                KingdomBundle::founded(
                    rival_name(i, config.rival_count),
                    false,
                    gold,
                    ruler,
                    config.election_cycle,
                    rng,
                )
            })
            .collect();
        (home, rivals)
    });

    let player = spawn_kingdom(world, home);
    for rival in rivals {
        spawn_kingdom(world, rival);
    }
    world.resource_mut::<GameState>().player = Some(player);
    tracing::info!(
        kingdom = %config.kingdom_name,
        rivals = config.rival_count,
        difficulty = ?config.difficulty,
        "new game"
    );
    player
}

#[cfg(test)]
mod tests {
    use bevy_ecs::query::With;

    use super::*;
    use crate::config::Difficulty;

    fn world_with_rng(seed: u64) -> World {
        let mut world = World::new();
        world.insert_resource(GameRng::new(seed));
        world.insert_resource(GameState::default());
        world
    }

    #[test]
    fn new_game_spawns_player_and_rivals() {
        let mut world = world_with_rng(42);
        let config = GameConfig {
            rival_count: 2,
            ..GameConfig::default()
        };
        let player = new_game(&mut world, &config);

        assert_eq!(world.resource::<GameState>().player, Some(player));
        let core = world.get::<KingdomCore>(player).unwrap();
        assert_eq!(core.name, "New Kingdom");
        assert!(core.player);
        assert!(world.get::<IsPlayer>(player).is_some());

        let mut rivals = world.query_filtered::<&KingdomCore, With<Rival>>();
        let mut names: Vec<String> = rivals.iter(&world).map(|c| c.name.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["Rival Kingdom 1", "Rival Kingdom 2"]);
    }

    #[test]
    fn player_ruler_is_charismatic_within_range() {
        let mut world = world_with_rng(7);
        let player = new_game(&mut world, &GameConfig::default());
        let court = world.get::<Court>(player).unwrap();
        let ruler = court.ruler().unwrap();
        assert_eq!(ruler.name(), "Ruler");
        assert_eq!(ruler.title, "Lord");
        assert!(ruler.traits().iter().any(|t| t.kind == LeadershipTraitType::Charismatic));
        assert!((50..=80).contains(&ruler.intelligence()));
    }

    #[test]
    fn single_rival_is_unnumbered() {
        assert_eq!(rival_name(0, 1), "Rival Kingdom");
        assert_eq!(rival_name(2, 3), "Rival Kingdom 3");
    }

    #[test]
    fn hardcore_rivals_are_capped_at_100() {
        let config = GameConfig {
            difficulty: Difficulty::Hardcore,
            ..GameConfig::default()
        };
        let mut rng = GameRng::new(3).rng;
        for _ in 0..50 {
            let ruler = rival_ruler(&config, &mut rng);
            assert!((70..=100).contains(&ruler.military()));
            assert_eq!(ruler.title, "Enemy King");
        }
    }

    #[test]
    fn starting_gold_follows_difficulty() {
        let mut world = world_with_rng(1);
        let config = GameConfig {
            difficulty: Difficulty::Easy,
            ..GameConfig::default()
        };
        let player = new_game(&mut world, &config);
        assert_eq!(world.get::<Economy>(player).unwrap().treasury.gold(), 1000);
    }
}
