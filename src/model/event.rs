use bevy_ecs::component::Component;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::army::Army;
use super::economy::{Economy, ResourceType};
use super::population::Population;
use super::stats::pick;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EventType {
    Positive,
    Negative,
    Neutral,
}

string_enum!(EventType {
    Positive => "positive",
    Negative => "negative",
    Neutral => "neutral",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EventCategory {
    Harvest,
    Economic,
    Military,
    Resource,
    Population,
}

string_enum!(EventCategory {
    Harvest => "harvest",
    Economic => "economic",
    Military => "military",
    Resource => "resource",
    Population => "population",
});

impl EventCategory {
    pub fn event_name(&self, kind: EventType) -> &'static str {
        use EventType::{Negative, Neutral, Positive};
        match (*self, kind) {
            (EventCategory::Harvest, Positive) => "Bountiful Harvest",
            (EventCategory::Harvest, Negative) => "Drought",
            (EventCategory::Harvest, Neutral) => "Average Harvest",
            (EventCategory::Economic, Positive) => "Trade Boom",
            (EventCategory::Economic, Negative) => "Economic Crisis",
            (EventCategory::Economic, Neutral) => "Market Fluctuations",
            (EventCategory::Military, Positive) => "Military Parade",
            (EventCategory::Military, Negative) => "Military Desertion",
            (EventCategory::Military, Neutral) => "New Recruits",
            (EventCategory::Resource, Positive) => "Gold Mine Discovery",
            (EventCategory::Resource, Negative) => "Resource Shortage",
            (EventCategory::Resource, Neutral) => "Resource Discovery",
            (EventCategory::Population, Positive) => "Population Growth",
            (EventCategory::Population, Negative) => "Plague Outbreak",
            (EventCategory::Population, Neutral) => "Migration",
        }
    }
}

/// A short-lived stroke of fortune or misfortune.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomEvent {
    pub name: String,
    pub kind: EventType,
    pub category: EventCategory,
    /// Signed strength of the event, in percent.
    pub magnitude: i32,
    pub duration: i32,
    pub turns_remaining: i32,
    pub active: bool,
}

impl RandomEvent {
    pub fn new(category: EventCategory, kind: EventType, magnitude: i32, duration: i32) -> Self {
        let duration = duration.max(1);
        Self {
            name: category.event_name(kind).to_string(),
            kind,
            category,
            magnitude,
            duration,
            turns_remaining: duration,
            active: true,
        }
    }

    pub fn generate(rng: &mut impl Rng) -> Self {
        let category = *pick(rng, EventCategory::ALL);
        let kind = match rng.random_range(1..=10) {
            1..=4 => EventType::Positive,
            5..=8 => EventType::Negative,
            _ => EventType::Neutral,
        };
        let duration = rng.random_range(1..=5);
        let magnitude = match kind {
            EventType::Positive => rng.random_range(5..=20),
            EventType::Negative => -rng.random_range(5..=20),
            EventType::Neutral => rng.random_range(-5..=5),
        };
        Self::new(category, kind, magnitude, duration)
    }

    pub fn apply(&self, population: &mut Population, economy: &mut Economy, army: &mut Army, rng: &mut impl Rng) {
        let e = self.magnitude;
        match self.category {
            EventCategory::Population => population.handle_event(e, rng),
            EventCategory::Harvest => shift_stock(economy, ResourceType::Food, e),
            EventCategory::Resource => {
                let kind = *pick(rng, ResourceType::ALL);
                shift_stock(economy, kind, e);
            }
            EventCategory::Economic => {
                if e >= 0 {
                    economy.set_production_level(economy.production_level() + e / 2);
                    economy.set_trade_level(economy.trade_level() + e / 3);
                    economy.treasury.earn(e as i64 * 10);
                } else {
                    economy.set_production_level((economy.production_level() + e / 2).max(10));
                    economy.set_trade_level((economy.trade_level() + e / 3).max(10));
                    economy.treasury.spend_up_to(-e as i64 * 10);
                }
            }
            EventCategory::Military => {
                if e >= 0 {
                    army.set_training(army.training() + e / 3);
                } else {
                    army.set_training((army.training() + e / 3).max(10));
                }
                army.adjust_unit_morale(e / 2);
            }
        }
    }

    pub fn update(&mut self) {
        if !self.active {
            return;
        }
        self.turns_remaining -= 1;
        if self.turns_remaining <= 0 {
            self.active = false;
        }
    }
}

fn shift_stock(economy: &mut Economy, kind: ResourceType, magnitude: i32) {
    let resource = economy.resource_mut(kind);
    let change = resource.amount() * magnitude as i64 / 100;
    resource.adjust(change);
}

/// Events still running for a kingdom.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEvents(pub Vec<RandomEvent>);

impl ActiveEvents {
    /// Age every event and drop the ones that ran out. Returns the names of
    /// the expired events.
    pub fn tick(&mut self) -> Vec<String> {
        for event in &mut self.0 {
            event.update();
        }
        let mut expired = Vec::new();
        self.0.retain(|event| {
            if !event.active {
                expired.push(event.name.clone());
            }
            event.active
        });
        expired
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn generated_events_respect_ranges() {
        let mut rng = SmallRng::seed_from_u64(17);
        for _ in 0..500 {
            let event = RandomEvent::generate(&mut rng);
            assert!((1..=5).contains(&event.duration));
            match event.kind {
                EventType::Positive => assert!((5..=20).contains(&event.magnitude)),
                EventType::Negative => assert!((-20..=-5).contains(&event.magnitude)),
                EventType::Neutral => assert!((-5..=5).contains(&event.magnitude)),
            }
            assert_eq!(event.name, event.category.event_name(event.kind));
        }
    }

    #[test]
    fn harvest_scales_food() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut population = Population::new(1000);
        let mut economy = Economy::new();
        let mut army = Army::new();
        let event = RandomEvent::new(EventCategory::Harvest, EventType::Positive, 10, 2);
        event.apply(&mut population, &mut economy, &mut army, &mut rng);
        assert_eq!(economy.resource(ResourceType::Food).amount(), 1100);
        let drought = RandomEvent::new(EventCategory::Harvest, EventType::Negative, -20, 2);
        drought.apply(&mut population, &mut economy, &mut army, &mut rng);
        assert_eq!(economy.resource(ResourceType::Food).amount(), 880);
    }

    #[test]
    fn crisis_drains_treasury_without_overdraft() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut population = Population::new(1000);
        let mut economy = Economy::with_gold(50);
        let mut army = Army::new();
        let crisis = RandomEvent::new(EventCategory::Economic, EventType::Negative, -20, 3);
        crisis.apply(&mut population, &mut economy, &mut army, &mut rng);
        assert_eq!(economy.treasury.gold(), 0);
        assert_eq!(economy.production_level(), 40);
        assert_eq!(economy.trade_level(), 44);
    }

    #[test]
    fn desertion_floors_training() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut population = Population::new(1000);
        let mut economy = Economy::new();
        let mut army = Army::new();
        army.set_training(12);
        let desertion = RandomEvent::new(EventCategory::Military, EventType::Negative, -18, 3);
        desertion.apply(&mut population, &mut economy, &mut army, &mut rng);
        assert_eq!(army.training(), 10);
        assert_eq!(army.units()[0].morale(), 61);
    }

    #[test]
    fn events_expire() {
        let mut events = ActiveEvents::default();
        events.0.push(RandomEvent::new(EventCategory::Military, EventType::Positive, 5, 1));
        events.0.push(RandomEvent::new(EventCategory::Economic, EventType::Neutral, 0, 3));
        let expired = events.tick();
        assert_eq!(expired, vec!["Military Parade".to_string()]);
        assert_eq!(events.0.len(), 1);
        assert_eq!(events.0[0].turns_remaining, 2);
    }
}
