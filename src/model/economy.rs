use bevy_ecs::component::Component;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::stats::{clamp_pct, roll_percent};
use super::treasury::Treasury;
use crate::error::{GameError, Result};

// ---------------------------------------------------------------------------
// ResourceType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ResourceType {
    Food,
    Wood,
    Stone,
    Gold,
    Iron,
}

string_enum!(ResourceType {
    Food => "food",
    Wood => "wood",
    Stone => "stone",
    Gold => "gold",
    Iron => "iron",
});

impl ResourceType {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceType::Food => "Food",
            ResourceType::Wood => "Wood",
            ResourceType::Stone => "Stone",
            ResourceType::Gold => "Gold",
            ResourceType::Iron => "Iron",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

// (kind, amount, gather, consumption)
const STARTING_RESOURCES: [(ResourceType, i64, i64, i64); 5] = [
    (ResourceType::Food, 1000, 100, 80),
    (ResourceType::Wood, 500, 50, 30),
    (ResourceType::Stone, 300, 30, 20),
    (ResourceType::Gold, 200, 20, 10),
    (ResourceType::Iron, 100, 10, 5),
];

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

/// A stockpile of one raw material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub kind: ResourceType,
    amount: i64,
    gather_rate: i64,
    consumption_rate: i64,
    value: i32,
    stockpiled: bool,
}

impl Resource {
    pub fn new(kind: ResourceType, amount: i64, gather_rate: i64, consumption_rate: i64) -> Self {
        Self {
            kind,
            amount: amount.max(0),
            gather_rate: gather_rate.max(0),
            consumption_rate: consumption_rate.max(0),
            value: 10,
            stockpiled: false,
        }
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn set_amount(&mut self, amount: i64) -> Result<()> {
        if amount < 0 {
            return Err(GameError::invalid(format!(
                "{} amount cannot be negative",
                self.kind.label()
            )));
        }
        self.amount = amount;
        Ok(())
    }

    /// Add (or with a negative delta, remove) stock, never going below zero.
    pub fn adjust(&mut self, delta: i64) {
        self.amount = (self.amount + delta).max(0);
    }

    pub fn gather_rate(&self) -> i64 {
        self.gather_rate
    }

    pub fn set_gather_rate(&mut self, rate: i64) {
        self.gather_rate = rate.max(0);
    }

    pub fn consumption_rate(&self) -> i64 {
        self.consumption_rate
    }

    pub fn set_consumption_rate(&mut self, rate: i64) {
        self.consumption_rate = rate.max(0);
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn set_value(&mut self, value: i32) {
        self.value = value.clamp(1, 100);
    }

    pub fn is_stockpiled(&self) -> bool {
        self.stockpiled
    }

    pub fn consume(&mut self, amount: i64) -> Result<()> {
        if amount <= 0 {
            return Err(GameError::invalid("consumption amount must be positive"));
        }
        if amount > self.amount {
            return Err(GameError::InsufficientResource {
                resource: self.kind.label().to_string(),
                required: amount,
                available: self.amount,
            });
        }
        self.amount -= amount;
        Ok(())
    }

    /// Gather, then eat into the stock if there is enough of it.
    pub fn update(&mut self) {
        self.amount += self.gather_rate;
        if self.consumption_rate > 0 && self.amount >= self.consumption_rate {
            self.amount -= self.consumption_rate;
        }
    }
}

// ---------------------------------------------------------------------------
// TradeRoute
// ---------------------------------------------------------------------------

pub const TRADE_PARTNERS: [&str; 5] = [
    "Northern Realms",
    "Eastern Empire",
    "Southern Sultanate",
    "Western Republic",
    "Island Nation",
];

const MAX_TRADE_ROUTES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRoute {
    pub partner: String,
    pub export: ResourceType,
    pub export_amount: i64,
    pub import: ResourceType,
    pub import_amount: i64,
    pub profit_margin: f64,
    pub active: bool,
}

// ---------------------------------------------------------------------------
// Economy
// ---------------------------------------------------------------------------

/// Production, trade and the treasury of one kingdom.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Economy {
    production_level: i32,
    trade_level: i32,
    tax_rate: f64,
    /// Percent of each import kept as duty.
    tariff_rate: f64,
    market_stability: i32,
    inflation: f64,
    employment_rate: i32,
    corruption: i32,
    pub treasury: Treasury,
    resources: Vec<Resource>,
    routes: Vec<TradeRoute>,
}

impl Default for Economy {
    fn default() -> Self {
        Self::new()
    }
}

impl Economy {
    pub fn new() -> Self {
        Self::with_gold(0)
    }

    pub fn with_gold(gold: i64) -> Self {
        Self {
            production_level: 50,
            trade_level: 50,
            tax_rate: 10.0,
            tariff_rate: 5.0,
            market_stability: 50,
            inflation: 0.0,
            employment_rate: 80,
            corruption: 0,
            treasury: Treasury::seeded(gold),
            resources: STARTING_RESOURCES
                .iter()
                .map(|&(kind, amount, gather, consumption)| Resource::new(kind, amount, gather, consumption))
                .collect(),
            routes: Vec::new(),
        }
    }

    pub fn production_level(&self) -> i32 {
        self.production_level
    }

    pub fn set_production_level(&mut self, level: i32) {
        self.production_level = clamp_pct(level);
    }

    pub fn trade_level(&self) -> i32 {
        self.trade_level
    }

    pub fn set_trade_level(&mut self, level: i32) {
        self.trade_level = clamp_pct(level);
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    pub fn set_tax_rate(&mut self, rate: f64) {
        self.tax_rate = rate.clamp(0.0, 100.0);
    }

    pub fn tariff_rate(&self) -> f64 {
        self.tariff_rate
    }

    pub fn set_tariff_rate(&mut self, rate: f64) {
        self.tariff_rate = rate.clamp(0.0, 100.0);
    }

    pub fn market_stability(&self) -> i32 {
        self.market_stability
    }

    pub fn set_market_stability(&mut self, value: i32) {
        self.market_stability = clamp_pct(value);
    }

    pub fn inflation(&self) -> f64 {
        self.inflation
    }

    pub fn set_inflation(&mut self, value: f64) {
        self.inflation = value.clamp(0.0, 50.0);
    }

    pub fn employment_rate(&self) -> i32 {
        self.employment_rate
    }

    pub fn set_employment_rate(&mut self, value: i32) {
        self.employment_rate = clamp_pct(value);
    }

    pub fn corruption(&self) -> i32 {
        self.corruption
    }

    pub fn set_corruption(&mut self, value: i32) {
        self.corruption = clamp_pct(value);
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Fails unless there is exactly one stockpile per [`ResourceType`], in
    /// declaration order. Loaded saves are checked before they are played.
    pub fn check_resources(&self) -> Result<()> {
        let kinds: Vec<ResourceType> = self.resources.iter().map(|r| r.kind).collect();
        if kinds != ResourceType::ALL {
            return Err(GameError::Config(format!(
                "expected stockpiles {:?}, found {kinds:?}",
                ResourceType::ALL
            )));
        }
        Ok(())
    }

    pub fn resource(&self, kind: ResourceType) -> &Resource {
        &self.resources[kind.slot()]
    }

    pub fn resource_mut(&mut self, kind: ResourceType) -> &mut Resource {
        &mut self.resources[kind.slot()]
    }

    /// Swap `amount` of one resource for another at their relative values.
    /// Returns how much was received.
    pub fn barter(
        &mut self,
        sell: ResourceType,
        amount: i64,
        buy: ResourceType,
        rng: &mut impl Rng,
    ) -> Result<i64> {
        if sell == buy {
            return Err(GameError::invalid("cannot trade a resource for itself"));
        }
        if amount <= 0 {
            return Err(GameError::invalid("trade amount must be positive"));
        }
        let received = (amount * self.resource(sell).value() as i64
            / self.resource(buy).value() as i64)
            .max(1);
        self.resource_mut(sell).consume(amount)?;
        self.resource_mut(buy).adjust(received);
        if roll_percent(rng, 10) {
            self.set_trade_level(self.trade_level + 1);
        }
        Ok(received)
    }

    pub fn production_output(&self) -> i32 {
        let output = self.production_level * self.employment_rate / 100 * self.market_stability / 100;
        (output - output * self.corruption / 100).max(0)
    }

    pub fn calculate_inflation(&mut self, rng: &mut impl Rng) {
        let drift = rng.random_range(-0.5..0.5);
        let stability_effect = (50 - self.market_stability) as f64 / 100.0;

        let production: i64 = self.resources.iter().map(Resource::gather_rate).sum();
        let consumption: i64 = self.resources.iter().map(Resource::consumption_rate).sum();
        let ratio = if production > 0 {
            consumption as f64 / production as f64
        } else {
            1.0
        };
        let shortage_effect = ((ratio - 1.0) * 2.0).max(0.0);

        let reserve_effect = if self.treasury.gold() > 5000 { -0.5 } else { 0.0 };

        self.set_inflation(self.inflation + drift + stability_effect + shortage_effect + reserve_effect);
    }

    pub fn routes(&self) -> &[TradeRoute] {
        &self.routes
    }

    pub fn max_routes(&self) -> usize {
        (3 + self.trade_level as usize / 20).min(MAX_TRADE_ROUTES)
    }

    /// Open a standing route with a foreign partner. The charter costs
    /// `50 + 2 * export_amount` gold.
    pub fn establish_route(
        &mut self,
        partner: impl Into<String>,
        export: ResourceType,
        export_amount: i64,
        import: ResourceType,
    ) -> Result<&TradeRoute> {
        if self.routes.len() >= self.max_routes() {
            return Err(GameError::invalid(format!(
                "at most {} trade routes at this trade level",
                self.max_routes()
            )));
        }
        if export == import {
            return Err(GameError::invalid("a route must import something else"));
        }
        if export_amount <= 0 || export_amount > self.resource(export).amount() {
            return Err(GameError::invalid(format!(
                "export amount must be between 1 and {}",
                self.resource(export).amount()
            )));
        }
        self.treasury.spend(50 + export_amount * 2)?;

        let import_amount =
            export_amount * self.resource(export).value() as i64 / self.resource(import).value() as i64;
        self.routes.push(TradeRoute {
            partner: partner.into(),
            export,
            export_amount,
            import,
            import_amount,
            profit_margin: 1.0 + self.trade_level as f64 / 100.0,
            active: true,
        });
        self.set_trade_level(self.trade_level + 1);
        let index = self.routes.len() - 1;
        Ok(&self.routes[index])
    }

    pub fn cancel_route(&mut self, index: usize) -> Result<TradeRoute> {
        if index >= self.routes.len() {
            return Err(GameError::out_of_range("trade route", index, self.routes.len()));
        }
        let route = self.routes.remove(index);
        self.set_trade_level(self.trade_level - 1);
        Ok(route)
    }

    fn process_routes(&mut self, rng: &mut impl Rng) {
        for i in 0..self.routes.len() {
            let route = self.routes[i].clone();
            if !route.active || self.resource(route.export).amount() < route.export_amount {
                continue;
            }
            self.resource_mut(route.export).adjust(-route.export_amount);

            let duty = (route.import_amount as f64 * self.tariff_rate / 100.0) as i64;
            self.treasury.earn(duty * 2);
            let received = ((route.import_amount - duty) as f64 * route.profit_margin) as i64;
            self.resource_mut(route.import).adjust(received);

            if roll_percent(rng, 10) {
                self.set_trade_level(self.trade_level + 1);
            }
        }
    }

    /// Stockpiling cuts day-to-day consumption of a resource by 30%.
    pub fn set_stockpiled(&mut self, kind: ResourceType, on: bool) {
        let resource = self.resource_mut(kind);
        if on && !resource.stockpiled {
            resource.consumption_rate = resource.consumption_rate * 7 / 10;
        }
        resource.stockpiled = on;
    }

    pub fn set_resource_value(&mut self, kind: ResourceType, value: i32) {
        self.resource_mut(kind).set_value(value);
    }

    pub fn update(&mut self, rng: &mut impl Rng) {
        for resource in &mut self.resources {
            resource.update();
        }

        self.set_market_stability(self.market_stability + rng.random_range(-5..=5));
        self.calculate_inflation(rng);

        let employment_change = rng.random_range(-2..=2)
            + (self.production_level - 50) / 10
            + (self.market_stability - 50) / 10;
        self.set_employment_rate(self.employment_rate + employment_change);

        self.set_corruption(self.corruption + rng.random_range(-1..=2));

        self.process_routes(rng);

        self.treasury.set_inflation(self.inflation);
        self.treasury.set_corruption(self.corruption);
        self.treasury.apply_turn_changes();
    }
}
