use rand::Rng;
use serde::{Deserialize, Serialize};

use super::human::Human;
use super::stats::clamp_pct;
use crate::error::{GameError, Result};

// ---------------------------------------------------------------------------
// LeadershipTraitType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum LeadershipTraitType {
    Inspiring,
    Strategic,
    Ruthless,
    Diplomatic,
    Corrupt,
    Charismatic,
    Experienced,
}

string_enum!(LeadershipTraitType {
    Inspiring => "inspiring",
    Strategic => "strategic",
    Ruthless => "ruthless",
    Diplomatic => "diplomatic",
    Corrupt => "corrupt",
    Charismatic => "charismatic",
    Experienced => "experienced",
});

impl LeadershipTraitType {
    /// (charisma, intelligence, military, economic, corruption) for the positive form.
    fn effects(self) -> [i32; 5] {
        match self {
            LeadershipTraitType::Inspiring => [10, 0, 5, 0, -5],
            LeadershipTraitType::Strategic => [0, 5, 15, 0, 0],
            LeadershipTraitType::Ruthless => [-10, 0, 15, 0, 10],
            LeadershipTraitType::Diplomatic => [15, 0, 0, 10, 0],
            LeadershipTraitType::Corrupt => [0, 0, 0, -5, 20],
            LeadershipTraitType::Charismatic => [20, 0, 0, 0, -5],
            LeadershipTraitType::Experienced => [0, 10, 5, 5, 0],
        }
    }

    fn display_name(self, positive: bool) -> &'static str {
        let (good, bad) = match self {
            LeadershipTraitType::Inspiring => ("Inspiring", "Uninspiring"),
            LeadershipTraitType::Strategic => ("Strategic Genius", "Poor Tactician"),
            LeadershipTraitType::Ruthless => ("Determined", "Cruel"),
            LeadershipTraitType::Diplomatic => ("Diplomatic", "Offensive"),
            LeadershipTraitType::Corrupt => ("Honest", "Corrupt"),
            LeadershipTraitType::Charismatic => ("Charismatic", "Dull"),
            LeadershipTraitType::Experienced => ("Experienced", "Inexperienced"),
        };
        if positive { good } else { bad }
    }
}

// ---------------------------------------------------------------------------
// LeadershipTrait
// ---------------------------------------------------------------------------

/// A personality quirk that shifts a leader's stats while held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadershipTrait {
    pub name: String,
    pub kind: LeadershipTraitType,
    pub positive: bool,
    pub charisma: i32,
    pub intelligence: i32,
    pub military: i32,
    pub economic: i32,
    pub corruption: i32,
}

impl LeadershipTrait {
    pub fn new(kind: LeadershipTraitType, positive: bool) -> Self {
        let sign = if positive { 1 } else { -1 };
        let [charisma, intelligence, military, economic, corruption] = kind.effects().map(|e| e * sign);
        Self {
            name: kind.display_name(positive).to_string(),
            kind,
            positive,
            charisma,
            intelligence,
            military,
            economic,
            corruption,
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        let kind = LeadershipTraitType::ALL[rng.random_range(0..LeadershipTraitType::ALL.len())];
        let positive = rng.random_range(1..=10) <= 7;
        Self::new(kind, positive)
    }

    fn shift(&self, leader: &mut Leader, sign: i32) {
        if self.intelligence != 0 {
            leader.set_intelligence(leader.intelligence + sign * self.intelligence);
        }
        if self.military != 0 {
            leader.set_military(leader.military + sign * self.military);
        }
        if self.economic != 0 {
            leader.set_economic(leader.economic + sign * self.economic);
        }
        if self.corruption != 0 {
            leader.set_corruption(leader.corruption + sign * self.corruption);
        }
        if self.charisma != 0 {
            leader.human.adjust_happiness(sign * self.charisma / 2);
            leader.human.adjust_loyalty(sign * self.charisma / 2);
        }
    }

    pub fn apply(&self, leader: &mut Leader) {
        self.shift(leader, 1);
    }

    pub fn remove(&self, leader: &mut Leader) {
        self.shift(leader, -1);
    }

    /// Traits drift slowly: virtues deepen and vices fade.
    pub fn update(&mut self, rng: &mut impl Rng) {
        if rng.random_range(1..=50) != 1 {
            return;
        }
        let stats = [
            &mut self.charisma,
            &mut self.intelligence,
            &mut self.military,
            &mut self.economic,
        ];
        if self.positive {
            for stat in stats {
                if *stat > 0 {
                    *stat += 1;
                }
            }
            if self.corruption < 0 {
                self.corruption -= 1;
            }
        } else {
            for stat in stats {
                if *stat < 0 {
                    *stat += 1;
                }
            }
            if self.corruption > 0 {
                self.corruption -= 1;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Leader
// ---------------------------------------------------------------------------

/// A ruler or a contender for the throne.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub human: Human,
    pub title: String,
    intelligence: i32,
    military: i32,
    economic: i32,
    corruption: i32,
    experience: i32,
    pub term_length: i32,
    pub elected: bool,
    traits: Vec<LeadershipTrait>,
}

impl Leader {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            human: Human::new(name),
            title: title.into(),
            intelligence: 50,
            military: 50,
            economic: 50,
            corruption: 0,
            experience: 0,
            term_length: 0,
            elected: false,
            traits: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.human.name
    }

    /// "Title Name", e.g. "Duke Henry Cooper".
    pub fn styled_name(&self) -> String {
        format!("{} {}", self.title, self.human.name)
    }

    pub fn intelligence(&self) -> i32 {
        self.intelligence
    }

    pub fn military(&self) -> i32 {
        self.military
    }

    pub fn economic(&self) -> i32 {
        self.economic
    }

    pub fn corruption(&self) -> i32 {
        self.corruption
    }

    pub fn experience(&self) -> i32 {
        self.experience
    }

    pub fn set_intelligence(&mut self, value: i32) {
        self.intelligence = clamp_pct(value);
    }

    pub fn set_military(&mut self, value: i32) {
        self.military = clamp_pct(value);
    }

    pub fn set_economic(&mut self, value: i32) {
        self.economic = clamp_pct(value);
    }

    pub fn set_corruption(&mut self, value: i32) {
        self.corruption = clamp_pct(value);
    }

    pub fn set_experience(&mut self, value: i32) {
        self.experience = clamp_pct(value);
    }

    pub fn traits(&self) -> &[LeadershipTrait] {
        &self.traits
    }

    pub fn add_trait(&mut self, leadership_trait: LeadershipTrait) {
        leadership_trait.apply(self);
        self.traits.push(leadership_trait);
    }

    pub fn remove_trait(&mut self, index: usize) -> Result<LeadershipTrait> {
        if index >= self.traits.len() {
            return Err(GameError::out_of_range("trait", index, self.traits.len()));
        }
        let removed = self.traits.remove(index);
        removed.remove(self);
        Ok(removed)
    }

    pub fn leadership_score(&self) -> i32 {
        let base = self.intelligence as f64 * 0.3
            + self.military as f64 * 0.2
            + self.economic as f64 * 0.3
            + (100 - self.corruption) as f64 * 0.2;
        let traits: i32 = self
            .traits
            .iter()
            .map(|t| if t.positive { 5 } else { -5 })
            .sum();
        base as i32 + self.experience / 10 + traits
    }

    pub fn population_bonus(&self) -> f64 {
        (1.0 + self.human.happiness() as f64 / 100.0 * 0.2 + self.experience as f64 / 500.0
            - self.corruption as f64 / 200.0)
            .clamp(0.5, 1.5)
    }

    pub fn military_bonus(&self) -> f64 {
        (1.0 + self.military as f64 / 100.0 * 0.5 + self.experience as f64 / 200.0).clamp(0.7, 2.0)
    }

    pub fn economic_bonus(&self) -> f64 {
        (1.0 + self.economic as f64 / 100.0 * 0.3 + self.intelligence as f64 / 100.0 * 0.2
            - self.corruption as f64 / 100.0)
            .clamp(0.5, 1.8)
    }

    pub fn disease_prevention_bonus(&self) -> f64 {
        (1.0 + self.intelligence as f64 / 100.0 * 0.3 + self.experience as f64 / 300.0
            - self.corruption as f64 / 200.0)
            .clamp(0.7, 1.5)
    }

    pub fn weather_preparedness_bonus(&self) -> f64 {
        (1.0 + self.intelligence as f64 / 100.0 * 0.2 + self.experience as f64 / 100.0 * 0.2
            - self.corruption as f64 / 200.0)
            .clamp(0.6, 1.6)
    }

    pub fn gain_experience(&mut self, rng: &mut impl Rng) {
        self.set_experience(self.experience + rng.random_range(1..=3));
    }

    /// Face a decision of the given difficulty (1..=10). Win or lose, the
    /// leader learns from it.
    pub fn make_decision(&mut self, difficulty: i32, rng: &mut impl Rng) -> bool {
        let threshold = 50 + difficulty.clamp(1, 10) * 5;
        let skill = self.intelligence + self.experience / 2 - self.corruption / 2
            + rng.random_range(-10..=10);
        self.gain_experience(rng);
        skill >= threshold
    }

    pub fn update(&mut self, rng: &mut impl Rng) {
        self.human.update();
        self.term_length += 1;

        if rng.random_range(1..=20) == 1 {
            self.set_corruption(self.corruption + rng.random_range(1..=5));
        }
        if rng.random_range(1..=10) == 1 {
            self.gain_experience(rng);
            match rng.random_range(0..=2) {
                0 => self.set_intelligence(self.intelligence + 1),
                1 => self.set_military(self.military + 1),
                _ => self.set_economic(self.economic + 1),
            }
        }
        for leadership_trait in &mut self.traits {
            leadership_trait.update(rng);
        }
    }
}
