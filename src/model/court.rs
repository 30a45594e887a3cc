//! The royal court: the sitting ruler, the pool of contenders, elections,
//! coups and succession.
//!
//! Every mutating operation returns the [`CourtOutcome`]s it produced so the
//! ECS layer can turn them into chronicle messages.

use bevy_ecs::component::Component;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::leader::{Leader, LeadershipTrait};
use super::stats::pick;

// ---------------------------------------------------------------------------
// Constants — Candidate generation
// ---------------------------------------------------------------------------

const TITLES: [&str; 7] = ["Lord", "Duke", "Baron", "Count", "Knight", "General", "Chancellor"];
const FIRST_NAMES: [&str; 8] = [
    "John", "Richard", "William", "Henry", "Robert", "Thomas", "Edward", "Charles",
];
const LAST_NAMES: [&str; 8] = [
    "Smith", "Young", "Wilson", "Cooper", "Miller", "Baker", "Fletcher", "Stewart",
];

// ---------------------------------------------------------------------------
// Constants — Politics
// ---------------------------------------------------------------------------

const INCUMBENT_ADVANTAGE: i32 = 20;
const STABILITY_RANGE: (i32, i32) = (10, 100);
const COUP_CHANCE_RANGE: (i32, i32) = (5, 95);
const COUP_SUCCESS_RANGE: (i32, i32) = (10, 90);
const ELECTION_STABILITY_THRESHOLD: i32 = 70;

/// Something notable that happened at court.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourtOutcome {
    Crowned { ruler: String },
    ElectionHeld { winner: String, incumbent_won: bool },
    CoupSucceeded { usurper: String, deposed: String },
    CoupFailed { challenger: String },
    RulerDied { ruler: String },
    CandidateEmerged { candidate: String },
}

/// The leadership system of one kingdom.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Court {
    ruler: Option<Leader>,
    candidates: Vec<Leader>,
    election_cycle: i32,
    turns_to_election: i32,
    stability: i32,
    coup_risk: i32,
}

impl Court {
    /// A court with no ruler and 2–4 contenders waiting.
    pub fn new(election_cycle: i32, rng: &mut impl Rng) -> Self {
        let cycle = election_cycle.max(1);
        let mut court = Self {
            ruler: None,
            candidates: Vec::new(),
            election_cycle: cycle,
            turns_to_election: cycle,
            stability: 50,
            coup_risk: 10,
        };
        for _ in 0..rng.random_range(2..=4) {
            court.candidates.push(random_leader(rng));
        }
        court
    }

    pub fn ruler(&self) -> Option<&Leader> {
        self.ruler.as_ref()
    }

    pub fn ruler_mut(&mut self) -> Option<&mut Leader> {
        self.ruler.as_mut()
    }

    /// Put a leader on the throne directly (new games and loaded saves).
    pub fn install_ruler(&mut self, leader: Leader) {
        self.ruler = Some(leader);
    }

    pub fn candidates(&self) -> &[Leader] {
        &self.candidates
    }

    pub fn add_candidate(&mut self, leader: Leader) {
        self.candidates.push(leader);
    }

    pub fn election_cycle(&self) -> i32 {
        self.election_cycle
    }

    pub fn set_election_cycle(&mut self, cycle: i32) {
        self.election_cycle = cycle.max(1);
    }

    pub fn turns_to_election(&self) -> i32 {
        self.turns_to_election
    }

    pub fn stability(&self) -> i32 {
        self.stability
    }

    pub fn set_stability(&mut self, value: i32) {
        self.stability = value.clamp(0, 100);
    }

    pub fn coup_risk(&self) -> i32 {
        self.coup_risk
    }

    pub fn set_coup_risk(&mut self, value: i32) {
        self.coup_risk = value.clamp(0, 100);
    }

    pub fn hold_election(&mut self, rng: &mut impl Rng) -> Vec<CourtOutcome> {
        if self.candidates.len() < 2 {
            while self.candidates.len() < 3 {
                self.candidates.push(random_leader(rng));
            }
        }

        // The incumbent always stands; an elected incumbent campaigns with an edge.
        let incumbent = self.ruler.take();
        let incumbent_bonus = incumbent.as_ref().is_some_and(|r| r.elected);
        let mut field: Vec<(Leader, bool)> = Vec::with_capacity(self.candidates.len() + 1);
        if let Some(incumbent) = incumbent {
            field.push((incumbent, true));
        }
        field.extend(self.candidates.drain(..).map(|c| (c, false)));

        let mut best: Option<(usize, i32)> = None;
        for (i, (leader, is_incumbent)) in field.iter().enumerate() {
            let mut score = leader.leadership_score();
            if *is_incumbent && incumbent_bonus {
                score += INCUMBENT_ADVANTAGE;
            }
            score += rng.random_range(-10..=20) - leader.corruption() / 2;
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((i, score));
            }
        }

        self.turns_to_election = self.election_cycle;
        let Some((winner_idx, _)) = best else {
            return Vec::new();
        };
        let (mut winner, incumbent_won) = field.remove(winner_idx);
        if !incumbent_won {
            winner.term_length = 0;
        }
        winner.elected = true;
        self.candidates = field.into_iter().map(|(leader, _)| leader).collect();
        let name = winner.styled_name();
        self.ruler = Some(winner);

        let mut outcomes = vec![CourtOutcome::ElectionHeld {
            winner: name.clone(),
            incumbent_won,
        }];
        if !incumbent_won {
            outcomes.push(CourtOutcome::Crowned { ruler: name });
        }
        outcomes
    }

    /// Percent chance that a coup is attempted this turn.
    pub fn coup_chance(&self, loyalty: i32, army_morale: i32) -> i32 {
        let Some(ruler) = &self.ruler else {
            return 0;
        };
        let chance = self.coup_risk + ruler.corruption() / 5 + (100 - self.stability) / 5
            - loyalty / 5
            + (70 - army_morale) / 3;
        chance.clamp(COUP_CHANCE_RANGE.0, COUP_CHANCE_RANGE.1)
    }

    pub fn check_for_coup(&self, loyalty: i32, army_morale: i32, rng: &mut impl Rng) -> bool {
        self.ruler.is_some() && rng.random_range(1..=100) <= self.coup_chance(loyalty, army_morale)
    }

    pub fn handle_coup(&mut self, loyalty: i32, rng: &mut impl Rng) -> Vec<CourtOutcome> {
        let Some(ruler_military) = self.ruler.as_ref().map(Leader::military) else {
            return Vec::new();
        };
        if self.candidates.is_empty() {
            let mut general = random_leader(rng);
            general.title = "General".to_string();
            general.set_military(rng.random_range(70..=90));
            self.candidates.push(general);
        }
        let challenger_idx = self
            .candidates
            .iter()
            .enumerate()
            .max_by_key(|(i, c)| (c.military(), std::cmp::Reverse(*i)))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let challenger_military = self.candidates[challenger_idx].military();

        let success = (50 + (challenger_military - ruler_military) + (70 - self.stability) / 2
            - loyalty / 2)
            .clamp(COUP_SUCCESS_RANGE.0, COUP_SUCCESS_RANGE.1);

        if rng.random_range(1..=100) <= success {
            let mut usurper = self.candidates.remove(challenger_idx);
            usurper.elected = false;
            usurper.term_length = 0;
            let usurper_name = usurper.styled_name();
            let deposed = self
                .ruler
                .replace(usurper)
                .map(|r| r.styled_name())
                .unwrap_or_default();
            self.stability = (self.stability - 20).max(STABILITY_RANGE.0);
            self.coup_risk = (self.coup_risk + 15).min(100);
            vec![CourtOutcome::CoupSucceeded {
                usurper: usurper_name,
                deposed,
            }]
        } else {
            let challenger = self.candidates.remove(challenger_idx);
            self.stability = (self.stability + 10).min(100);
            self.coup_risk = (self.coup_risk - 15).max(5);
            vec![CourtOutcome::CoupFailed {
                challenger: challenger.styled_name(),
            }]
        }
    }

    pub fn handle_death(&mut self, rng: &mut impl Rng) -> Vec<CourtOutcome> {
        let Some(dead) = self.ruler.take() else {
            return Vec::new();
        };
        let mut outcomes = vec![CourtOutcome::RulerDied {
            ruler: dead.styled_name(),
        }];
        outcomes.extend(self.handle_succession(rng));
        outcomes
    }

    pub fn handle_succession(&mut self, rng: &mut impl Rng) -> Vec<CourtOutcome> {
        if self.candidates.is_empty() {
            for _ in 0..rng.random_range(2..=4) {
                self.candidates.push(random_leader(rng));
            }
        }
        if self.stability >= ELECTION_STABILITY_THRESHOLD && rng.random_range(1..=100) <= 70 {
            return self.hold_election(rng);
        }

        let heir_idx = self
            .candidates
            .iter()
            .enumerate()
            .max_by_key(|(i, c)| (c.leadership_score(), std::cmp::Reverse(*i)))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let mut heir = self.candidates.remove(heir_idx);
        heir.elected = false;
        heir.term_length = 0;
        let name = heir.styled_name();
        if let Some(previous) = self.ruler.replace(heir) {
            self.candidates.push(previous);
        }
        self.stability = (self.stability - 10).max(STABILITY_RANGE.0);
        vec![CourtOutcome::Crowned { ruler: name }]
    }

    /// One turn of court politics.
    pub fn update(
        &mut self,
        unrest: bool,
        gold: i64,
        loyalty: i32,
        army_morale: i32,
        rng: &mut impl Rng,
    ) -> Vec<CourtOutcome> {
        let mut outcomes = Vec::new();
        if self.ruler.is_none() {
            outcomes.extend(self.handle_succession(rng));
            return outcomes;
        }

        if self.turns_to_election > 0 {
            self.turns_to_election -= 1;
        }
        if self.turns_to_election <= 0 {
            outcomes.extend(self.hold_election(rng));
        }

        if let Some(ruler) = &self.ruler {
            if ruler.corruption() > 70 {
                self.stability -= 2;
            } else if ruler.corruption() < 30 {
                self.stability += 1;
            }
            if ruler.human.happiness() < 30 {
                self.stability -= 1;
            } else if ruler.human.happiness() > 70 {
                self.stability += 1;
            }
        }
        if unrest {
            self.stability -= 5;
            self.coup_risk += 3;
        } else {
            self.stability += 1;
        }
        if gold < 100 {
            self.stability -= 2;
            self.coup_risk += 2;
        }
        if rng.random_range(1..=20) == 1 {
            self.stability += rng.random_range(-5..=5);
        }
        self.stability = self.stability.clamp(STABILITY_RANGE.0, STABILITY_RANGE.1);
        self.coup_risk = self.coup_risk.clamp(0, 100);

        if self.check_for_coup(loyalty, army_morale, rng) {
            outcomes.extend(self.handle_coup(loyalty, rng));
        }

        let death_chance = self.ruler.as_ref().map(|r| 1 + r.term_length / 10);
        if let Some(chance) = death_chance {
            if rng.random_range(1..=100) <= chance {
                outcomes.extend(self.handle_death(rng));
            }
        }

        if self.candidates.len() < 3 && rng.random_range(1..=5) == 1 {
            let newcomer = random_leader(rng);
            outcomes.push(CourtOutcome::CandidateEmerged {
                candidate: newcomer.styled_name(),
            });
            self.candidates.push(newcomer);
        }

        self.stability = self.stability.clamp(STABILITY_RANGE.0, STABILITY_RANGE.1);
        outcomes
    }
}

/// A random noble with 1–3 traits.
pub fn random_leader(rng: &mut impl Rng) -> Leader {
    let name = format!("{} {}", pick(rng, &FIRST_NAMES), pick(rng, &LAST_NAMES));
    let mut leader = Leader::new(name, *pick(rng, &TITLES));
    leader.set_intelligence(rng.random_range(40..=90));
    leader.set_military(rng.random_range(40..=90));
    leader.set_economic(rng.random_range(40..=90));
    leader.set_corruption(rng.random_range(5..=30));
    for _ in 0..rng.random_range(1..=3) {
        leader.add_trait(LeadershipTrait::random(rng));
    }
    leader
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn court_with_ruler(rng: &mut SmallRng) -> Court {
        let mut court = Court::new(5, rng);
        court.install_ruler(Leader::new("Henry", "King"));
        court
    }

    #[test]
    fn new_court_has_contenders() {
        let mut rng = SmallRng::seed_from_u64(1);
        let court = Court::new(0, &mut rng);
        assert!((2..=4).contains(&court.candidates().len()));
        assert!(court.ruler().is_none());
        assert_eq!(court.election_cycle(), 1);
    }

    #[test]
    fn random_leaders_stay_in_bounds() {
        let mut rng = SmallRng::seed_from_u64(2);
        for _ in 0..50 {
            let leader = random_leader(&mut rng);
            assert!((1..=3).contains(&leader.traits().len()));
            assert!((0..=100).contains(&leader.corruption()));
            assert!(leader.name().contains(' '));
        }
    }

    #[test]
    fn election_crowns_an_elected_ruler() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut court = court_with_ruler(&mut rng);
        let pool = court.candidates().len();
        let outcomes = court.hold_election(&mut rng);
        let ruler = court.ruler().expect("election leaves a ruler");
        assert!(ruler.elected);
        assert_eq!(court.turns_to_election(), 5);
        assert!(matches!(outcomes[0], CourtOutcome::ElectionHeld { .. }));
        // the losing incumbent rejoins the pool
        assert!(court.candidates().len() >= pool);
    }

    fn court_of(candidates: usize, rng: &mut SmallRng) -> Court {
        let mut court = court_with_ruler(rng);
        court.candidates.clear();
        for _ in 0..candidates {
            court.add_candidate(random_leader(rng));
        }
        court
    }

    #[test]
    fn two_contenders_are_enough_for_an_election() {
        let mut rng = SmallRng::seed_from_u64(10);
        let mut court = court_of(2, &mut rng);
        court.hold_election(&mut rng);
        // three stood (incumbent plus two), one now rules
        assert_eq!(court.candidates().len(), 2);
    }

    #[test]
    fn thin_pool_is_filled_to_three_before_voting() {
        for count in [0, 1] {
            let mut rng = SmallRng::seed_from_u64(11 + count as u64);
            let mut court = court_of(count, &mut rng);
            court.hold_election(&mut rng);
            assert_eq!(court.candidates().len(), 3);
        }
    }

    #[test]
    fn coup_chance_is_clamped() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut court = court_with_ruler(&mut rng);
        court.set_coup_risk(100);
        court.set_stability(0);
        assert_eq!(court.coup_chance(0, 0), 95);
        court.set_coup_risk(0);
        court.set_stability(100);
        assert_eq!(court.coup_chance(100, 100), 5);
    }

    #[test]
    fn no_coup_without_a_ruler() {
        let mut rng = SmallRng::seed_from_u64(5);
        let court = Court::new(5, &mut rng);
        assert_eq!(court.coup_chance(0, 0), 0);
        assert!(!court.check_for_coup(0, 0, &mut rng));
    }

    #[test]
    fn coup_always_changes_the_pool() {
        let mut rng = SmallRng::seed_from_u64(6);
        for _ in 0..20 {
            let mut court = court_with_ruler(&mut rng);
            let before = court.candidates().len();
            let outcomes = court.handle_coup(50, &mut rng);
            assert_eq!(outcomes.len(), 1);
            assert_eq!(court.candidates().len(), before - 1);
            match &outcomes[0] {
                CourtOutcome::CoupSucceeded { deposed, .. } => {
                    assert_eq!(deposed, "King Henry");
                    assert!(!court.ruler().unwrap().elected);
                }
                CourtOutcome::CoupFailed { .. } => {
                    assert_eq!(court.ruler().unwrap().name(), "Henry");
                }
                other => panic!("unexpected outcome {other:?}"),
            }
        }
    }

    #[test]
    fn death_triggers_succession() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut court = court_with_ruler(&mut rng);
        let outcomes = court.handle_death(&mut rng);
        assert!(matches!(outcomes[0], CourtOutcome::RulerDied { .. }));
        assert!(court.ruler().is_some());
        assert_ne!(court.ruler().unwrap().name(), "Henry");
    }

    #[test]
    fn empty_throne_is_filled_on_update() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut court = Court::new(5, &mut rng);
        court.update(false, 1000, 50, 70, &mut rng);
        assert!(court.ruler().is_some());
    }

    #[test]
    fn stability_stays_in_range_over_many_turns() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut court = court_with_ruler(&mut rng);
        for turn in 0..200 {
            court.update(turn % 3 == 0, 50, 20, 30, &mut rng);
            assert!((10..=100).contains(&court.stability()));
            assert!((0..=100).contains(&court.coup_risk()));
        }
    }
}
