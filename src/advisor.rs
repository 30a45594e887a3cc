//! The royal advisor: keyword-matched counsel on the state of the realm.
//!
//! Questions are matched on whole words, ignoring case. The first topic with a
//! matching keyword answers; questions that match nothing get one of a handful
//! of stock deflections. Topic answers close with a remark about whatever in
//! the kingdom most needs attention.

use rand::Rng;

use crate::model::kingdom::KingdomView;
use crate::model::stats::pick;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Greeting,
    Help,
    Economy,
    Military,
    Population,
    Diplomacy,
    Environment,
    Strategy,
    Thanks,
}

impl Topic {
    /// In matching order.
    pub const ALL: [Topic; 9] = [
        Topic::Greeting,
        Topic::Help,
        Topic::Economy,
        Topic::Military,
        Topic::Population,
        Topic::Diplomacy,
        Topic::Environment,
        Topic::Strategy,
        Topic::Thanks,
    ];

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Topic::Greeting => &["hello", "hi", "greetings"],
            Topic::Help => &["help"],
            Topic::Economy => &["economy", "gold", "money", "tax", "trade"],
            Topic::Military => &["military", "army", "war"],
            Topic::Population => &["population", "people", "food"],
            Topic::Diplomacy => &["diplomacy", "alliance", "treaty"],
            Topic::Environment => &["weather", "disease", "plague"],
            Topic::Strategy => &["strategy", "advice"],
            Topic::Thanks => &["thank", "thanks"],
        }
    }

    fn reply(self) -> &'static str {
        match self {
            Topic::Greeting => "Greetings, your majesty. How may I serve the crown today?",
            Topic::Help => {
                "I can counsel you on the economy, the army, the people, diplomacy, \
                 or the weather and its plagues. Which weighs on you?"
            }
            Topic::Economy => {
                "Keep taxes moderate and the fields working. A full granary and open \
                 trade routes fill the treasury faster than a heavy levy."
            }
            Topic::Military => {
                "Drill the companies often and pay them on time. Pick your battles by \
                 the enemy's strength, not by your pride."
            }
            Topic::Population => {
                "Fed and lightly taxed subjects stay loyal. Watch the stores and move \
                 quickly when sickness appears."
            }
            Topic::Diplomacy => {
                "Alliances with stronger neighbours and fair trade agreements buy time \
                 that no army can."
            }
            Topic::Environment => {
                "Lay in reserves before the hard seasons, and keep healers ready. \
                 Weather and disease spare no kingdom."
            }
            Topic::Strategy => {
                "Balance serves best. Guard stability, keep something in reserve, and \
                 expect the unexpected."
            }
            Topic::Thanks => "It is my honour, your majesty.",
        }
    }

    /// Whether this topic's answer closes with a remark on the realm.
    fn remarks(self) -> bool {
        !matches!(self, Topic::Greeting | Topic::Help | Topic::Thanks)
    }
}

const DEFAULT_REPLIES: [&str; 5] = [
    "Forgive me, your majesty, I do not follow. Could you put it another way?",
    "My counsel is for matters of state. What troubles the kingdom?",
    "Perhaps we should turn to the challenges before us.",
    "The realm needs your attention elsewhere. Which of its affairs shall we discuss?",
    "Might we speak of the treasury or the army instead?",
];

/// Find the first topic any word of the question belongs to.
pub fn classify(question: &str) -> Option<Topic> {
    let words: Vec<String> = question
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    Topic::ALL
        .into_iter()
        .find(|topic| topic.keywords().iter().any(|k| words.iter().any(|w| w.as_str() == *k)))
}

/// The most pressing concern in the kingdom, if any.
fn situational_remark(view: &KingdomView<'_>) -> Option<&'static str> {
    if view.economy.treasury.gold() < 100 {
        Some("The treasury is nearly empty, your majesty.")
    } else if view.population.has_unrest() {
        Some("The people grow restless; unrest is spreading.")
    } else if view.army.morale() < 40 {
        Some("The soldiers' spirits are low.")
    } else if let Some(disease) = view.disease {
        Some(match disease.severity() {
            s if s >= 4 => "A grave sickness stalks the realm.",
            _ => "A sickness is abroad in the realm.",
        })
    } else if view.weather.is_extreme() {
        Some("This weather is harsher than any in memory.")
    } else {
        None
    }
}

/// Answer a question, taking the kingdom's condition into account when one
/// is supplied.
pub fn advise(question: &str, view: Option<&KingdomView<'_>>, rng: &mut impl Rng) -> String {
    let Some(topic) = classify(question) else {
        return pick(rng, &DEFAULT_REPLIES).to_string();
    };
    let reply = topic.reply();
    match view.filter(|_| topic.remarks()).and_then(situational_remark) {
        Some(remark) => format!("{reply} {remark}"),
        None => reply.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::model::army::Army;
    use crate::model::court::Court;
    use crate::model::economy::Economy;
    use crate::model::environment::Weather;
    use crate::model::population::Population;

    #[test]
    fn whole_words_only() {
        // "this" contains "hi" and "warden" contains "war"
        assert_eq!(classify("Is this the warden?"), None);
        assert_eq!(classify("hi"), Some(Topic::Greeting));
        assert_eq!(classify("How goes the WAR?"), Some(Topic::Military));
    }

    #[test]
    fn first_matching_topic_wins() {
        assert_eq!(classify("Hello, how is the army?"), Some(Topic::Greeting));
        assert_eq!(classify("help with taxes and trade"), Some(Topic::Help));
        assert_eq!(classify("Any advice on the plague?"), Some(Topic::Environment));
        assert_eq!(classify("Thanks!"), Some(Topic::Thanks));
    }

    #[test]
    fn unknown_questions_get_a_stock_reply() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..20 {
            let reply = advise("What is the airspeed of a swallow?", None, &mut rng);
            assert!(DEFAULT_REPLIES.contains(&reply.as_str()));
        }
    }

    #[test]
    fn remarks_on_an_empty_treasury() {
        let mut rng = SmallRng::seed_from_u64(3);
        let population = Population::new(1000);
        let economy = Economy::with_gold(10);
        let army = Army::new();
        let court = Court::new(5, &mut rng);
        let weather = Weather::clear_skies(&mut rng);
        let view = KingdomView {
            population: &population,
            economy: &economy,
            army: &army,
            court: &court,
            weather: &weather,
            disease: None,
        };

        let reply = advise("How is our gold?", Some(&view), &mut rng);
        assert!(reply.starts_with(Topic::Economy.reply()));
        assert!(reply.ends_with("The treasury is nearly empty, your majesty."));

        let greeting = advise("hello", Some(&view), &mut rng);
        assert_eq!(greeting, Topic::Greeting.reply());
    }

    #[test]
    fn calm_realm_gets_plain_counsel() {
        let mut rng = SmallRng::seed_from_u64(3);
        let population = Population::new(1000);
        let economy = Economy::with_gold(1000);
        let army = Army::new();
        let court = Court::new(5, &mut rng);
        let weather = Weather::clear_skies(&mut rng);
        let view = KingdomView {
            population: &population,
            economy: &economy,
            army: &army,
            court: &court,
            weather: &weather,
            disease: None,
        };
        assert_eq!(advise("strategy", Some(&view), &mut rng), Topic::Strategy.reply());
    }
}
