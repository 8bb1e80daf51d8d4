//! The `Scenario` enumeration and its loader.

use std::fmt;
use std::str::FromStr;

use nm_agent::{Agent, Population};
use nm_core::{NormKind, NormSet, SimRng};

use crate::ScenarioError;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Scenario {
    #[default]
    Pluralist,
    Authoritarian,
    Utopian,
    Collapsed,
    Anomic,
    AllCare,
    AllLegal,
    NoApriori,
    AsymmetryOnly,
    GenocideShock,
}

impl Scenario {
    pub const ALL: [Scenario; 10] = [
        Scenario::Pluralist,
        Scenario::Authoritarian,
        Scenario::Utopian,
        Scenario::Collapsed,
        Scenario::Anomic,
        Scenario::AllCare,
        Scenario::AllLegal,
        Scenario::NoApriori,
        Scenario::AsymmetryOnly,
        Scenario::GenocideShock,
    ];

    /// Canonical camelCase name.
    pub const fn name(self) -> &'static str {
        match self {
            Scenario::Pluralist => "pluralist",
            Scenario::Authoritarian => "authoritarian",
            Scenario::Utopian => "utopian",
            Scenario::Collapsed => "collapsed",
            Scenario::Anomic => "anomic",
            Scenario::AllCare => "allCare",
            Scenario::AllLegal => "allLegal",
            Scenario::NoApriori => "noApriori",
            Scenario::AsymmetryOnly => "asymmetryOnly",
            Scenario::GenocideShock => "genocideShock",
        }
    }

    /// Re-initialize every agent's acknowledgments and preference.
    pub fn apply(self, population: &mut Population, rng: &mut SimRng) {
        for agent in population.agents_mut() {
            self.apply_to(agent, rng);
        }
    }

    /// Re-initialize one agent, then recompute its derived conflict.
    pub fn apply_to(self, agent: &mut Agent, rng: &mut SimRng) {
        let (acks, preference) = self.draw(rng);
        agent.acknowledgments = acks;
        agent.preference = preference;
        agent.recompute_conflict_and_debt();
    }

    fn draw(self, rng: &mut SimRng) -> (NormSet, NormKind) {
        match self {
            Scenario::Pluralist => (NormSet::from_fn(|_| rng.unit() > 0.5), NormKind::sample(rng)),
            Scenario::Authoritarian => (NormSet::only(NormKind::Legal), NormKind::sample(rng)),
            Scenario::Utopian => (NormSet::ALL, NormKind::sample(rng)),
            Scenario::Collapsed | Scenario::GenocideShock => (NormSet::NONE, NormKind::sample(rng)),
            Scenario::Anomic => (NormSet::from_fn(|_| rng.unit() > 0.1), NormKind::sample(rng)),
            Scenario::AllCare => (NormSet::only(NormKind::Care), NormKind::Care),
            Scenario::AllLegal => (NormSet::only(NormKind::Legal), NormKind::Legal),
            Scenario::NoApriori => {
                let mut acks = NormSet::from_fn(|_| rng.unit() > 0.5);
                acks.set(NormKind::Apriori, false);
                let mut preference = NormKind::sample(rng);
                if preference == NormKind::Apriori {
                    const OTHERS: [NormKind; 3] = [NormKind::Legal, NormKind::Care, NormKind::Epistemic];
                    preference = OTHERS[rng.gen_range(0..OTHERS.len())];
                }
                (acks, preference)
            }
            Scenario::AsymmetryOnly => {
                let acks = if rng.gen_bool(0.5) {
                    NormSet::NONE
                } else {
                    NormSet::only(NormKind::sample(rng))
                };
                (acks, NormKind::sample(rng))
            }
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    /// Accepts the camelCase names plus snake_case and kebab-case spellings,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        Scenario::ALL
            .into_iter()
            .find(|sc| sc.name().eq_ignore_ascii_case(&folded))
            .ok_or_else(|| ScenarioError::Unknown(s.to_string()))
    }
}
