//! Plain-text interpretive summary of the latest generation.

use std::fmt;

use nm_agent::Population;
use nm_core::{AgentId, Generation, NormKind};
use nm_scenario::Scenario;

use crate::{GenerationSnapshot, mean};

/// Qualitative band for a fulfillment rate.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Assessment {
    StrongProsocialAlignment,
    ModerateCooperation,
    WeakNormCoherence,
    EthicalFragmentation,
}

impl Assessment {
    pub fn from_fulfillment(rate: f32) -> Self {
        if rate >= 0.75 {
            Assessment::StrongProsocialAlignment
        } else if rate >= 0.5 {
            Assessment::ModerateCooperation
        } else if rate >= 0.25 {
            Assessment::WeakNormCoherence
        } else {
            Assessment::EthicalFragmentation
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Assessment::StrongProsocialAlignment => "strong prosocial alignment",
            Assessment::ModerateCooperation => "moderate cooperation",
            Assessment::WeakNormCoherence => "weak norm coherence",
            Assessment::EthicalFragmentation => "ethical fragmentation",
        }
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrustedAgent {
    pub id: AgentId,
    pub trust_max: i32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpretiveSummary {
    pub generation: Generation,
    pub scenario: Scenario,
    pub assessment: Assessment,
    pub fulfillment_rate: f32,
    pub relational_integrity: f32,
    pub avg_debt: f32,
    pub avg_conflict: f32,
    pub repair_events: u32,
    pub avg_trust_connections: f32,
    /// Live agents acknowledging each norm, indexed by [`NormKind::index`].
    pub acknowledgments: [usize; NormKind::COUNT],
    /// Up to three agents with more than three trust entries, highest
    /// maximum trust first.
    pub top_trusted: Vec<TrustedAgent>,
}

impl InterpretiveSummary {
    const TOP_TRUSTED: usize = 3;
    const MIN_TRUST_ENTRIES: usize = 3;

    /// Summarise `latest` (if any generation has completed) and the live
    /// population.
    pub fn build(
        generation: Generation,
        scenario: Scenario,
        latest: Option<&GenerationSnapshot>,
        population: &Population,
    ) -> Self {
        let fulfillment_rate = latest.map_or(0.0, |s| s.fulfillment_rate);

        let mut acknowledgments = [0usize; NormKind::COUNT];
        for agent in population.iter() {
            for (norm, on) in agent.acknowledgments.iter() {
                acknowledgments[norm.index()] += on as usize;
            }
        }

        let mut top_trusted: Vec<TrustedAgent> = population
            .iter()
            .filter(|a| a.trust_count() > Self::MIN_TRUST_ENTRIES)
            .map(|a| TrustedAgent { id: a.id, trust_max: a.trust_max() })
            .collect();
        // Stable: ties keep slot order.
        top_trusted.sort_by(|a, b| b.trust_max.cmp(&a.trust_max));
        top_trusted.truncate(Self::TOP_TRUSTED);

        Self {
            generation,
            scenario,
            assessment: Assessment::from_fulfillment(fulfillment_rate),
            fulfillment_rate,
            relational_integrity: latest.map_or(0.0, |s| s.relational_integrity),
            avg_debt: latest.map_or(0.0, |s| s.avg_debt),
            avg_conflict: latest.map_or(0.0, |s| s.avg_conflict),
            repair_events: latest.map_or(0, |s| s.repaired),
            avg_trust_connections: mean(population.iter().map(|a| a.trust_count() as f32)),
            acknowledgments,
            top_trusted,
        }
    }
}

impl fmt::Display for InterpretiveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Interpretive summary, generation {}", self.generation.0)?;
        writeln!(f, "  scenario:               {}", self.scenario)?;
        writeln!(f, "  assessment:             {}", self.assessment)?;
        writeln!(f, "  fulfillment rate:       {:.2}", self.fulfillment_rate)?;
        writeln!(f, "  relational integrity:   {:.2}", self.relational_integrity)?;
        writeln!(f, "  contradiction debt:     {:.2}", self.avg_debt)?;
        writeln!(f, "  internal conflict:      {:.2}", self.avg_conflict)?;
        writeln!(f, "  repair events:          {}", self.repair_events)?;
        writeln!(f, "  avg trust connections:  {:.2}", self.avg_trust_connections)?;

        write!(f, "  acknowledgment:        ")?;
        for norm in NormKind::ALL {
            write!(f, " {}: {}", norm, self.acknowledgments[norm.index()])?;
        }
        writeln!(f)?;

        write!(f, "  top trusted:           ")?;
        if self.top_trusted.is_empty() {
            write!(f, " none")?;
        }
        for t in &self.top_trusted {
            write!(f, " {} (trust {})", t.id, t.trust_max)?;
        }
        writeln!(f)
    }
}
