//! Per-generation aggregate.

use nm_agent::{LedgerCounts, Population};
use nm_core::{Generation, NormKind};

/// `num / den`, or 0 when `den` is 0.
#[inline]
pub fn ratio(num: u32, den: u32) -> f32 {
    if den == 0 { 0.0 } else { num as f32 / den as f32 }
}

/// Arithmetic mean, or 0 for an empty iterator.
pub fn mean(values: impl IntoIterator<Item = f32>) -> f32 {
    let (sum, n) = values.into_iter().fold((0.0f64, 0u32), |(s, n), v| (s + v as f64, n + 1));
    if n == 0 { 0.0 } else { (sum / n as f64) as f32 }
}

/// Committed state of one generation.
///
/// Event tallies count obligation events stamped with `generation`,
/// including repairs performed at its closing boundary.  Population means
/// are taken over the survivors of that boundary's death pass.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationSnapshot {
    pub generation: Generation,
    pub population: usize,
    /// Obligations issued for this generation.
    pub obligations: usize,

    pub fulfilled: u32,
    pub denied: u32,
    pub expired: u32,
    pub repaired: u32,

    /// `fulfilled / all events` (repairs included).
    pub fulfillment_rate: f32,
    /// `fulfilled / (fulfilled + denied + expired)`.
    pub relational_integrity: f32,
    /// Mean of each survivor's lifetime `successes / attempts`.
    pub mean_success_rate: f32,
    pub avg_conflict: f32,
    pub avg_debt: f32,
    pub avg_momentum: f32,
    /// Survivors acknowledging each norm, indexed by [`NormKind::index`].
    pub acknowledgments: [usize; NormKind::COUNT],

    pub deaths: usize,
    /// Filled in after reproduction.
    pub births: usize,
}

impl GenerationSnapshot {
    pub fn aggregate(
        generation: Generation,
        population: &Population,
        obligations: usize,
        events: LedgerCounts,
        deaths: usize,
    ) -> Self {
        let mut acknowledgments = [0usize; NormKind::COUNT];
        for agent in population.iter() {
            for (norm, on) in agent.acknowledgments.iter() {
                acknowledgments[norm.index()] += on as usize;
            }
        }

        Self {
            generation,
            population: population.len(),
            obligations,
            fulfilled: events.fulfilled,
            denied: events.denied,
            expired: events.expired,
            repaired: events.repaired,
            fulfillment_rate: ratio(events.fulfilled, events.total()),
            relational_integrity: ratio(events.fulfilled, events.resolved()),
            mean_success_rate: mean(population.iter().map(|a| a.success_rate())),
            avg_conflict: mean(population.iter().map(|a| a.internal_conflict())),
            avg_debt: mean(population.iter().map(|a| a.contradiction_debt())),
            avg_momentum: mean(population.iter().map(|a| a.momentum)),
            acknowledgments,
            deaths,
            births: 0,
        }
    }

    #[inline]
    pub fn acknowledging(&self, norm: NormKind) -> usize {
        self.acknowledgments[norm.index()]
    }

    pub fn events(&self) -> LedgerCounts {
        LedgerCounts {
            fulfilled: self.fulfilled,
            denied: self.denied,
            expired: self.expired,
            repaired: self.repaired,
        }
    }
}
