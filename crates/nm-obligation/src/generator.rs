//! Obligation sampling at the start of each generation.
//!
//! The scheduler is generic over [`ObligationSampler`] so tests and
//! experiments can script obligations.  [`ProximitySampler`] is the
//! production rule: random sources, targets drawn from the source's
//! neighbourhood.

use std::ops::Range;

use log::debug;

use nm_agent::Population;
use nm_core::{NormKind, ObligationId, SimRng, WorldConfig};
use nm_spatial::NeighborIndex;

use crate::ObligationVector;

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Produces the obligation set for a fresh generation.
///
/// `index` covers every agent in `population` at its current position.
/// Implementations must not create self-obligations or reference agents
/// outside `population`, and must draw randomness only from `rng`.
pub trait ObligationSampler: Send + Sync + 'static {
    fn sample(&self, population: &Population, index: &NeighborIndex, rng: &mut SimRng) -> Vec<ObligationVector>;
}

// ── ProximitySampler ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorParams {
    pub per_agent: usize,
    pub max_obligations: usize,
    /// Targets are chosen strictly inside this radius of the source.
    pub proximity_radius: f32,
    /// Inclusive strength bounds.
    pub strength: (f32, f32),
    pub expiration_ticks: Range<u32>,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            per_agent: 2,
            max_obligations: 500,
            proximity_radius: 150.0,
            strength: (0.2, 1.0),
            expiration_ticks: 10..20,
        }
    }
}

impl GeneratorParams {
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            per_agent: config.obligations_per_agent,
            max_obligations: config.max_obligations,
            proximity_radius: config.proximity_radius,
            ..Self::default()
        }
    }

    pub fn budget(&self, population: usize) -> usize {
        population.saturating_mul(self.per_agent).min(self.max_obligations)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProximitySampler {
    pub params: GeneratorParams,
}

impl ProximitySampler {
    pub fn new(params: GeneratorParams) -> Self {
        Self { params }
    }
}

impl ObligationSampler for ProximitySampler {
    /// Make `budget(N)` attempts.  Each picks a uniform source; an attempt
    /// whose source has no neighbour in range produces nothing, so the
    /// result may be shorter than the budget.
    fn sample(&self, population: &Population, index: &NeighborIndex, rng: &mut SimRng) -> Vec<ObligationVector> {
        let agents = population.agents();
        if agents.len() < 2 {
            return Vec::new();
        }

        let budget = self.params.budget(agents.len());
        let (lo, hi) = self.params.strength;
        let mut out = Vec::with_capacity(budget);
        let mut next_id = ObligationId(0);

        for _ in 0..budget {
            let source = &agents[rng.gen_range(0..agents.len())];
            let nearby = index.within_except(source.position, self.params.proximity_radius, source.id);
            let Some(target) = rng.choose(&nearby) else {
                continue;
            };
            let strength = rng.gen_range(lo..=hi);
            let norm = NormKind::sample(rng);
            let expiration = rng.gen_range(self.params.expiration_ticks.clone());

            out.push(ObligationVector::new(next_id, source.id, target.id, norm, strength, expiration));
            next_id = next_id.next();
        }

        if out.len() < budget {
            debug!("sampled {} of {} obligations; remaining sources were isolated", out.len(), budget);
        }
        out
    }
}
