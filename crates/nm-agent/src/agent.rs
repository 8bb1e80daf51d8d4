//! A single agent: normative profile, trust, obligation history, motion.

use std::collections::BTreeMap;

use nm_core::{
    AgentId, Arena, BoundedLog, Generation, InheritanceParams, NormKind, NormSet, SimRng,
    Vector2,
};

use crate::{LedgerKey, LedgerStatus, RelationalLedger};

/// Immutable per-generation snapshot of an agent, appended by
/// [`Agent::record_biography`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BiographyEntry {
    pub generation: Generation,
    pub preference: NormKind,
    pub acknowledgments: NormSet,
    pub trust_count: usize,
    pub trust_max: i32,
    pub momentum: f32,
    pub debt: f32,
    pub conflict: f32,
}

/// An individual in the population.
///
/// Kinematic fields are `pub` for the steering and display code.  Counters,
/// trust and the derived scalars are private: they change only through
/// [`record_resolution`](Agent::record_resolution) and
/// [`recompute_conflict_and_debt`](Agent::recompute_conflict_and_debt).
#[derive(Clone, Debug)]
pub struct Agent {
    pub id: AgentId,

    pub position: Vector2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
    /// Unit heading of the background wander force.
    pub wander: Vector2,

    pub acknowledgments: NormSet,
    pub preference: NormKind,
    /// Acknowledgments as of the last flip audit.
    pub audited_acknowledgments: NormSet,

    /// Resistance to change, inherited with jitter.  In `[0.1, 1.0]`.
    pub momentum: f32,
    pub birth_generation: Generation,

    pub ledger: RelationalLedger,

    trust: BTreeMap<AgentId, i32>,
    attempts: u32,
    successes: u32,
    internal_conflict: f32,
    contradiction_debt: f32,
    biography: BoundedLog<BiographyEntry>,
}

impl Agent {
    /// A bare agent with the given profile at rest at `position`.
    pub fn new(
        id: AgentId,
        position: Vector2,
        acknowledgments: NormSet,
        preference: NormKind,
        birth_generation: Generation,
    ) -> Self {
        let mut agent = Self {
            id,
            position,
            velocity: Vector2::ZERO,
            acceleration: Vector2::ZERO,
            wander: Vector2::new(1.0, 0.0),
            acknowledgments,
            preference,
            audited_acknowledgments: acknowledgments,
            momentum: 0.5,
            birth_generation,
            ledger: RelationalLedger::new(),
            trust: BTreeMap::new(),
            attempts: 0,
            successes: 0,
            internal_conflict: 0.0,
            contradiction_debt: 0.0,
            biography: BoundedLog::unbounded(),
        };
        agent.recompute_conflict_and_debt();
        agent
    }

    /// A founding agent: random position, coin-flip acknowledgments, uniform
    /// preference, momentum in `[0.3, 1.0)`.
    pub fn founder(id: AgentId, arena: &Arena, birth_generation: Generation, rng: &mut SimRng) -> Self {
        let position = arena.random_point(rng);
        let acknowledgments = NormSet::from_fn(|_| rng.unit() > 0.5);
        let preference = NormKind::sample(rng);
        let mut agent = Self::new(id, position, acknowledgments, preference, birth_generation);
        agent.momentum = rng.gen_range(0.3..1.0);
        agent.wander = Vector2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU));
        agent
    }

    /// A child of `parent`.
    ///
    /// Each acknowledgment is copied with probability
    /// `fidelity_base − mutation_rate(parent.conflict)`, otherwise re-drawn by
    /// coin flip.  The preference is copied with `preference_fidelity`,
    /// otherwise re-drawn.  Momentum is the parent's, jittered and clamped.
    pub fn offspring(
        parent: &Agent,
        id: AgentId,
        birth_generation: Generation,
        inheritance: &InheritanceParams,
        arena: &Arena,
        rng: &mut SimRng,
    ) -> Self {
        let copy_p = inheritance.fidelity_base - inheritance.mutation_rate(parent.internal_conflict);
        let acknowledgments = NormSet::from_fn(|norm| {
            if rng.unit() < copy_p {
                parent.acknowledgments.acknowledges(norm)
            } else {
                rng.unit() > 0.5
            }
        });
        let preference = if rng.unit() < inheritance.preference_fidelity {
            parent.preference
        } else {
            NormKind::sample(rng)
        };
        let momentum = if inheritance.momentum_jitter > 0.0 {
            parent.momentum + rng.gen_range(-inheritance.momentum_jitter..inheritance.momentum_jitter)
        } else {
            parent.momentum
        }
        .clamp(inheritance.momentum_min, inheritance.momentum_max);

        let offset = if inheritance.spawn_jitter > 0.0 {
            let j = inheritance.spawn_jitter;
            Vector2::new(rng.gen_range(-j..=j), rng.gen_range(-j..=j))
        } else {
            Vector2::ZERO
        };

        let mut child = Self::new(id, arena.wrap(parent.position + offset), acknowledgments, preference, birth_generation);
        child.momentum = momentum;
        child.wander = Vector2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU));
        child
    }

    // ── Derived state ─────────────────────────────────────────────────────

    #[inline]
    pub fn internal_conflict(&self) -> f32 {
        self.internal_conflict
    }

    #[inline]
    pub fn contradiction_debt(&self) -> f32 {
        self.contradiction_debt
    }

    #[inline]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[inline]
    pub fn successes(&self) -> u32 {
        self.successes
    }

    /// `successes / attempts`, or 0 with no attempts.
    pub fn success_rate(&self) -> f32 {
        if self.attempts == 0 { 0.0 } else { self.successes as f32 / self.attempts as f32 }
    }

    #[inline]
    pub fn age(&self, now: Generation) -> u32 {
        now.age_since(self.birth_generation)
    }

    /// Refresh `internal_conflict` from the acknowledgment profile and
    /// `contradiction_debt` from the attempt counters.
    pub fn recompute_conflict_and_debt(&mut self) {
        self.internal_conflict = self.acknowledgments.conflict_with(self.preference);
        let failed = self.attempts - self.successes;
        self.contradiction_debt = failed as f32 / self.attempts.max(1) as f32;
    }

    // ── Trust ─────────────────────────────────────────────────────────────

    /// +1 on success, −1 otherwise.
    pub fn record_trust(&mut self, peer: AgentId, success: bool) {
        let score = self.trust.entry(peer).or_insert(0);
        *score += if success { 1 } else { -1 };
    }

    pub fn trust_in(&self, peer: AgentId) -> i32 {
        self.trust.get(&peer).copied().unwrap_or(0)
    }

    /// `(peer, score)` pairs in id order.
    pub fn trust_scores(&self) -> impl Iterator<Item = (AgentId, i32)> + '_ {
        self.trust.iter().map(|(k, v)| (*k, *v))
    }

    /// Number of peers with a trust entry.
    pub fn trust_count(&self) -> usize {
        self.trust.len()
    }

    /// Highest trust score, or 0 with no entries.  Negative maxima report 0.
    pub fn trust_max(&self) -> i32 {
        self.trust.values().copied().max().unwrap_or(0).max(0)
    }

    pub fn trust_min(&self) -> i32 {
        self.trust.values().copied().min().unwrap_or(0)
    }

    // ── Obligation bookkeeping ────────────────────────────────────────────

    /// Account for an obligation this agent issued to `peer` resolving as
    /// `status` during `generation`.
    ///
    /// - `Fulfilled`: attempts+1, successes+1, trust+1.
    /// - `Denied`:    attempts+1, trust−1.
    /// - `Expired`:   attempts+1.
    ///
    /// The ledger write follows first-resolution-wins; the return value says
    /// whether it happened.  Counters and trust are updated either way.
    pub fn record_resolution(&mut self, peer: AgentId, generation: Generation, status: LedgerStatus) -> bool {
        debug_assert_ne!(peer, self.id, "agents do not owe obligations to themselves");
        match status {
            LedgerStatus::Fulfilled => {
                self.attempts += 1;
                self.successes += 1;
                self.record_trust(peer, true);
            }
            LedgerStatus::Denied => {
                self.attempts += 1;
                self.record_trust(peer, false);
            }
            LedgerStatus::Expired => {
                self.attempts += 1;
            }
            LedgerStatus::Repaired => {
                debug_assert!(false, "repaired is not a resolution");
                return false;
            }
        }
        let written = self.ledger.record(LedgerKey::new(peer, generation), status);
        self.recompute_conflict_and_debt();
        written
    }

    // ── Biography ─────────────────────────────────────────────────────────

    /// Set the biography retention cap.  Existing entries are kept up to the
    /// new cap.
    pub fn set_biography_cap(&mut self, cap: Option<usize>) {
        let mut log = BoundedLog::new(cap);
        for entry in self.biography.drain() {
            log.push(entry);
        }
        self.biography = log;
    }

    pub fn record_biography(&mut self, generation: Generation) {
        self.biography.push(BiographyEntry {
            generation,
            preference: self.preference,
            acknowledgments: self.acknowledgments,
            trust_count: self.trust_count(),
            trust_max: self.trust_max(),
            momentum: self.momentum,
            debt: self.contradiction_debt,
            conflict: self.internal_conflict,
        });
    }

    pub fn biography(&self) -> impl Iterator<Item = &BiographyEntry> + '_ {
        self.biography.iter()
    }

    pub fn biography_len(&self) -> usize {
        self.biography.len()
    }
}
