//! Run configuration.
//!
//! `WorldConfig` groups every tunable constant of the model.  The defaults
//! reproduce the reference parameterisation; applications typically start
//! from `WorldConfig::default()` and override a handful of fields, or load the
//! whole struct from a file with the `serde` feature enabled.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult, SimRng, Vector2};

// ── Arena ─────────────────────────────────────────────────────────────────────

/// Axis-aligned movement area with wraparound at its edges.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arena {
    pub min: Vector2,
    pub max: Vector2,
}

impl Arena {
    pub fn new(min: Vector2, max: Vector2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn contains(&self, p: Vector2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Teleport a point that left the arena to the opposite edge.
    pub fn wrap(&self, mut p: Vector2) -> Vector2 {
        if p.x < self.min.x {
            p.x = self.max.x;
        } else if p.x > self.max.x {
            p.x = self.min.x;
        }
        if p.y < self.min.y {
            p.y = self.max.y;
        } else if p.y > self.max.y {
            p.y = self.min.y;
        }
        p
    }

    /// Uniformly random point inside the arena.
    pub fn random_point(&self, rng: &mut SimRng) -> Vector2 {
        Vector2::new(
            rng.gen_range(self.min.x..=self.max.x),
            rng.gen_range(self.min.y..=self.max.y),
        )
    }
}

impl Default for Arena {
    /// A 1280×800 canvas minus the side panel and chart margins.
    fn default() -> Self {
        Self {
            min: Vector2::new(180.0, 50.0),
            max: Vector2::new(1_260.0, 650.0),
        }
    }
}

// ── Parameter groups ─────────────────────────────────────────────────────────

/// Death-probability coefficients.
///
///   p = base + min(conflict × conflict_weight, conflict_cap)
///         + max(age − senescence_age, 0) × senescence_slope
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MortalityParams {
    pub base_rate: f64,
    pub conflict_weight: f64,
    pub conflict_cap: f64,
    pub senescence_age: u32,
    pub senescence_slope: f64,
}

impl MortalityParams {
    /// Per-generation death probability for an agent of the given internal
    /// conflict and age (in generations).  Non-decreasing in both arguments.
    pub fn death_probability(&self, conflict: f32, age: u32) -> f64 {
        let conflict_term = (conflict.max(0.0) as f64 * self.conflict_weight).min(self.conflict_cap);
        let senescence = age.saturating_sub(self.senescence_age) as f64 * self.senescence_slope;
        self.base_rate + conflict_term + senescence
    }
}

impl Default for MortalityParams {
    fn default() -> Self {
        Self {
            base_rate: 0.05,
            conflict_weight: 0.01,
            conflict_cap: 0.1,
            senescence_age: 5,
            senescence_slope: 0.05,
        }
    }
}

/// How faithfully children copy their parent.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InheritanceParams {
    /// Copy probability before the mutation rate is subtracted.
    pub fidelity_base: f64,
    pub mutation_base: f64,
    /// Added to the mutation rate per unit of parent internal conflict.
    pub mutation_per_conflict: f64,
    pub preference_fidelity: f64,
    pub momentum_jitter: f32,
    pub momentum_min: f32,
    pub momentum_max: f32,
    /// Children spawn within this distance of the parent on each axis.
    pub spawn_jitter: f32,
}

impl InheritanceParams {
    /// Mutation rate for a parent with the given internal conflict.
    #[inline]
    pub fn mutation_rate(&self, parent_conflict: f32) -> f64 {
        self.mutation_base + self.mutation_per_conflict * parent_conflict as f64
    }
}

impl Default for InheritanceParams {
    fn default() -> Self {
        Self {
            fidelity_base: 0.85,
            mutation_base: 0.05,
            mutation_per_conflict: 0.1,
            preference_fidelity: 0.75,
            momentum_jitter: 0.1,
            momentum_min: 0.1,
            momentum_max: 1.0,
            spawn_jitter: 10.0,
        }
    }
}

/// Steering radii and force magnitudes.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SteeringParams {
    pub separation_radius: f32,
    pub separation_force: f32,
    pub cohesion_radius: f32,
    pub cohesion_force: f32,
    pub alignment_force: f32,
    /// Trust score a peer must exceed before the agent seeks it out.
    pub trust_seek_threshold: i32,
    /// Seek force per point of trust.
    pub trust_seek_gain: f32,
    pub wander_force: f32,
    /// Maximum wander heading change per tick, radians.
    pub wander_turn: f32,
    pub max_acceleration: f32,
    pub max_speed: f32,
    /// Velocity multiplier applied every tick.
    pub damping: f32,
    /// Fraction of acceleration carried into the next tick.
    pub acceleration_carry: f32,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            separation_radius: 24.0,
            separation_force: 0.08,
            cohesion_radius: 60.0,
            cohesion_force: 0.05,
            alignment_force: 0.05,
            trust_seek_threshold: 2,
            trust_seek_gain: 0.05,
            wander_force: 0.03,
            wander_turn: 0.1,
            max_acceleration: 0.2,
            max_speed: 2.5,
            damping: 0.95,
            acceleration_carry: 0.6,
        }
    }
}

// ── Experiment flags ─────────────────────────────────────────────────────────

/// The three runtime toggles.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Flag {
    MoralRepair,
    /// Reserved: stored and reported, not consumed by enforcement.
    DirectedEmergence,
    /// Reserved: stored and reported, not consumed by enforcement.
    NonReciprocalTargeting,
}

impl Flag {
    pub const ALL: [Flag; 3] = [
        Flag::MoralRepair,
        Flag::DirectedEmergence,
        Flag::NonReciprocalTargeting,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Flag::MoralRepair => "moral_repair",
            Flag::DirectedEmergence => "directed_emergence",
            Flag::NonReciprocalTargeting => "non_reciprocal_targeting",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Flag {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Flag::ALL
            .into_iter()
            .find(|f| f.name() == key)
            .ok_or_else(|| CoreError::UnknownFlag(s.to_owned()))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentFlags {
    pub moral_repair: bool,
    pub directed_emergence: bool,
    pub non_reciprocal_targeting: bool,
}

impl ExperimentFlags {
    pub fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::MoralRepair => self.moral_repair,
            Flag::DirectedEmergence => self.directed_emergence,
            Flag::NonReciprocalTargeting => self.non_reciprocal_targeting,
        }
    }

    pub fn set(&mut self, flag: Flag, value: bool) {
        match flag {
            Flag::MoralRepair => self.moral_repair = value,
            Flag::DirectedEmergence => self.directed_emergence = value,
            Flag::NonReciprocalTargeting => self.non_reciprocal_targeting = value,
        }
    }
}

impl Default for ExperimentFlags {
    fn default() -> Self {
        Self {
            moral_repair: true,
            directed_emergence: false,
            non_reciprocal_targeting: false,
        }
    }
}

// ── Retention ────────────────────────────────────────────────────────────────

/// Caps for the append-only logs.  `None` keeps everything; `Some(n)` keeps
/// the newest `n` entries and evicts the oldest.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetentionPolicy {
    pub generation_log: Option<usize>,
    pub agent_log: Option<usize>,
    pub obligation_log: Option<usize>,
    pub flip_log: Option<usize>,
    /// Per-agent biography length.
    pub biography: Option<usize>,
}

impl RetentionPolicy {
    pub const UNBOUNDED: RetentionPolicy = RetentionPolicy {
        generation_log: None,
        agent_log: None,
        obligation_log: None,
        flip_log: None,
        biography: None,
    };
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            generation_log: None,
            agent_log: Some(200_000),
            obligation_log: Some(100_000),
            flip_log: Some(10_000),
            biography: Some(256),
        }
    }
}

// ── WorldConfig ──────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
    pub initial_agents: usize,
    /// Population cap enforced at reproduction.
    pub max_agents: usize,
    pub ticks_per_generation: u32,
    pub arena: Arena,
    /// Obligation targets are drawn from agents within this distance.
    pub proximity_radius: f32,
    /// Obligations resolve as fulfilled when endpoints are closer than this.
    pub fulfillment_radius: f32,
    /// Candidate obligations per generation: min(agents × per_agent, max).
    pub obligations_per_agent: usize,
    pub max_obligations: usize,
    pub reproduction_probability: f64,
    /// Per-entry chance that a denied/expired ledger entry is repaired.
    pub repair_probability: f64,
    /// Enforce only half of the obligations each tick, alternating by parity.
    pub stagger_enforcement: bool,
    pub mortality: MortalityParams,
    pub inheritance: InheritanceParams,
    pub steering: SteeringParams,
    pub flags: ExperimentFlags,
    pub retention: RetentionPolicy,
}

impl WorldConfig {
    /// Number of candidate obligations sampled for a population of `n`.
    #[inline]
    pub fn obligation_budget(&self, n: usize) -> usize {
        n.saturating_mul(self.obligations_per_agent).min(self.max_obligations)
    }

    /// Reject configurations the scheduler cannot run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.ticks_per_generation == 0 {
            return Err(CoreError::Config("ticks_per_generation must be > 0".into()));
        }
        if self.initial_agents > self.max_agents {
            return Err(CoreError::Config(format!(
                "initial_agents ({}) exceeds max_agents ({})",
                self.initial_agents, self.max_agents
            )));
        }
        if !(self.arena.min.is_finite() && self.arena.max.is_finite())
            || self.arena.width() <= 0.0
            || self.arena.height() <= 0.0
        {
            return Err(CoreError::Config(format!(
                "arena must have positive extent, got {} .. {}",
                self.arena.min, self.arena.max
            )));
        }
        for (name, r) in [
            ("proximity_radius", self.proximity_radius),
            ("fulfillment_radius", self.fulfillment_radius),
        ] {
            if !r.is_finite() || r < 0.0 {
                return Err(CoreError::Config(format!("{name} must be finite and >= 0, got {r}")));
            }
        }
        for (name, p) in [
            ("reproduction_probability", self.reproduction_probability),
            ("repair_probability", self.repair_probability),
            ("mortality.base_rate", self.mortality.base_rate),
            ("inheritance.fidelity_base", self.inheritance.fidelity_base),
            ("inheritance.preference_fidelity", self.inheritance.preference_fidelity),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(CoreError::Config(format!("{name} must lie in [0, 1], got {p}")));
            }
        }
        if self.inheritance.momentum_min > self.inheritance.momentum_max {
            return Err(CoreError::Config("momentum_min exceeds momentum_max".into()));
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            initial_agents: 100,
            max_agents: 1_000,
            ticks_per_generation: 100,
            arena: Arena::default(),
            proximity_radius: 150.0,
            fulfillment_radius: 150.0,
            obligations_per_agent: 2,
            max_obligations: 500,
            reproduction_probability: 0.25,
            repair_probability: 0.10,
            stagger_enforcement: false,
            mortality: MortalityParams::default(),
            inheritance: InheritanceParams::default(),
            steering: SteeringParams::default(),
            flags: ExperimentFlags::default(),
            retention: RetentionPolicy::default(),
        }
    }
}
