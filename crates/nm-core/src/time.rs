//! Simulation time model: two nested clocks.
//!
//! # Design
//!
//! The fine clock is a monotonically increasing `Tick`: one step of agent
//! motion plus obligation enforcement.  The coarse clock is the `Generation`:
//! every `ticks_per_generation` ticks the scheduler runs aging, metric
//! aggregation, reproduction, and obligation resampling.
//!
//! `GenerationClock` owns both counters so the boundary test lives in one
//! place:
//!
//!   boundary ⇔ ticks_into_generation == ticks_per_generation

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute tick counter since the last reset.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// `true` on even ticks.  Used to stagger obligation enforcement.
    #[inline]
    pub fn is_even(self) -> bool {
        self.0 % 2 == 0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Generation ───────────────────────────────────────────────────────────────

/// Index of a coarse simulation epoch.  Generation 0 is the founding one.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Generation(pub u32);

impl Generation {
    pub const ZERO: Generation = Generation(0);

    #[inline]
    pub fn next(self) -> Generation {
        Generation(self.0 + 1)
    }

    /// Generations elapsed since `birth`.  Saturates at zero.
    #[inline]
    pub fn age_since(self, birth: Generation) -> u32 {
        self.0.saturating_sub(birth.0)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

// ── GenerationClock ──────────────────────────────────────────────────────────

/// Tracks the current tick, the current generation, and progress toward the
/// next generation boundary.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationClock {
    pub tick: Tick,
    pub generation: Generation,
    /// Ticks elapsed in the current generation.
    pub ticks_into_generation: u32,
    pub ticks_per_generation: u32,
}

impl GenerationClock {
    pub fn new(ticks_per_generation: u32) -> Self {
        Self {
            tick: Tick::ZERO,
            generation: Generation::ZERO,
            ticks_into_generation: 0,
            ticks_per_generation,
        }
    }

    /// Advance one tick.  Returns `true` if this tick completes the current
    /// generation; the caller runs the boundary and then calls
    /// [`begin_next_generation`](Self::begin_next_generation).
    #[inline]
    pub fn advance_tick(&mut self) -> bool {
        self.tick = self.tick + 1;
        self.ticks_into_generation += 1;
        self.ticks_into_generation >= self.ticks_per_generation
    }

    pub fn begin_next_generation(&mut self) {
        self.generation = self.generation.next();
        self.ticks_into_generation = 0;
    }

    /// Ticks left before the next boundary.
    #[inline]
    pub fn ticks_until_boundary(&self) -> u32 {
        self.ticks_per_generation.saturating_sub(self.ticks_into_generation)
    }
}

impl fmt::Display for GenerationClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}/{})",
            self.generation, self.tick, self.ticks_into_generation, self.ticks_per_generation
        )
    }
}
