//! Fluent builder for the founding population.
//!
//! # Usage
//!
//! ```rust
//! use nm_agent::PopulationBuilder;
//! use nm_core::{Arena, SimRng};
//!
//! let mut rng = SimRng::new(42);
//! let population = PopulationBuilder::new(100, 42)
//!     .arena(Arena::default())
//!     .build(&mut rng);
//!
//! assert_eq!(population.len(), 100);
//! ```

use nm_core::{Arena, Generation, SimRng};

use crate::{Agent, Population};

/// Builds a [`Population`] of founders with random profiles.
///
/// Scenario initialisers overwrite the acknowledgment flags afterwards.
pub struct PopulationBuilder {
    count: usize,
    seed: u64,
    arena: Arena,
    generation: Generation,
    biography_cap: Option<usize>,
}

impl PopulationBuilder {
    /// `count` founders; `seed` seeds the per-agent RNGs.
    pub fn new(count: usize, seed: u64) -> Self {
        Self {
            count,
            seed,
            arena: Arena::default(),
            generation: Generation::ZERO,
            biography_cap: None,
        }
    }

    pub fn arena(mut self, arena: Arena) -> Self {
        self.arena = arena;
        self
    }

    /// Birth generation stamped on every founder.
    pub fn generation(mut self, generation: Generation) -> Self {
        self.generation = generation;
        self
    }

    pub fn biography_cap(mut self, cap: Option<usize>) -> Self {
        self.biography_cap = cap;
        self
    }

    /// Create the founders, drawing positions and profiles from `rng`.
    pub fn build(self, rng: &mut SimRng) -> Population {
        let mut population = Population::new(self.seed, self.biography_cap);
        for _ in 0..self.count {
            population.spawn(|id| Agent::founder(id, &self.arena, self.generation, rng));
        }
        population
    }
}
