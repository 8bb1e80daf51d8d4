//! Fluent builder for constructing a [`World`].

use nm_agent::Population;
use nm_core::WorldConfig;
use nm_obligation::{GeneratorParams, ObligationSampler, ProximitySampler};
use nm_scenario::Scenario;

use crate::{SimError, SimResult, World};

/// Fluent builder for [`World<S>`].
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                                          |
/// |---------------------|--------------------------------------------------|
/// | `.scenario(s)`      | `Scenario::Pluralist`                            |
/// | `.sampler(s)`       | `ProximitySampler` configured from `WorldConfig` |
/// | `.population(p)`    | `initial_agents` founders under the scenario     |
///
/// # Example
///
/// ```rust
/// use nm_core::WorldConfig;
/// use nm_scenario::Scenario;
/// use nm_sim::{NoopObserver, WorldBuilder};
///
/// let config = WorldConfig { initial_agents: 20, ticks_per_generation: 10, ..WorldConfig::default() };
/// let mut world = WorldBuilder::new(config).scenario(Scenario::Utopian).build()?;
/// world.run_generations(2, &mut NoopObserver);
/// assert_eq!(world.generation_log().len(), 2);
/// # Ok::<(), nm_sim::SimError>(())
/// ```
pub struct WorldBuilder<S: ObligationSampler = ProximitySampler> {
    config: WorldConfig,
    scenario: Scenario,
    sampler: S,
    population: Option<Population>,
}

impl WorldBuilder<ProximitySampler> {
    pub fn new(config: WorldConfig) -> Self {
        let sampler = ProximitySampler::new(GeneratorParams::from_config(&config));
        Self { config, scenario: Scenario::default(), sampler, population: None }
    }
}

impl<S: ObligationSampler> WorldBuilder<S> {
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = scenario;
        self
    }

    /// Replace the obligation sampler.
    pub fn sampler<T: ObligationSampler>(self, sampler: T) -> WorldBuilder<T> {
        WorldBuilder {
            config: self.config,
            scenario: self.scenario,
            sampler,
            population: self.population,
        }
    }

    /// Start from a prepared population instead of drawing founders.  It is
    /// used as-is (no scenario is applied).  `reset` still rebuilds from the
    /// configuration.
    pub fn population(mut self, population: Population) -> Self {
        self.population = Some(population);
        self
    }

    /// Validate the configuration and return a ready-to-run [`World`] with
    /// its first obligation set sampled.
    pub fn build(self) -> SimResult<World<S>> {
        self.config.validate()?;

        let got = self.population.as_ref().map_or(0, Population::len);
        if got > self.config.max_agents {
            return Err(SimError::PopulationTooLarge { got, max: self.config.max_agents });
        }

        Ok(World::assemble(self.config, self.scenario, self.sampler, self.population))
    }
}
