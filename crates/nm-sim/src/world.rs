//! The `World` struct: tick pipeline, generation boundary, control and
//! queries.

use log::{debug, info, warn};

use nm_agent::{
    Agent, BiographyEntry, LedgerCounts, Neighbor, Population, PopulationBuilder, Steering,
};
use nm_core::{
    AgentId, AgentRng, BoundedLog, ExperimentFlags, Flag, Generation, GenerationClock, SimRng,
    Tick, WorldConfig,
};
use nm_metrics::{AgentLogRow, FlipRecord, GenerationSnapshot, InterpretiveSummary, audit_flips};
use nm_obligation::{
    EnforcementContext, ObligationEvent, ObligationSampler, ObligationVector, ProximitySampler,
    repair_ledgers,
};
use nm_scenario::Scenario;
use nm_spatial::NeighborIndex;

use crate::{AgentView, Command, ObligationView, SimObserver};

// ── World ─────────────────────────────────────────────────────────────────────

/// The generation scheduler.  Sole owner and sole mutator of the population,
/// the obligation set and every log.
///
/// Each tick:
///
/// 1. Rebuild the id → slot map and the neighbour index.
/// 2. Enforce pending obligations (attraction forces accumulate into the
///    sources' acceleration).
/// 3. **Steering phase** (read-only, parallel with the `parallel` feature):
///    one [`Steering`] per agent from its neighbours and trusted peers.
/// 4. **Integration phase** (sequential, slot order): apply, integrate, wrap,
///    refresh conflict and debt.
/// 5. Advance the clock; at `ticks_per_generation` run the boundary.
///
/// The boundary runs death, moral repair, aggregation, per-agent logging,
/// reproduction and obligation resampling, in that order, and only then
/// notifies the observer.
///
/// Create via [`WorldBuilder`][crate::WorldBuilder].
pub struct World<S: ObligationSampler = ProximitySampler> {
    config: WorldConfig,
    scenario: Scenario,
    sampler: S,

    clock: GenerationClock,
    rng: SimRng,
    paused: bool,

    population: Population,
    obligations: Vec<ObligationVector>,
    neighbors: NeighborIndex,

    /// Tallies of events stamped with the current generation.
    events: LedgerCounts,

    generation_log: BoundedLog<GenerationSnapshot>,
    agent_log: BoundedLog<AgentLogRow>,
    obligation_log: BoundedLog<ObligationEvent>,
    flip_log: BoundedLog<FlipRecord>,
}

impl<S: ObligationSampler> World<S> {
    /// Assemble a world from validated inputs.  `population`, when given,
    /// is used as-is; otherwise founders are drawn and `scenario` applied.
    pub(crate) fn assemble(
        config: WorldConfig,
        scenario: Scenario,
        sampler: S,
        population: Option<Population>,
    ) -> Self {
        let mut rng = SimRng::new(config.seed);
        let population = match population {
            Some(p) => p,
            None => found(&config, scenario, &mut rng),
        };
        let retention = config.retention;

        let mut world = Self {
            clock: GenerationClock::new(config.ticks_per_generation),
            config,
            scenario,
            sampler,
            rng,
            paused: false,
            population,
            obligations: Vec::new(),
            neighbors: NeighborIndex::empty(),
            events: LedgerCounts::default(),
            generation_log: BoundedLog::new(retention.generation_log),
            agent_log: BoundedLog::new(retention.agent_log),
            obligation_log: BoundedLog::new(retention.obligation_log),
            flip_log: BoundedLog::new(retention.flip_log),
        };
        world.resample_obligations();
        world
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Advance exactly one tick, whether or not the world is paused.
    ///
    /// Returns `true` if the tick closed a generation.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> bool {
        let now = self.clock.tick;

        // ── Phase 1: indices ──────────────────────────────────────────────
        self.rebuild_neighbors();

        // ── Phase 2: obligation enforcement ───────────────────────────────
        let resolved = self.enforce(now);

        // ── Phase 3: steering (read-only) ─────────────────────────────────
        let steering = self.compute_steering();

        // ── Phase 4: integration (sequential, slot order) ─────────────────
        let params = &self.config.steering;
        let arena = &self.config.arena;
        for (agent, s) in self.population.agents_mut().iter_mut().zip(steering) {
            agent.integrate(s, params, arena);
        }

        observer.on_tick_end(now, resolved);

        // ── Phase 5: clock ────────────────────────────────────────────────
        if self.clock.advance_tick() {
            self.end_generation(observer);
            true
        } else {
            false
        }
    }

    /// Run `n` ticks.  Does nothing while paused.  Returns the number of
    /// ticks executed.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> u64 {
        if self.paused {
            return 0;
        }
        for _ in 0..n {
            self.step(observer);
        }
        n
    }

    /// Run until `n` generation boundaries have been crossed.  Does nothing
    /// while paused.  Returns the number of ticks executed.
    pub fn run_generations<O: SimObserver>(&mut self, n: u32, observer: &mut O) -> u64 {
        if self.paused {
            return 0;
        }
        let mut ticks = 0;
        let mut done = 0;
        while done < n {
            ticks += 1;
            if self.step(observer) {
                done += 1;
            }
        }
        ticks
    }

    // ── Control ───────────────────────────────────────────────────────────

    pub fn apply<O: SimObserver>(&mut self, command: Command, observer: &mut O) {
        match command {
            Command::Resume => self.resume(),
            Command::Pause => self.pause(),
            Command::Reset => self.reset(observer),
            Command::SetScenario(scenario) => self.set_scenario(scenario),
            Command::SetFlag(flag, on) => self.set_flag(flag, on),
            Command::Step => {
                self.step(observer);
            }
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Record `scenario` and re-initialize the live population with it.
    ///
    /// Changed acknowledgments surface in the flip log at the next boundary.
    pub fn set_scenario(&mut self, scenario: Scenario) {
        info!("scenario {} -> {} at {}", self.scenario, scenario, self.clock.generation);
        self.scenario = scenario;
        scenario.apply(&mut self.population, &mut self.rng);
    }

    pub fn set_flag(&mut self, flag: Flag, on: bool) {
        info!("flag {} = {}", flag, on);
        self.config.flags.set(flag, on);
    }

    /// Discard all state and rebuild from the configuration under the
    /// current scenario.  Both RNG streams are reseeded, so a reset world
    /// replays the same run.  The pause state is kept.
    pub fn reset<O: SimObserver>(&mut self, observer: &mut O) {
        self.rng = SimRng::new(self.config.seed);
        self.population = found(&self.config, self.scenario, &mut self.rng);
        self.clock = GenerationClock::new(self.config.ticks_per_generation);
        self.events = LedgerCounts::default();
        self.generation_log.clear();
        self.agent_log.clear();
        self.obligation_log.clear();
        self.flip_log.clear();
        self.resample_obligations();
        info!("world reset: {} agents, scenario {}", self.population.len(), self.scenario);
        observer.on_reset();
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[inline]
    pub fn flags(&self) -> ExperimentFlags {
        self.config.flags
    }

    #[inline]
    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    #[inline]
    pub fn clock(&self) -> &GenerationClock {
        &self.clock
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.clock.generation
    }

    #[inline]
    pub fn tick(&self) -> Tick {
        self.clock.tick
    }

    #[inline]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[inline]
    pub fn obligations(&self) -> &[ObligationVector] {
        &self.obligations
    }

    /// Event tallies for the generation in progress.
    #[inline]
    pub fn current_events(&self) -> LedgerCounts {
        self.events
    }

    pub fn agent_views(&self) -> impl Iterator<Item = AgentView> + '_ {
        self.population.iter().map(|a| AgentView {
            id: a.id,
            position: a.position,
            velocity: a.velocity,
            preference: a.preference,
            acknowledgments: a.acknowledgments,
            conflict: a.internal_conflict(),
            debt: a.contradiction_debt(),
            momentum: a.momentum,
            trust_count: a.trust_count(),
        })
    }

    pub fn obligation_views(&self) -> impl Iterator<Item = ObligationView> + '_ {
        self.obligations.iter().filter_map(|ob| {
            let source = self.population.get(ob.source)?;
            let target = self.population.get(ob.target)?;
            Some(ObligationView {
                id: ob.id,
                source: ob.source,
                target: ob.target,
                source_position: source.position,
                target_position: target.position,
                norm: ob.norm,
                state: ob.state(),
                strength: ob.strength,
                age: ob.age,
                expiration_ticks: ob.expiration_ticks,
            })
        })
    }

    #[inline]
    pub fn generation_log(&self) -> &BoundedLog<GenerationSnapshot> {
        &self.generation_log
    }

    #[inline]
    pub fn latest_snapshot(&self) -> Option<&GenerationSnapshot> {
        self.generation_log.last()
    }

    #[inline]
    pub fn agent_log(&self) -> &BoundedLog<AgentLogRow> {
        &self.agent_log
    }

    #[inline]
    pub fn obligation_log(&self) -> &BoundedLog<ObligationEvent> {
        &self.obligation_log
    }

    #[inline]
    pub fn flip_log(&self) -> &BoundedLog<FlipRecord> {
        &self.flip_log
    }

    /// A live agent's biography, oldest retained entry first.
    pub fn biography(&self, id: AgentId) -> Option<impl Iterator<Item = &BiographyEntry> + '_> {
        self.population.get(id).map(|a| a.biography())
    }

    /// Remove and return every retained agent-log row.
    pub fn drain_agent_log(&mut self) -> Vec<AgentLogRow> {
        self.agent_log.drain()
    }

    /// Remove and return every retained obligation event.
    pub fn drain_obligation_log(&mut self) -> Vec<ObligationEvent> {
        self.obligation_log.drain()
    }

    pub fn summary(&self) -> InterpretiveSummary {
        InterpretiveSummary::build(
            self.clock.generation,
            self.scenario,
            self.generation_log.last(),
            &self.population,
        )
    }

    // ── Tick phases ───────────────────────────────────────────────────────

    fn rebuild_neighbors(&mut self) {
        self.population.rebuild_index();
        self.neighbors = NeighborIndex::build(
            self.population
                .iter()
                .enumerate()
                .map(|(slot, a)| (slot, a.id, a.position)),
        );
    }

    /// Enforce pending obligations; with staggering, only those whose index
    /// parity matches the tick's.  Returns how many resolved.
    fn enforce(&mut self, now: Tick) -> usize {
        let ctx = EnforcementContext {
            generation: self.clock.generation,
            tick: now,
            fulfillment_radius: self.config.fulfillment_radius,
        };
        let stagger = self.config.stagger_enforcement;
        let parity = if now.is_even() { 0 } else { 1 };

        let mut resolved = 0;
        for (i, ob) in self.obligations.iter_mut().enumerate() {
            if stagger && i % 2 != parity {
                continue;
            }
            if let Some(event) = ob.enforce(&mut self.population, &ctx) {
                self.events.add(event.status);
                self.obligation_log.push(event);
                resolved += 1;
            }
        }
        resolved
    }

    /// One [`Steering`] per agent, slot-aligned.
    ///
    /// Reads the frozen population and the neighbour index; each agent draws
    /// only from its own RNG, so the parallel and sequential paths agree.
    fn compute_steering(&mut self) -> Vec<Steering> {
        let params = &self.config.steering;
        let radius = params.cohesion_radius.max(params.separation_radius);
        let index = &self.neighbors;
        let (view, rngs) = self.population.steering_parts();
        let agents = view.agents();

        let steer_one = |agent: &Agent, rng: &mut AgentRng| -> Steering {
            let nearby: Vec<Neighbor> = index
                .within(agent.position, radius)
                .into_iter()
                .map(|p| {
                    let other = &agents[p.slot];
                    Neighbor { id: other.id, position: other.position, velocity: other.velocity }
                })
                .collect();
            agent.steer(&nearby, &view, params, rng)
        };

        #[cfg(not(feature = "parallel"))]
        {
            agents.iter().zip(rngs.iter_mut()).map(|(a, rng)| steer_one(a, rng)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            agents
                .par_iter()
                .zip(rngs.par_iter_mut())
                .map(|(a, rng)| steer_one(a, rng))
                .collect()
        }
    }

    // ── Generation boundary ───────────────────────────────────────────────

    fn end_generation<O: SimObserver>(&mut self, observer: &mut O) {
        let generation = self.clock.generation;
        let tick = self.clock.tick;

        // ── ① Aging & death ───────────────────────────────────────────────
        let mortality = self.config.mortality;
        let rng = &mut self.rng;
        let dead = self.population.retain(|a| {
            !rng.gen_bool(mortality.death_probability(a.internal_conflict(), a.age(generation)))
        });
        for a in &dead {
            debug!("{} died in {} at age {}", a.id, generation, a.age(generation));
        }

        // ── ② Moral repair ────────────────────────────────────────────────
        if self.config.flags.moral_repair {
            let repaired = repair_ledgers(
                &mut self.population,
                self.config.repair_probability,
                generation,
                tick,
                &mut self.rng,
            );
            for event in repaired {
                self.events.add(event.status);
                self.obligation_log.push(event);
            }
        }

        // ── ③ Aggregation ─────────────────────────────────────────────────
        let mut snapshot = GenerationSnapshot::aggregate(
            generation,
            &self.population,
            self.obligations.len(),
            self.events,
            dead.len(),
        );

        // ── ④ Per-agent logging ───────────────────────────────────────────
        for agent in self.population.agents_mut() {
            agent.record_biography(generation);
            self.agent_log.push(AgentLogRow::capture(generation, self.scenario, agent));
            for flip in audit_flips(generation, agent) {
                self.flip_log.push(flip);
            }
        }

        // ── ⑤ Reproduction ────────────────────────────────────────────────
        snapshot.births = self.reproduce(generation.next());

        // ── ⑥ Next generation ─────────────────────────────────────────────
        self.clock.begin_next_generation();
        self.events = LedgerCounts::default();
        self.resample_obligations();
        if self.population.len() < 2 {
            warn!(
                "population collapsed to {} agent(s); no obligations in {}",
                self.population.len(),
                self.clock.generation
            );
        }

        info!(
            "{}: {} agents (-{} +{}), {} obligations, fulfillment {:.2}, integrity {:.2}, repaired {}",
            generation,
            self.population.len(),
            snapshot.deaths,
            snapshot.births,
            snapshot.obligations,
            snapshot.fulfillment_rate,
            snapshot.relational_integrity,
            snapshot.repaired,
        );

        // ── ⑦ Publish ─────────────────────────────────────────────────────
        self.generation_log.push(snapshot.clone());
        observer.on_generation_end(&snapshot, &self.population);
    }

    /// Every survivor reproduces with `reproduction_probability` while the
    /// population is below `max_agents`.  Returns the number of births.
    fn reproduce(&mut self, birth: Generation) -> usize {
        let cap = self.config.max_agents;
        let p = self.config.reproduction_probability;
        let mut next_id = self.population.next_id();
        let mut children: Vec<Agent> = Vec::new();
        let mut suppressed = 0usize;

        for parent in self.population.iter() {
            if !self.rng.gen_bool(p) {
                continue;
            }
            if self.population.len() + children.len() >= cap {
                suppressed += 1;
                continue;
            }
            let child = Agent::offspring(
                parent,
                next_id,
                birth,
                &self.config.inheritance,
                &self.config.arena,
                &mut self.rng,
            );
            debug!("{} born to {} in {}", child.id, parent.id, birth);
            children.push(child);
            next_id = next_id.next();
        }

        if suppressed > 0 {
            warn!("population cap {} reached; {} births suppressed", cap, suppressed);
        }

        let births = children.len();
        for child in children {
            self.population.spawn(move |_| child);
        }
        births
    }

    fn resample_obligations(&mut self) {
        self.rebuild_neighbors();
        self.obligations = self.sampler.sample(&self.population, &self.neighbors, &mut self.rng);
    }
}

/// Draw the founding population under `scenario`.  The loaded profile is
/// the audit baseline, so founders start with no pending flips.
fn found(config: &WorldConfig, scenario: Scenario, rng: &mut SimRng) -> Population {
    let mut population = PopulationBuilder::new(config.initial_agents, config.seed)
        .arena(config.arena)
        .biography_cap(config.retention.biography)
        .build(rng);
    scenario.apply(&mut population, rng);
    for agent in population.agents_mut() {
        agent.audited_acknowledgments = agent.acknowledgments;
    }
    population
}
