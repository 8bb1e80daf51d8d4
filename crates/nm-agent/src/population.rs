//! `Population` — the arena that owns every live agent.
//!
//! # Why agents and RNGs are split
//!
//! The steering phase needs `&[Agent]` (shared read access to every agent's
//! position and velocity) and `&mut AgentRng` (exclusive access to each
//! agent's own RNG) at the same time.  Keeping the RNGs in a parallel `Vec`
//! lets [`steering_parts`](Population::steering_parts) hand out both without
//! aliasing:
//!
//! ```ignore
//! let (view, rngs) = population.steering_parts();
//! let steering: Vec<Steering> = view
//!     .agents()
//!     .iter()
//!     .zip(rngs.iter_mut())
//!     .map(|(a, rng)| a.steer(&neighbours_of(a), &view, &params, rng))
//!     .collect();
//! ```
//!
//! # Identity
//!
//! Ids are allocated monotonically by [`spawn`](Population::spawn) and never
//! reused.  Slots, by contrast, shift when agents die; always go through
//! [`index_of`](Population::index_of) (an O(1) map rebuilt on every
//! membership change) rather than caching slot numbers across generations.

use rustc_hash::FxHashMap;

use nm_core::{AgentId, AgentRng, Vector2};

use crate::{Agent, PeerPositions};

#[derive(Debug)]
pub struct Population {
    agents: Vec<Agent>,
    rngs: Vec<AgentRng>,
    index: FxHashMap<AgentId, usize>,
    next_id: AgentId,
    seed: u64,
    biography_cap: Option<usize>,
}

impl Population {
    /// An empty population whose agents draw their RNG seeds from `seed`.
    pub fn new(seed: u64, biography_cap: Option<usize>) -> Self {
        Self {
            agents: Vec::new(),
            rngs: Vec::new(),
            index: FxHashMap::default(),
            next_id: AgentId(0),
            seed,
            biography_cap,
        }
    }

    // ── Membership ────────────────────────────────────────────────────────

    /// Allocate the next id, build an agent with it, and add it.
    pub fn spawn(&mut self, make: impl FnOnce(AgentId) -> Agent) -> AgentId {
        let id = self.next_id;
        self.next_id = id.next();

        let mut agent = make(id);
        debug_assert_eq!(agent.id, id, "agent built with a foreign id");
        agent.id = id;
        agent.set_biography_cap(self.biography_cap);

        self.index.insert(id, self.agents.len());
        self.agents.push(agent);
        self.rngs.push(AgentRng::new(self.seed, id));
        id
    }

    /// Keep agents for which `keep` returns `true`; return the removed ones
    /// in slot order.  The id → index map is rebuilt.
    pub fn retain(&mut self, mut keep: impl FnMut(&Agent) -> bool) -> Vec<Agent> {
        let mut removed = Vec::new();
        let agents = std::mem::take(&mut self.agents);
        let rngs = std::mem::take(&mut self.rngs);
        for (agent, rng) in agents.into_iter().zip(rngs) {
            if keep(&agent) {
                self.agents.push(agent);
                self.rngs.push(rng);
            } else {
                removed.push(agent);
            }
        }
        self.rebuild_index();
        removed
    }

    /// Recompute the id → slot map from scratch.
    pub fn rebuild_index(&mut self) {
        self.index.clear();
        self.index.reserve(self.agents.len());
        for (i, a) in self.agents.iter().enumerate() {
            self.index.insert(a.id, i);
        }
    }

    // ── Access ────────────────────────────────────────────────────────────

    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// The id the next spawned agent will receive.
    #[inline]
    pub fn next_id(&self) -> AgentId {
        self.next_id
    }

    #[inline]
    pub fn index_of(&self, id: AgentId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    #[inline]
    pub fn contains(&self, id: AgentId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.index_of(id).map(|i| &self.agents[i])
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        let i = self.index_of(id)?;
        Some(&mut self.agents[i])
    }

    /// All live agents in slot order.
    #[inline]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Mutable access to agent state.  Membership cannot change through this.
    #[inline]
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.iter().map(|a| a.id)
    }

    /// A read-only view of the agents plus exclusive per-agent RNGs,
    /// slot-aligned.
    pub fn steering_parts(&mut self) -> (PopulationView<'_>, &mut [AgentRng]) {
        (PopulationView { agents: &self.agents, index: &self.index }, &mut self.rngs)
    }
}

/// Shared, id-resolvable view of the agents, valid while the RNGs are
/// borrowed mutably.
#[derive(Copy, Clone, Debug)]
pub struct PopulationView<'a> {
    agents: &'a [Agent],
    index: &'a FxHashMap<AgentId, usize>,
}

impl<'a> PopulationView<'a> {
    #[inline]
    pub fn agents(&self) -> &'a [Agent] {
        self.agents
    }

    pub fn get(&self, id: AgentId) -> Option<&'a Agent> {
        self.index.get(&id).map(|&i| &self.agents[i])
    }
}

impl PeerPositions for PopulationView<'_> {
    fn position_of(&self, id: AgentId) -> Option<Vector2> {
        self.get(id).map(|a| a.position)
    }
}

impl PeerPositions for Population {
    fn position_of(&self, id: AgentId) -> Option<Vector2> {
        self.get(id).map(|a| a.position)
    }
}
