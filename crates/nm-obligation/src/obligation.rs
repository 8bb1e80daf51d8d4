//! `ObligationVector` and its per-tick enforcement.

use log::trace;

use nm_agent::{LedgerStatus, Population};
use nm_core::{AgentId, Generation, NormKind, ObligationId, Tick};

use crate::ObligationEvent;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObligationState {
    Pending,
    Fulfilled,
    Denied,
    Expired,
}

impl ObligationState {
    /// The ledger status a resolved state is recorded as.
    pub fn resolution(self) -> Option<LedgerStatus> {
        match self {
            ObligationState::Pending => None,
            ObligationState::Fulfilled => Some(LedgerStatus::Fulfilled),
            ObligationState::Denied => Some(LedgerStatus::Denied),
            ObligationState::Expired => Some(LedgerStatus::Expired),
        }
    }
}

/// Where and when enforcement happens.
#[derive(Copy, Clone, Debug)]
pub struct EnforcementContext {
    pub generation: Generation,
    pub tick: Tick,
    /// Endpoints closer than this resolve as fulfilled.
    pub fulfillment_radius: f32,
}

/// A directed claim from `source` on `target` under `norm`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObligationVector {
    pub id: ObligationId,
    pub source: AgentId,
    pub target: AgentId,
    pub norm: NormKind,
    /// Magnitude of the pull on the source while pending.  In `[0.2, 1.0]`.
    pub strength: f32,
    /// Ticks spent pending.
    pub age: u32,
    pub expiration_ticks: u32,
    state: ObligationState,
}

impl ObligationVector {
    pub fn new(
        id: ObligationId,
        source: AgentId,
        target: AgentId,
        norm: NormKind,
        strength: f32,
        expiration_ticks: u32,
    ) -> Self {
        debug_assert_ne!(source, target, "obligation from an agent to itself");
        Self {
            id,
            source,
            target,
            norm,
            strength,
            age: 0,
            expiration_ticks,
            state: ObligationState::Pending,
        }
    }

    #[inline]
    pub fn state(&self) -> ObligationState {
        self.state
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.state == ObligationState::Pending
    }

    #[inline]
    pub fn is_fulfilled(&self) -> bool {
        self.state == ObligationState::Fulfilled
    }

    /// `true` once the pending obligation has reached its expiry age.
    #[inline]
    pub fn is_overdue(&self) -> bool {
        self.age >= self.expiration_ticks
    }

    /// Run one enforcement step.
    ///
    /// Returns the transition event if the obligation resolved this tick.
    /// Resolved obligations are left untouched.  An endpoint missing from
    /// `population` is a scheduler bug: it trips a debug assertion and is
    /// otherwise skipped.
    pub fn enforce(&mut self, population: &mut Population, ctx: &EnforcementContext) -> Option<ObligationEvent> {
        if !self.is_pending() {
            return None;
        }

        let (Some(si), Some(ti)) = (population.index_of(self.source), population.index_of(self.target)) else {
            debug_assert!(false, "obligation {:?} references a dead agent", self.id);
            return None;
        };

        let (target_acks, target_pos) = {
            let t = &population.agents()[ti];
            (t.acknowledgments.acknowledges(self.norm), t.position)
        };
        let source = &mut population.agents_mut()[si];

        let next = if !(source.acknowledgments.acknowledges(self.norm) && target_acks) {
            ObligationState::Denied
        } else if self.is_overdue() {
            ObligationState::Expired
        } else if source.position.dist(target_pos) < ctx.fulfillment_radius {
            ObligationState::Fulfilled
        } else {
            source.apply_force((target_pos - source.position).with_mag(self.strength));
            self.age += 1;
            return None;
        };

        self.state = next;
        let status = next.resolution()?;
        source.record_resolution(self.target, ctx.generation, status);
        trace!("{} {} -> {} [{}] {}", ctx.tick, self.source, self.target, self.norm, status);

        Some(ObligationEvent {
            generation: ctx.generation,
            tick: ctx.tick,
            obligation: Some(self.id),
            source: self.source,
            target: self.target,
            norm: Some(self.norm),
            status,
        })
    }
}
