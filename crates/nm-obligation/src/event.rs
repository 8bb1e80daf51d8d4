//! Obligation event records.

use nm_agent::LedgerStatus;
use nm_core::{AgentId, Generation, NormKind, ObligationId, Tick};

/// One obligation state transition.
///
/// Resolutions carry the obligation's id and norm.  Repair events act on a
/// ledger entry rather than a live obligation, so both are `None` there.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObligationEvent {
    pub generation: Generation,
    pub tick: Tick,
    pub obligation: Option<ObligationId>,
    pub source: AgentId,
    pub target: AgentId,
    pub norm: Option<NormKind>,
    pub status: LedgerStatus,
}
