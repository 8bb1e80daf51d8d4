//! Flat per-agent rows and the acknowledgment-flip audit.

use nm_agent::Agent;
use nm_core::{AgentId, Generation, NormKind, NormSet};
use nm_scenario::Scenario;

/// One surviving agent at one generation boundary.
///
/// `trust_max` is the raw highest score and may be negative; the biography
/// floors it at 0.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentLogRow {
    pub generation: Generation,
    pub scenario: Scenario,
    pub agent_id: AgentId,
    pub preference: NormKind,
    pub legal: bool,
    pub apriori: bool,
    pub care: bool,
    pub epistemic: bool,
    pub attempts: u32,
    pub successes: u32,
    pub conflict: f32,
    pub debt: f32,
    pub momentum: f32,
    pub trust_count: usize,
    pub trust_max: i32,
    pub fulfilled: u32,
    pub denied: u32,
    pub expired: u32,
    pub repaired: u32,
}

impl AgentLogRow {
    pub fn capture(generation: Generation, scenario: Scenario, agent: &Agent) -> Self {
        let acks = agent.acknowledgments;
        let ledger = agent.ledger.counts();
        Self {
            generation,
            scenario,
            agent_id: agent.id,
            preference: agent.preference,
            legal: acks.acknowledges(NormKind::Legal),
            apriori: acks.acknowledges(NormKind::Apriori),
            care: acks.acknowledges(NormKind::Care),
            epistemic: acks.acknowledges(NormKind::Epistemic),
            attempts: agent.attempts(),
            successes: agent.successes(),
            conflict: agent.internal_conflict(),
            debt: agent.contradiction_debt(),
            momentum: agent.momentum,
            trust_count: agent.trust_count(),
            trust_max: agent.trust_scores().map(|(_, s)| s).max().unwrap_or(0),
            fulfilled: ledger.fulfilled,
            denied: ledger.denied,
            expired: ledger.expired,
            repaired: ledger.repaired,
        }
    }

    pub fn acknowledgments(&self) -> NormSet {
        NormSet::from([self.legal, self.apriori, self.care, self.epistemic])
    }
}

/// An agent's acknowledgment of `norm` changed to `acknowledged`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlipRecord {
    pub generation: Generation,
    pub agent_id: AgentId,
    pub norm: NormKind,
    pub acknowledged: bool,
}

/// Compare `agent`'s acknowledgments against its last audited profile,
/// return one record per changed norm, and mark the current profile
/// audited.
pub fn audit_flips(generation: Generation, agent: &mut Agent) -> Vec<FlipRecord> {
    let flips: Vec<FlipRecord> = agent
        .acknowledgments
        .diff(&agent.audited_acknowledgments)
        .map(|norm| FlipRecord {
            generation,
            agent_id: agent.id,
            norm,
            acknowledged: agent.acknowledgments.acknowledges(norm),
        })
        .collect();
    agent.audited_acknowledgments = agent.acknowledgments;
    flips
}
