//! Read-only display views.

use nm_core::{AgentId, NormKind, NormSet, ObligationId, Vector2};
use nm_obligation::ObligationState;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentView {
    pub id: AgentId,
    pub position: Vector2,
    pub velocity: Vector2,
    pub preference: NormKind,
    pub acknowledgments: NormSet,
    pub conflict: f32,
    pub debt: f32,
    pub momentum: f32,
    pub trust_count: usize,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObligationView {
    pub id: ObligationId,
    pub source: AgentId,
    pub target: AgentId,
    pub source_position: Vector2,
    pub target_position: Vector2,
    pub norm: NormKind,
    pub state: ObligationState,
    pub strength: f32,
    pub age: u32,
    pub expiration_ticks: u32,
}
