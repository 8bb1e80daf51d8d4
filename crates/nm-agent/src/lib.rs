//! `nm-agent` — individual agents and the population arena.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`agent`]       | `Agent`, `BiographyEntry`                                 |
//! | [`ledger`]      | `RelationalLedger`, `LedgerKey`, `LedgerStatus`           |
//! | [`steering`]    | `Neighbor`, `Steering`, `PeerPositions`                   |
//! | [`population`]  | `Population` — agents + per-agent RNGs + id → index map   |
//! | [`builder`]     | `PopulationBuilder` (founding population)                 |
//!
//! # Identity
//!
//! Agents refer to each other only by [`AgentId`](nm_core::AgentId).  The
//! population resolves ids to slots through a map rebuilt whenever membership
//! changes, so no agent ever holds a reference into another.

pub mod agent;
pub mod builder;
pub mod ledger;
pub mod population;
pub mod steering;

#[cfg(test)]
mod tests;

pub use agent::{Agent, BiographyEntry};
pub use builder::PopulationBuilder;
pub use ledger::{LedgerCounts, LedgerKey, LedgerStatus, RelationalLedger};
pub use population::{Population, PopulationView};
pub use steering::{Neighbor, PeerPositions, Steering};
