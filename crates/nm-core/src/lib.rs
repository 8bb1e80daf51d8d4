//! `nm-core` — foundational types for the `rust_norms` simulation.
//!
//! This crate is a dependency of every other `nm-*` crate.  It has no `nm-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `ObligationId`                               |
//! | [`vec2`]        | `Vector2` — position / velocity math                    |
//! | [`norm`]        | `NormKind` (the four norms), `NormSet` (ack flags)      |
//! | [`time`]        | `Tick`, `Generation`, `GenerationClock`                 |
//! | [`retain`]      | `BoundedLog` — append-only log with retention cap       |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (world-level)          |
//! | [`config`]      | `WorldConfig` and its parameter groups                  |
//! | [`error`]       | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod norm;
pub mod retain;
pub mod rng;
pub mod time;
pub mod vec2;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    Arena, ExperimentFlags, Flag, InheritanceParams, MortalityParams, RetentionPolicy,
    SteeringParams, WorldConfig,
};
pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, ObligationId};
pub use norm::{NormKind, NormSet};
pub use retain::BoundedLog;
pub use rng::{AgentRng, SimRng};
pub use time::{Generation, GenerationClock, Tick};
pub use vec2::Vector2;
