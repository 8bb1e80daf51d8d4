//! `nm-metrics` — what the scheduler publishes at each generation boundary.
//!
//! | Type                   | One per                     | Notes                                  |
//! |------------------------|-----------------------------|----------------------------------------|
//! | [`GenerationSnapshot`] | generation                  | event tallies, ratios, population means|
//! | [`AgentLogRow`]        | surviving agent, generation | flat row for an export layer           |
//! | [`FlipRecord`]         | acknowledgment change       | append-only audit                      |
//! | [`InterpretiveSummary`]| on demand                   | plain-text assessment of the latest row|
//!
//! Every ratio with a zero denominator is reported as `0.0`.

pub mod row;
pub mod snapshot;
pub mod summary;


pub use row::{AgentLogRow, FlipRecord, audit_flips};
pub use snapshot::{GenerationSnapshot, mean, ratio};
pub use summary::{Assessment, InterpretiveSummary, TrustedAgent};
