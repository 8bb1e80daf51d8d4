//! `nm-obligation` — directed, time-bounded claims between agents.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`obligation`]  | `ObligationVector`, `ObligationState`, enforcement        |
//! | [`event`]       | `ObligationEvent` — one record per state transition       |
//! | [`generator`]   | `ObligationSampler` trait, `ProximitySampler`             |
//! | [`repair`]      | Moral repair over relational ledgers                      |
//!
//! # State machine
//!
//! ```text
//!            ┌──────────── ack missing ───────────► denied ──┐
//! pending ───┼──────────── age ≥ expiry ──────────► expired ─┼─► repaired
//!    ▲  │    └──────────── distance < radius ─────► fulfilled  (boundary,
//!    └──┘ too far: pull source, age += 1                        probabilistic)
//! ```
//!
//! Checks run in that order once per tick while pending.  `fulfilled` and
//! `repaired` are terminal.  Obligations live for one generation; the
//! scheduler discards the set at every boundary.

pub mod event;
pub mod generator;
pub mod obligation;
pub mod repair;


pub use event::ObligationEvent;
pub use generator::{GeneratorParams, ObligationSampler, ProximitySampler};
pub use obligation::{EnforcementContext, ObligationState, ObligationVector};
pub use repair::repair_ledgers;
