//! `nm-sim` — the generation scheduler for the rust_norms simulation.
//!
//! # Two nested clocks
//!
//! ```text
//! every tick:
//!   ① Index      — rebuild id → slot map and the R-tree neighbour index
//!   ② Enforce    — each pending obligation: ack? → expired? → close? → pull
//!   ③ Steer      — per-agent forces from a frozen view (parallel with `parallel`)
//!   ④ Integrate  — sequential, slot order; refresh conflict and debt
//!
//! every ticks_per_generation ticks:
//!   ① Death      — p = base + min(conflict·w, cap) + senescence
//!   ② Repair     — denied|expired → repaired with repair_probability
//!   ③ Aggregate  — GenerationSnapshot
//!   ④ Log        — AgentLogRow, biography, acknowledgment flips
//!   ⑤ Reproduce  — subject to max_agents
//!   ⑥ Resample   — fresh obligation set for the next generation
//!   ⑦ Publish    — SimObserver::on_generation_end
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the steering phase on Rayon's thread pool.        |
//! | `serde`    | Serde derives on configs, views, rows and snapshots.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use nm_core::WorldConfig;
//! use nm_scenario::Scenario;
//! use nm_sim::{Command, NoopObserver, WorldBuilder};
//!
//! let mut world = WorldBuilder::new(WorldConfig::default())
//!     .scenario(Scenario::Anomic)
//!     .build()?;
//! world.run_generations(50, &mut NoopObserver);
//! world.apply(Command::SetScenario(Scenario::Collapsed), &mut NoopObserver);
//! println!("{}", world.summary());
//! ```

pub mod builder;
pub mod control;
pub mod error;
pub mod observer;
pub mod view;
pub mod world;

#[cfg(test)]
mod tests;

pub use builder::WorldBuilder;
pub use control::Command;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use view::{AgentView, ObligationView};
pub use world::World;
