//! `nm-spatial` — proximity queries over agent positions.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`index`]   | `NeighborIndex` (R-tree), `IndexedPoint`                  |
//!
//! The index is rebuilt once per tick from the live population and shared by
//! the steering phase (flocking radii) and the obligation generator
//! (proximity-constrained target sampling).  Distances are plain Euclidean;
//! the arena's wraparound does not make opposite edges neighbours.

pub mod index;


pub use index::{IndexedPoint, NeighborIndex};
