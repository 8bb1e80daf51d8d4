//! World observer trait for progress reporting and data collection.

use nm_agent::Population;
use nm_core::Tick;
use nm_metrics::GenerationSnapshot;

/// Callbacks invoked by [`World`][crate::World] as it runs.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — generation printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl SimObserver for Printer {
///     fn on_generation_end(&mut self, s: &GenerationSnapshot, _: &Population) {
///         println!("{}: {} agents, fulfillment {:.2}", s.generation, s.population, s.fulfillment_rate);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called after every tick.  `resolved` is the number of obligations
    /// that left `pending` during the tick.
    fn on_tick_end(&mut self, _tick: Tick, _resolved: usize) {}

    /// Called once a generation boundary has fully committed: deaths,
    /// repair, logging, reproduction and obligation resampling are done.
    fn on_generation_end(&mut self, _snapshot: &GenerationSnapshot, _population: &Population) {}

    /// Called after the world has been rebuilt from its configuration.
    fn on_reset(&mut self) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
