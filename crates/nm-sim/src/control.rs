//! Control commands accepted from an external driver.

use nm_core::Flag;
use nm_scenario::Scenario;

/// One control input.  Applied between ticks, never mid-tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Resume,
    Pause,
    /// Rebuild the world from its configuration under the current scenario.
    Reset,
    /// Record the scenario and re-initialize the live population with it.
    SetScenario(Scenario),
    SetFlag(Flag, bool),
    /// Advance exactly one tick, paused or not.
    Step,
}
