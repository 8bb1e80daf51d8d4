//! `nm-scenario` — deterministic acknowledgment profiles by name.
//!
//! | Scenario         | Acknowledgments                         | Preference            |
//! |------------------|-----------------------------------------|-----------------------|
//! | `pluralist`      | each flag true with p = 0.5             | uniform               |
//! | `authoritarian`  | legal only                              | uniform               |
//! | `utopian`        | all four                                | uniform               |
//! | `collapsed`      | none                                    | uniform               |
//! | `anomic`         | each flag true with p = 0.9             | uniform               |
//! | `allCare`        | care only                               | care                  |
//! | `allLegal`       | legal only                              | legal                 |
//! | `noApriori`      | each flag p = 0.5, apriori forced false | uniform, never apriori|
//! | `asymmetryOnly`  | none (p = 0.5) or exactly one           | uniform               |
//! | `genocideShock`  | none                                    | uniform               |
//!
//! All draws come from the caller's `SimRng`, agents visited in slot order.

pub mod error;
pub mod scenario;


pub use error::{ScenarioError, ScenarioResult};
pub use scenario::Scenario;
