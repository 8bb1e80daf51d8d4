//! Moral repair: the boundary pass that reconciles failed resolutions.

use log::trace;

use nm_agent::{LedgerStatus, Population};
use nm_core::{Generation, SimRng, Tick};

use crate::ObligationEvent;

/// Walk every ledger and flip each `denied`/`expired` entry to `repaired`
/// with `probability`.
///
/// Agents are visited in slot order and keys in ledger order, one draw per
/// repairable entry, so the result depends only on `rng`.  Returns one
/// `Repaired` event per flip, stamped with `generation` and `tick`.
pub fn repair_ledgers(
    population: &mut Population,
    probability: f64,
    generation: Generation,
    tick: Tick,
    rng: &mut SimRng,
) -> Vec<ObligationEvent> {
    let mut events = Vec::new();
    for agent in population.agents_mut() {
        for key in agent.ledger.repairable_keys() {
            if !rng.gen_bool(probability) {
                continue;
            }
            if agent.ledger.repair(key).is_some() {
                trace!("{} repaired {} -> {} from {}", tick, agent.id, key.peer, key.generation);
                events.push(ObligationEvent {
                    generation,
                    tick,
                    obligation: None,
                    source: agent.id,
                    target: key.peer,
                    norm: None,
                    status: LedgerStatus::Repaired,
                });
            }
        }
    }
    events
}
