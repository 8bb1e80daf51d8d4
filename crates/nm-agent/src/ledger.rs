//! Per-agent record of how each obligation it issued was resolved.
//!
//! Keys are `(peer, generation)`.  A key is written at most once by an
//! ordinary resolution; the only later transition is the moral-repair edge
//! `denied | expired → repaired`.

use std::collections::BTreeMap;
use std::fmt;

use nm_core::{AgentId, Generation};

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LedgerKey {
    pub peer: AgentId,
    pub generation: Generation,
}

impl LedgerKey {
    #[inline]
    pub fn new(peer: AgentId, generation: Generation) -> Self {
        Self { peer, generation }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LedgerStatus {
    Fulfilled,
    Denied,
    Expired,
    Repaired,
}

impl LedgerStatus {
    /// `true` for the states moral repair may act on.
    #[inline]
    pub fn is_repairable(self) -> bool {
        matches!(self, LedgerStatus::Denied | LedgerStatus::Expired)
    }

    pub const fn name(self) -> &'static str {
        match self {
            LedgerStatus::Fulfilled => "fulfilled",
            LedgerStatus::Denied => "denied",
            LedgerStatus::Expired => "expired",
            LedgerStatus::Repaired => "repaired",
        }
    }
}

impl fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Status tallies over a ledger.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LedgerCounts {
    pub fulfilled: u32,
    pub denied: u32,
    pub expired: u32,
    pub repaired: u32,
}

impl LedgerCounts {
    pub fn total(&self) -> u32 {
        self.fulfilled + self.denied + self.expired + self.repaired
    }

    /// Resolutions proper: everything except repairs.
    pub fn resolved(&self) -> u32 {
        self.fulfilled + self.denied + self.expired
    }

    pub fn add(&mut self, status: LedgerStatus) {
        match status {
            LedgerStatus::Fulfilled => self.fulfilled += 1,
            LedgerStatus::Denied => self.denied += 1,
            LedgerStatus::Expired => self.expired += 1,
            LedgerStatus::Repaired => self.repaired += 1,
        }
    }
}

impl FromIterator<LedgerStatus> for LedgerCounts {
    fn from_iter<I: IntoIterator<Item = LedgerStatus>>(iter: I) -> Self {
        let mut c = LedgerCounts::default();
        for status in iter {
            c.add(status);
        }
        c
    }
}

/// Ordered map so iteration (and therefore repair draws) is deterministic.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationalLedger {
    entries: BTreeMap<LedgerKey, LedgerStatus>,
}

impl RelationalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolution.  First resolution wins: returns `false` and leaves
    /// the ledger untouched if `key` already holds a status.
    pub fn record(&mut self, key: LedgerKey, status: LedgerStatus) -> bool {
        debug_assert!(
            status != LedgerStatus::Repaired,
            "repaired is only reachable through RelationalLedger::repair"
        );
        match self.entries.entry(key) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(status);
                true
            }
        }
    }

    /// Move a denied or expired entry to `repaired`.  Returns the prior
    /// status on success; `None` if the key is missing or not repairable.
    pub fn repair(&mut self, key: LedgerKey) -> Option<LedgerStatus> {
        let status = self.entries.get_mut(&key)?;
        if status.is_repairable() {
            let prior = *status;
            *status = LedgerStatus::Repaired;
            Some(prior)
        } else {
            None
        }
    }

    pub fn get(&self, key: &LedgerKey) -> Option<LedgerStatus> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (LedgerKey, LedgerStatus)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }

    /// Keys currently eligible for repair, in key order.
    pub fn repairable_keys(&self) -> Vec<LedgerKey> {
        self.entries
            .iter()
            .filter(|(_, s)| s.is_repairable())
            .map(|(k, _)| *k)
            .collect()
    }

    pub fn counts(&self) -> LedgerCounts {
        self.entries.values().copied().collect()
    }
}
