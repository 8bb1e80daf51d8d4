//! `BoundedLog` — append-only log with an optional retention cap.
//!
//! Entries are never edited after `push`.  With a cap, the oldest entries are
//! evicted once the log is full; [`drain`](BoundedLog::drain) hands the
//! current contents to an exporter and empties the log (periodic flush).

use std::collections::VecDeque;

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundedLog<T> {
    entries: VecDeque<T>,
    cap: Option<usize>,
    /// Entries evicted by the cap since creation.
    evicted: u64,
}

impl<T> BoundedLog<T> {
    pub fn new(cap: Option<usize>) -> Self {
        Self { entries: VecDeque::new(), cap, evicted: 0 }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn push(&mut self, entry: T) {
        if self.cap == Some(0) {
            self.evicted += 1;
            return;
        }
        if let Some(cap) = self.cap {
            while self.entries.len() >= cap {
                self.entries.pop_front();
                self.evicted += 1;
            }
        }
        self.entries.push_back(entry);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn cap(&self) -> Option<usize> {
        self.cap
    }

    #[inline]
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn last(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Oldest-first iteration.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.entries.iter()
    }

    /// Remove and return every retained entry, oldest first.
    pub fn drain(&mut self) -> Vec<T> {
        self.entries.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.evicted = 0;
    }
}

impl<T> Default for BoundedLog<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}
