//! Shared registry of live allocations.
//!
//! The registry owns every block and hands out monotonically increasing
//! string ids. All access goes through one mutex so that the id counter and
//! the map mutate as a single atomic unit per request; the lock is only held
//! for short synchronous sections, never across an await.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, info};

use crate::block::{AllocError, Block};

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    entries: HashMap<String, Block>,
}

/// Registry of named allocations plus the id counter.
///
/// Ids are decimal strings starting at `"1"` and are never reused within a
/// process lifetime. The counter only advances on successful allocation, so
/// ids are gap-free.
#[derive(Debug, Default)]
pub struct Registry {
    inner: Mutex<Inner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate `units` MiB and register the block under a fresh id.
    ///
    /// On allocation failure nothing is registered and the counter is left
    /// untouched.
    pub fn allocate(&self, units: usize) -> Result<String, AllocError> {
        let block = Block::allocate(units)?;
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id.to_string();
        inner.entries.insert(id.clone(), block);
        debug!(id = %id, units, "registered allocation");
        Ok(id)
    }

    /// Remove the entry for `id`, freeing its memory. Returns whether the id
    /// was present. The counter is unaffected.
    pub fn deallocate(&self, id: &str) -> bool {
        let removed = self.lock().entries.remove(id);
        match removed {
            Some(block) => {
                debug!(id = %id, units = block.units(), "deallocated");
                true
            }
            None => false,
        }
    }

    /// Remove every entry, freeing all held memory. Returns how many entries
    /// were dropped. The counter is not reset.
    pub fn clear(&self) -> usize {
        let drained = {
            let mut inner = self.lock();
            std::mem::take(&mut inner.entries)
        };
        let count = drained.len();
        info!(count, "cleared all allocations");
        count
    }

    /// Current entries as `(id, units)` pairs, sorted by numeric id.
    ///
    /// Callers must not rely on the order; sorting is for stable output only.
    pub fn snapshot(&self) -> Vec<(String, usize)> {
        let inner = self.lock();
        let mut entries: Vec<(String, usize)> = inner
            .entries
            .iter()
            .map(|(id, block)| (id.clone(), block.units()))
            .collect();
        entries.sort_by_key(|(id, _)| id.parse::<u64>().unwrap_or(u64::MAX));
        entries
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means a handler panicked mid-mutation; the map and
        // counter are still structurally valid, so keep serving.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
