//! Allocation state tracking
//!
//! [`AllocationTracker`] diffs successive heap snapshots of one process run
//! into cumulative allocation/free counts. It keeps the last known
//! allocated flag per block address and counts transitions:
//!
//! - unseen address, allocated → one allocation (a freshly observed free
//!   chunk is not counted, since no prior allocation was observed here)
//! - free → allocated: one allocation
//! - allocated → free: one free
//! - same flag as before: no count
//!
//! The tracker only ever sees real snapshot chunk lists. Synthetic coalesced
//! chunk lists must never be fed in: merging rewrites sizes and drops
//! addresses, which would corrupt the diff.

use crate::model::{BlockAddr, Chunk, Counters};
use rustc_hash::FxHashMap;

/// Per-process address→allocated state plus cumulative counters.
#[derive(Debug, Default)]
pub struct AllocationTracker {
    state: FxHashMap<BlockAddr, bool>,
    counters: Counters,
}

impl AllocationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one real record's chunk list and return the cumulative
    /// counters after applying it.
    pub fn observe(&mut self, chunks: &[Chunk]) -> Counters {
        for chunk in chunks {
            match self.state.get(&chunk.address) {
                None => {
                    if chunk.allocated {
                        self.counters.allocs += 1;
                    }
                }
                Some(&was_allocated) => {
                    if !was_allocated && chunk.allocated {
                        self.counters.allocs += 1;
                    }
                    if was_allocated && !chunk.allocated {
                        self.counters.frees += 1;
                    }
                }
            }
            // the new flag is stored even when no transition fired
            self.state.insert(chunk.address.clone(), chunk.allocated);
        }
        self.counters
    }

    /// Current cumulative counters.
    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Number of distinct addresses seen since the last reset.
    pub fn tracked_blocks(&self) -> usize {
        self.state.len()
    }

    /// Clear all state for a new process run.
    pub fn reset(&mut self) {
        self.state.clear();
        self.counters = Counters::default();
    }
}
