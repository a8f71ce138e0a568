//! Heap snapshot data model
//!
//! This module provides the core data types flowing through the pipeline:
//! - [`BlockAddr`]: opaque identity key for a heap chunk
//! - [`Chunk`]: one contiguous region descriptor (address, size, allocated)
//! - [`Counters`]: cumulative alloc/free syscall counts for one process run
//! - [`Frame`]: one published chunk list at one sequence point
//! - [`coalesce`]: merging of adjacent free chunks for the synthetic view
//!
//! # Addresses
//!
//! Chunk addresses come straight out of the allocator log (`%p` formatting,
//! e.g. `0x55f3a2b4c010`) and are identity keys only. Physical adjacency is
//! encoded by line order within a snapshot, not by address arithmetic, so
//! [`BlockAddr`] is a string token rather than a numeric pointer.

pub mod coalesce;

use serde::Serialize;
use std::fmt;

/// Opaque identity token for a heap block.
///
/// Two chunks carrying the same `BlockAddr` across frames refer to the same
/// memory region. No ordering or arithmetic semantics are implied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BlockAddr(pub String);

impl fmt::Display for BlockAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockAddr {
    fn from(token: &str) -> Self {
        BlockAddr(token.to_string())
    }
}

impl From<String> for BlockAddr {
    fn from(token: String) -> Self {
        BlockAddr(token)
    }
}

/// One contiguous heap region as reported by the allocator hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// Identity key, never used for arithmetic
    pub address: BlockAddr,
    /// Region size in bytes
    pub size: u64,
    /// Whether the region is currently allocated (free otherwise)
    pub allocated: bool,
}

impl Chunk {
    pub fn new(address: impl Into<BlockAddr>, size: u64, allocated: bool) -> Self {
        Chunk {
            address: address.into(),
            size,
            allocated,
        }
    }
}

/// Cumulative allocation/free counts for one process lifetime.
///
/// Monotonically non-decreasing between process-id changes; reset to zero
/// atomically with the rest of the pipeline state on a new run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub allocs: u64,
    pub frees: u64,
}

/// One published heap state, real or synthetic.
///
/// Real frames carry `coalesced = false` and an integer sequence number
/// (1, 2, 3, ... per process lifetime). The synthetic merged frame derived
/// from a batch's last record shares that record's sequence number with
/// `coalesced = true`; on the wire it is distinguished by a `.5`-suffixed
/// snapshot id (see [`Frame::snapshot_id`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub pid: Option<u32>,
    pub seq: u32,
    pub chunks: Vec<Chunk>,
    pub coalesced: bool,
}

impl Frame {
    /// Wire-level snapshot id: `seq` for real frames, `seq + 0.5` for the
    /// synthetic coalesced frame.
    pub fn snapshot_id(&self) -> f64 {
        if self.coalesced {
            f64::from(self.seq) + 0.5
        } else {
            f64::from(self.seq)
        }
    }
}
