//! Free-block coalescing
//!
//! Merges maximal runs of adjacent free chunks into single chunks, simulating
//! the compaction an allocator's free list could perform. Display-only: the
//! merged output is used for the synthetic end-of-batch frame and is never fed
//! back into allocation tracking.

use super::Chunk;

/// Merge every maximal run of two or more consecutive free chunks into one.
///
/// The merged chunk takes the first chunk's address and the summed size.
/// Allocated chunks are merge barriers and pass through unchanged, preserving
/// relative order. Adjacency is taken from list order, not address values.
///
/// Idempotent, and conserves the total of chunk sizes.
pub fn merge_adjacent_free(chunks: &[Chunk]) -> Vec<Chunk> {
    let mut merged: Vec<Chunk> = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        match merged.last_mut() {
            Some(prev) if !prev.allocated && !chunk.allocated => {
                // extend the current free run
                prev.size += chunk.size;
            }
            _ => merged.push(chunk.clone()),
        }
    }
    merged
}
