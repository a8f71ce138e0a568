//! # Introduction
//!
//! fragview watches the text log written by an instrumented allocator
//! (an `LD_PRELOAD` hook that appends one heap snapshot per malloc/free),
//! reconstructs chunk-level heap state over time, and streams timed frames
//! plus cumulative alloc/free counts to visualization subscribers.
//!
//! ## Pipeline
//!
//! ```text
//! heap_frag.log → Watcher → Ingester → Parser → Tracker ─┐
//!                                         └→ Coalescer ──┴→ Scheduler → Publisher
//! ```
//!
//! 1. [`ingest::watcher`] — debounced change detection on the log file.
//! 2. [`ingest`] — batches newly appended records, detects process-id
//!    changes, and drives playback.
//! 3. [`parser`] — turns one record's text into an ordered chunk list plus
//!    directive flags.
//! 4. [`tracker`] — diffs chunk lists into cumulative alloc/free counters.
//! 5. [`model::coalesce`] — merges adjacent free chunks for the synthetic
//!    end-of-batch frame.
//! 6. [`publish`] — broadcast fan-out of `snapshot`/`syscalls` events to
//!    all connected subscribers.
//!
//! ## Frames
//!
//! Each batch of newly appended records is published in order with strictly
//! increasing integer sequence numbers per process lifetime, followed by
//! exactly one synthetic coalesced frame (wire snapshot id `seq + 0.5`).
//! Batches of 30 or more records are paced one frame per 50 ms; smaller
//! batches are emitted in a burst.

pub mod ingest;
pub mod model;
pub mod parser;
pub mod publish;
pub mod tracker;
