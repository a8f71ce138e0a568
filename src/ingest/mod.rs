//! Log ingestion and batch playback
//!
//! This module drives the whole pipeline:
//! - [`watcher`]: debounced change detection on the log file
//! - [`schedule`]: per-batch pacing decision and frame delays
//! - [`errors`]: ingestion error taxonomy
//! - [`Ingester`]: reads the log on each change, detects process-id
//!   changes, computes the unseen-record batch, and plays it back through
//!   parser, tracker, coalescer and publisher
//!
//! # Execution model
//!
//! One current-thread task owns all mutable pipeline state (allocation
//! state, counters, sequence number, delivered-record count). The ingest
//! loop waits for a change notification, then plays the resulting batch
//! (including its pacing sleeps) to completion before looking at the log
//! again.
//! Batches therefore never overlap and a reset can never race against a
//! pending frame of an earlier batch. A change that lands mid-playback is
//! picked up on the next watcher poll.

pub mod errors;
pub mod schedule;
pub mod watcher;

use crate::model::coalesce::merge_adjacent_free;
use crate::model::Frame;
use crate::parser::record::{extract_pid, parse_record, split_records};
use crate::publish::{Event, Publisher};
use crate::tracker::AllocationTracker;
use errors::IngestError;
use schedule::{Scheduler, SchedulerConfig};
use std::path::PathBuf;
use tokio::time::{sleep_until, Instant};
use tracing::{info, warn};
use watcher::LogWatcher;

/// Owns the pipeline state for one log file and drives playback.
#[derive(Debug)]
pub struct Ingester {
    path: PathBuf,
    publisher: Publisher,
    scheduler: Scheduler,
    tracker: AllocationTracker,
    /// Sequence number of the last published real frame (0 before the first)
    seq: u32,
    /// How many records of the log have already been delivered
    delivered: usize,
    /// Last process id seen in the log, if any
    last_pid: Option<u32>,
}

impl Ingester {
    pub fn new(path: impl Into<PathBuf>, publisher: Publisher) -> Self {
        Self::with_config(path, publisher, SchedulerConfig::default())
    }

    pub fn with_config(
        path: impl Into<PathBuf>,
        publisher: Publisher,
        config: SchedulerConfig,
    ) -> Self {
        Ingester {
            path: path.into(),
            publisher,
            scheduler: Scheduler::new(config),
            tracker: AllocationTracker::new(),
            seq: 0,
            delivered: 0,
            last_pid: None,
        }
    }

    /// React to change notifications forever.
    ///
    /// A failed reaction (log unreadable) is logged and skipped; the next
    /// notification retries from scratch.
    pub async fn run(mut self, mut watcher: LogWatcher) {
        loop {
            watcher.wait_for_change().await;
            if let Err(e) = self.ingest_once().await {
                warn!(error = %e, "ingestion skipped, retrying on next change");
            }
        }
    }

    /// Process one change notification: read, diff against delivered count,
    /// play back the new batch.
    pub async fn ingest_once(&mut self) -> Result<(), IngestError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|source| {
            IngestError::ResourceUnavailable {
                path: self.path.clone(),
                source,
            }
        })?;

        if let Some(pid) = extract_pid(&content) {
            if self.last_pid != Some(pid) {
                match self.last_pid {
                    Some(old) => info!(old, new = pid, "process id changed, resetting state"),
                    None => info!(pid, "tracking process"),
                }
                self.reset();
                self.last_pid = Some(pid);
            }
        }

        let records = split_records(&content);
        if records.len() < self.delivered {
            // truncation or rewrite: resynchronize instead of failing
            warn!(
                total = records.len(),
                delivered = self.delivered,
                "record count decreased, treating as new process run"
            );
            self.reset();
        }

        let batch: Vec<String> = records.iter().skip(self.delivered).cloned().collect();
        self.delivered = records.len();
        if !batch.is_empty() {
            self.play_batch(&batch).await;
        }
        Ok(())
    }

    /// Publish every record of a batch in order, paced per the scheduler,
    /// ending with the synthetic coalesced frame.
    async fn play_batch(&mut self, batch: &[String]) {
        let pacing = self.scheduler.pacing(batch.len());
        let start = Instant::now();
        let last = batch.len() - 1;

        for (i, raw) in batch.iter().enumerate() {
            sleep_until(start + self.scheduler.frame_delay(pacing, i)).await;

            let parsed = parse_record(raw);
            for warning in &parsed.warnings {
                warn!(%warning, "parse warning");
            }

            self.seq += 1;
            let counters = self.tracker.observe(&parsed.chunks);
            let frame = Frame {
                pid: self.last_pid,
                seq: self.seq,
                chunks: parsed.chunks,
                coalesced: false,
            };
            self.publisher.publish(Event::snapshot(&frame));
            self.publisher.publish(Event::syscalls(self.last_pid, self.seq, counters));

            if i == last {
                // synthetic view of the batch's final heap state; never fed
                // back into the tracker
                let synthetic = Frame {
                    pid: self.last_pid,
                    seq: self.seq,
                    chunks: merge_adjacent_free(&frame.chunks),
                    coalesced: true,
                };
                self.publisher.publish(Event::snapshot(&synthetic));
            }
        }
    }

    /// Full state reset, used on process-id change and log truncation.
    fn reset(&mut self) {
        self.tracker.reset();
        self.seq = 0;
        self.delivered = 0;
    }
}
