//! Batch playback pacing
//!
//! Large batches (a whole program run discovered at once, or a server
//! started against an existing log) are played back as an animation, one
//! frame every [`SchedulerConfig::frame_interval`]. Small batches are the
//! live case where latency matters, so they are emitted in a single burst.
//! The decision is made per batch and not remembered across batches.

use std::time::Duration;

/// Pacing parameters for [`Scheduler`].
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Delay between consecutive frames of a paced batch
    pub frame_interval: Duration,
    /// Batches with at least this many records are paced
    pub pacing_threshold: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(50),
            pacing_threshold: 30,
        }
    }
}

/// Per-batch emission mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Every frame emitted with zero delay
    Burst,
    /// Frame at batch position `i` emitted `i × interval` after batch arrival
    Paced(Duration),
}

/// Decides and computes frame delays for one batch at a time.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Scheduler { config }
    }

    /// Emission mode for a batch of the given size.
    pub fn pacing(&self, batch_len: usize) -> Pacing {
        if batch_len >= self.config.pacing_threshold {
            Pacing::Paced(self.config.frame_interval)
        } else {
            Pacing::Burst
        }
    }

    /// Delay from batch arrival to the frame at `index` (0-based).
    ///
    /// The synthetic coalesced frame shares the last real frame's delay and
    /// is published immediately after it, so it needs no delay of its own.
    pub fn frame_delay(&self, pacing: Pacing, index: usize) -> Duration {
        match pacing {
            Pacing::Burst => Duration::ZERO,
            Pacing::Paced(interval) => interval * index as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_batch_bursts() {
        let scheduler = Scheduler::default();
        assert_eq!(scheduler.pacing(1), Pacing::Burst);
        assert_eq!(scheduler.pacing(29), Pacing::Burst);
    }

    #[test]
    fn test_large_batch_paced() {
        let scheduler = Scheduler::default();
        let pacing = scheduler.pacing(30);
        assert_eq!(pacing, Pacing::Paced(Duration::from_millis(50)));
        assert_eq!(scheduler.frame_delay(pacing, 0), Duration::ZERO);
        assert_eq!(scheduler.frame_delay(pacing, 4), Duration::from_millis(200));
    }

    #[test]
    fn test_burst_delay_is_zero_everywhere() {
        let scheduler = Scheduler::default();
        assert_eq!(scheduler.frame_delay(Pacing::Burst, 100), Duration::ZERO);
    }

    #[test]
    fn test_decision_recomputed_per_batch() {
        let scheduler = Scheduler::default();
        assert!(matches!(scheduler.pacing(40), Pacing::Paced(_)));
        // a later small batch is not stuck in paced mode
        assert_eq!(scheduler.pacing(2), Pacing::Burst);
    }
}
