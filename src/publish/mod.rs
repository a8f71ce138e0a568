//! Frame broadcast to visualization subscribers
//!
//! [`Publisher`] fans published events out to every currently connected
//! subscriber over a [`tokio::sync::broadcast`] channel. There is no
//! backlog: a subscriber that connects after an event was published never
//! receives it, and a subscriber that falls behind the channel capacity
//! observes a gap. Connect and disconnect are logged with an opaque
//! subscriber id; there is no authentication or per-subscriber filtering.

use crate::model::{Chunk, Counters, Frame};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Default broadcast capacity before slow subscribers start lagging.
pub const DEFAULT_CAPACITY: usize = 256;

/// `snapshot` wire event: one heap frame, real or synthetic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEvent {
    pub pid: Option<u32>,
    /// Integer sequence for real frames, `seq + 0.5` for the synthetic
    /// coalesced frame.
    pub snapshot_id: f64,
    pub chunks: Vec<Chunk>,
    pub coalesced: bool,
}

/// `syscalls` wire event: cumulative counters accompanying a real frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyscallsEvent {
    pub pid: Option<u32>,
    pub snapshot_id: u32,
    pub allocs: u64,
    pub frees: u64,
}

/// Everything the pipeline publishes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum Event {
    Snapshot(SnapshotEvent),
    Syscalls(SyscallsEvent),
}

impl Event {
    pub fn snapshot(frame: &Frame) -> Self {
        Event::Snapshot(SnapshotEvent {
            pid: frame.pid,
            snapshot_id: frame.snapshot_id(),
            chunks: frame.chunks.clone(),
            coalesced: frame.coalesced,
        })
    }

    pub fn syscalls(pid: Option<u32>, seq: u32, counters: Counters) -> Self {
        Event::Syscalls(SyscallsEvent {
            pid,
            snapshot_id: seq,
            allocs: counters.allocs,
            frees: counters.frees,
        })
    }
}

/// Broadcast fan-out of pipeline events.
///
/// Cheap to clone; all clones share the same channel and subscriber id
/// counter.
#[derive(Debug, Clone)]
pub struct Publisher {
    tx: broadcast::Sender<Event>,
    next_subscriber_id: Arc<AtomicU64>,
}

impl Publisher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Publisher {
            tx,
            next_subscriber_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Broadcast an event to every connected subscriber.
    ///
    /// Publishing with no subscribers is not an error; the event is simply
    /// dropped, matching the no-backlog contract.
    pub fn publish(&self, event: Event) {
        match self.tx.send(event) {
            Ok(receivers) => debug!(receivers, "event published"),
            Err(_) => debug!("event published with no subscribers"),
        }
    }

    /// Register a new subscriber, logging the connect.
    pub fn subscribe(&self) -> Subscription {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        info!(subscriber = id, "client connected");
        Subscription {
            id,
            rx: self.tx.subscribe(),
        }
    }

    /// Number of currently connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// One subscriber's end of the broadcast channel.
///
/// Dropping the subscription disconnects the subscriber and logs it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    rx: broadcast::Receiver<Event>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Receive the next event, or `None` once the publisher is gone.
    ///
    /// If this subscriber fell behind and events were overwritten, the gap
    /// is logged and reception continues at the oldest retained event.
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(subscriber = self.id, missed, "subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        info!(subscriber = self.id, "client disconnected");
    }
}
