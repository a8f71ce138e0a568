//! Log change detection with write debounce
//!
//! The allocator hook appends one snapshot per malloc/free, so the log is
//! frequently mid-write. [`LogWatcher`] polls the file's `(mtime, len)`
//! signature and, once a change is seen, keeps re-checking until the
//! signature has been stable for a quiet period before reporting the
//! change. A missing or unreadable file is not an error; polling just
//! continues until it appears.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tokio::time::sleep;
use tracing::debug;

/// Polling and debounce intervals for [`LogWatcher`].
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// How often the file signature is checked
    pub poll_interval: Duration,
    /// How long the signature must stay unchanged before a change is
    /// reported (the writer is assumed to have finished)
    pub quiet_period: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            quiet_period: Duration::from_millis(250),
        }
    }
}

type FileSignature = (SystemTime, u64);

/// Polls one log file and reports debounced change notifications.
#[derive(Debug)]
pub struct LogWatcher {
    path: PathBuf,
    config: WatcherConfig,
    last_signature: Option<FileSignature>,
}

impl LogWatcher {
    pub fn new(path: impl Into<PathBuf>, config: WatcherConfig) -> Self {
        LogWatcher {
            path: path.into(),
            config,
            last_signature: None,
        }
    }

    async fn signature(&self) -> Option<FileSignature> {
        let meta = tokio::fs::metadata(&self.path).await.ok()?;
        let modified = meta.modified().ok()?;
        Some((modified, meta.len()))
    }

    /// Wait until the log has changed and the writer has gone quiet.
    ///
    /// The first call reports the file's initial content as a change, so a
    /// server started against an existing log ingests it immediately.
    pub async fn wait_for_change(&mut self) {
        loop {
            let current = self.signature().await;
            if current.is_some() && current != self.last_signature {
                // debounce: wait for the signature to settle
                let mut settled = current;
                loop {
                    sleep(self.config.quiet_period).await;
                    let next = self.signature().await;
                    if next == settled {
                        break;
                    }
                    settled = next;
                }
                if settled.is_some() && settled != self.last_signature {
                    self.last_signature = settled;
                    debug!(path = %self.path.display(), "log change detected");
                    return;
                }
            }
            sleep(self.config.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tokio::time::timeout;

    fn fast_config() -> WatcherConfig {
        WatcherConfig {
            poll_interval: Duration::from_millis(5),
            quiet_period: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_initial_content_reported_as_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heap_frag.log");
        fs::write(&path, "0x1 8 1\n").unwrap();

        let mut watcher = LogWatcher::new(&path, fast_config());
        timeout(Duration::from_secs(5), watcher.wait_for_change())
            .await
            .expect("change not reported");
    }

    #[tokio::test]
    async fn test_append_reported_after_quiet_period() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heap_frag.log");
        fs::write(&path, "0x1 8 1\n").unwrap();

        let mut watcher = LogWatcher::new(&path, fast_config());
        timeout(Duration::from_secs(5), watcher.wait_for_change())
            .await
            .unwrap();

        fs::write(&path, "0x1 8 1\n\n0x1 8 0\n").unwrap();
        timeout(Duration::from_secs(5), watcher.wait_for_change())
            .await
            .expect("append not reported");
    }

    #[tokio::test]
    async fn test_missing_file_keeps_polling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_yet.log");

        let mut watcher = LogWatcher::new(&path, fast_config());
        let pending = timeout(Duration::from_millis(50), watcher.wait_for_change()).await;
        assert!(pending.is_err(), "missing file must not report a change");

        fs::write(&path, "0x1 8 1\n").unwrap();
        timeout(Duration::from_secs(5), watcher.wait_for_change())
            .await
            .expect("created file not reported");
    }
}
