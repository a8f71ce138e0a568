// fragview: streaming server for live heap-fragmentation visualization

use fragview::ingest::watcher::{LogWatcher, WatcherConfig};
use fragview::ingest::Ingester;
use fragview::publish::Publisher;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_PATH: &str = "heap_frag.log";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fragview=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        let program_name = args.first().map(|s| s.as_str()).unwrap_or("fragview");
        eprintln!("Usage: {} [heap_frag.log]", program_name);
        eprintln!();
        eprintln!("Watches the allocator log and streams heap frames as JSON");
        eprintln!("lines on stdout. Default log path: {}", DEFAULT_LOG_PATH);
        return Ok(());
    }
    let log_path = args.get(1).map(|s| s.as_str()).unwrap_or(DEFAULT_LOG_PATH);

    if !Path::new(log_path).exists() {
        info!(path = log_path, "log does not exist yet, waiting for it to appear");
    }
    info!(path = log_path, "watching");

    let publisher = Publisher::default();

    // Built-in stdout subscriber: the transport seam. A network layer
    // would subscribe here instead and forward events to its clients.
    let mut subscription = publisher.subscribe();
    tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::warn!(error = %e, "failed to serialize event"),
            }
        }
    });

    let watcher = LogWatcher::new(log_path, WatcherConfig::default());
    let ingester = Ingester::new(log_path, publisher);
    ingester.run(watcher).await;

    Ok(())
}
