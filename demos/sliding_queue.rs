//! # Sliding Queue Example
//!
//! A bounded queue keeps at most `capacity` operations waiting per key.
//! While the first status sync for a node is still running, newer syncs
//! push older ones out of the backlog: only the latest state matters.
//!
//! Events are rendered through the built-in `LogWriter`.
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example sliding_queue --features "logging"
//! ```

use std::sync::Arc;
use std::time::Duration;

use keyqueue::{LogWriter, OperationFn, Queue, QueueConfig, Subscribe};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let subs: Vec<Arc<dyn Subscribe<&'static str>>> = vec![Arc::new(LogWriter::new())];
    let queue = Queue::builder(QueueConfig::bounded(2))
        .with_subscribers(subs)
        .build()?;

    for version in 1..=6 {
        queue.push(OperationFn::arc("node-7", move || async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            println!("node-7 synced to state v{version}");
        }));
    }

    // Expected: v1 (already running), then v5 and v6. v2..v4 are evicted.
    queue.close();
    queue.wait().await;

    // Give the subscriber worker a moment to flush.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
