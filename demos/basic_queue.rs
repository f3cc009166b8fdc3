//! # Basic Queue Example
//!
//! Pushes a few operations for two containers:
//! - operations on the same container run one after another, in push order
//! - the two containers are processed in parallel
//!
//! ## Run
//! ```bash
//! cargo run --example basic_queue
//! ```

use std::time::Duration;

use keyqueue::{OperationFn, Queue};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let queue: Queue<String> = Queue::new();
    let started = tokio::time::Instant::now();

    for container in ["web", "db"] {
        for (step, action) in ["create", "start", "health-check", "stop"].into_iter().enumerate() {
            queue.push(OperationFn::arc(container.to_string(), move || async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                println!(
                    "{:>8.3?} [{container}] #{step} {action}",
                    started.elapsed()
                );
            }));
        }
    }

    let snap = queue.snapshot().await?;
    println!(
        "busy keys: {}, waiting operations: {}",
        snap.in_flight(),
        snap.pending_total()
    );

    queue.close();
    queue.wait().await;

    println!("done in {:?} (4 steps x 200ms per container)", started.elapsed());
    Ok(())
}
