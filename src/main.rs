use BlockingQueueMini::{append_stats, BlockingQueue, QueueConfig, SafeQueue};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ITEMS_PER_PRODUCER: usize = 100;
const IDLE_TIMEOUT: Duration = Duration::from_millis(200);

fn main() -> BlockingQueueMini::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // usage: BlockingQueueMini [producers] [consumers] [stats.ndjson]
    let mut args = std::env::args().skip(1);
    let producers: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(4);
    let consumers: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(2);
    let output = args.next().unwrap_or_else(|| "output.ndjson".to_string());

    let queue: SafeQueue<String> = Arc::new(BlockingQueue::with_config(
        QueueConfig::new("demo").with_initial_capacity(producers * ITEMS_PER_PRODUCER),
    ));

    let mut producer_handles = Vec::new();
    for p in 0..producers {
        let queue = queue.clone();
        producer_handles.push(thread::spawn(move || {
            for i in 1..=ITEMS_PER_PRODUCER {
                queue.push(format!("P{}-Item {}", p, i));
            }
        }));
    }

    // Consumers drain until the queue has been idle for IDLE_TIMEOUT
    let mut consumer_handles = Vec::new();
    for c in 0..consumers {
        let queue = queue.clone();
        consumer_handles.push(thread::spawn(move || {
            let mut received = 0usize;
            while queue.pop_timeout(IDLE_TIMEOUT).is_some() {
                received += 1;
            }
            info!(consumer = c, received, "consumer idle, stopping");
            received
        }));
    }

    for handle in producer_handles {
        if handle.join().is_err() {
            error!("producer thread panicked");
        }
    }
    let received: usize = consumer_handles
        .into_iter()
        .filter_map(|handle| handle.join().ok())
        .sum();

    let snapshot = queue.stats();
    info!(received, %snapshot, "run complete");
    append_stats(&[snapshot], &output)?;
    Ok(())
}
