use std::fmt::{Display, Formatter};
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};
use crate::core::error::{QueueError, Result};

/// Running operation counters for one queue.
///
/// Counters are bumped while the queue lock is held, so a snapshot taken
/// under the same lock is consistent with the queue length.
#[derive(Debug, Default)]
pub struct QueueStats {
    pushed: AtomicU64,
    popped: AtomicU64,
    timed_out: AtomicU64,
    cleared: AtomicU64,
}

impl QueueStats {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_push(&self) {
        self.pushed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_pop(&self) {
        self.popped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_timeout(&self) {
        self.timed_out.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_clear(&self, discarded: usize) {
        self.cleared.fetch_add(discarded as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, label: &str, len: usize) -> StatsSnapshot {
        StatsSnapshot {
            label: label.to_string(),
            pushed: self.pushed.load(Ordering::Relaxed),
            popped: self.popped.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
            cleared: self.cleared.load(Ordering::Relaxed),
            len,
        }
    }
}

/// Point-in-time view of a queue's counters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub label: String,
    pub pushed: u64,
    pub popped: u64,
    pub timed_out: u64, // timed pops that returned None
    pub cleared: u64,   // elements discarded by clear()
    pub len: usize,
}

impl Display for StatsSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: pushed={} popped={} timed_out={} cleared={} len={}",
            self.label, self.pushed, self.popped, self.timed_out, self.cleared, self.len,
        )
    }
}

/// Append snapshots to `path` as NDJSON, one object per line.
pub fn append_stats(snapshots: &[StatsSnapshot], path: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;

    for snapshot in snapshots {
        let json = serde_json::to_string(snapshot).map_err(QueueError::Serialize)?;
        writeln!(file, "{}", json)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_operations() {
        let stats = QueueStats::new();
        stats.record_push();
        stats.record_push();
        stats.record_pop();
        stats.record_timeout();
        stats.record_clear(1);

        let snapshot = stats.snapshot("unit", 0);
        assert_eq!(snapshot.pushed, 2);
        assert_eq!(snapshot.popped, 1);
        assert_eq!(snapshot.timed_out, 1);
        assert_eq!(snapshot.cleared, 1);
        assert_eq!(snapshot.to_string(), "unit: pushed=2 popped=1 timed_out=1 cleared=1 len=0");
    }

    #[test]
    fn append_writes_one_line_per_snapshot() {
        let path = std::env::temp_dir().join(format!("bq-stats-{}.ndjson", std::process::id()));
        let path = path.to_str().unwrap().to_string();
        let _ = std::fs::remove_file(&path);

        let first = QueueStats::new().snapshot("a", 0);
        let second = QueueStats::new().snapshot("b", 3);
        append_stats(&[first.clone()], &path).unwrap();
        append_stats(&[second.clone()], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<StatsSnapshot> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(parsed, vec![first, second]);

        std::fs::remove_file(&path).unwrap();
    }
}
