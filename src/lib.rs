pub mod core;

pub use crate::core::{
    config::QueueConfig,
    error::{QueueError, Result},
    queue::{BlockingQueue, SafeQueue},
    stats::{append_stats, StatsSnapshot},
};
