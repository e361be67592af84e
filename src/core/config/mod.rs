use serde::{Deserialize, Serialize};
use crate::core::error::{QueueError, Result};

/// Construction options for a `BlockingQueue`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Name carried on every tracing event emitted by the queue
    pub label: String,
    /// Pre-allocation hint for the backing buffer. Not a limit.
    pub initial_capacity: usize,
}

impl QueueConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), ..Self::default() }
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(QueueError::Config)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { label: "queue".to_string(), initial_capacity: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = QueueConfig::from_json(r#"{"label":"jobs"}"#).unwrap();
        assert_eq!(config.label, "jobs");
        assert_eq!(config.initial_capacity, 0);

        let empty = QueueConfig::from_json("{}").unwrap();
        assert_eq!(empty, QueueConfig::default());
    }

    #[test]
    fn builder_sets_capacity_hint() {
        let config = QueueConfig::new("work").with_initial_capacity(64);
        assert_eq!(config.label, "work");
        assert_eq!(config.initial_capacity, 64);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = QueueConfig::from_json(r#"{"initial_capacity":"lots"}"#).unwrap_err();
        assert!(matches!(err, QueueError::Config(_)));
    }
}
