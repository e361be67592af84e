use thiserror::Error;

/// Errors from the configuration and stats export paths.
///
/// Queue operations themselves never fail; an expired timed pop is reported
/// as `None`, not as an error.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("invalid queue config: {0}")]
    Config(#[source] serde_json::Error),

    #[error("failed to serialize queue stats: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("stats export I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QueueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn open_missing() -> Result<()> {
            std::fs::File::open("/definitely/not/here.ndjson")?;
            Ok(())
        }

        let err = open_missing().unwrap_err();
        assert!(matches!(err, QueueError::Io(_)));
        assert!(err.to_string().starts_with("stats export I/O error"));
    }

    #[test]
    fn config_error_message_names_the_cause() {
        let cause = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = QueueError::Config(cause);
        assert!(err.to_string().starts_with("invalid queue config:"));
    }
}
