use std::time::Duration;
use thiserror::Error;

/// Observer system errors with structured error types
#[derive(Debug, Error, Clone)]
pub enum ObserverError {
    #[error("Observer {observer} rejected the save: {message}")]
    Rejected { observer: String, message: String },

    #[error("Observer {observer} timed out after {elapsed:?}")]
    TimeoutError { observer: String, elapsed: Duration },

    #[error("System error: {0}")]
    SystemError(String),
}

impl ObserverError {
    pub fn rejected(observer: &str, message: impl Into<String>) -> Self {
        ObserverError::Rejected {
            observer: observer.to_string(),
            message: message.into(),
        }
    }
}
