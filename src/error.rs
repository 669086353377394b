//! Error types for kafkawire.

use std::fmt;

use thiserror::Error;

use crate::error_codes;

/// Result type alias for kafkawire operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for kafkawire.
///
/// Transport and protocol failures are returned as the call's primary
/// error; the connection, if any, is closed, and the caller decides whether
/// to retry. Broker-reported error codes are carried inside the typed
/// responses and are not promoted to call failures, except by the group
/// client's offset helpers, which return [`Error::Api`].
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Wire format errors (short reads, bad lengths, invalid UTF-8)
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Batch crc does not match batch bytes
    #[error("batch crc does not match bytes")]
    CorruptedBatch,

    /// Record batch magic byte is not 2
    #[error("unsupported record batch magic: {0}")]
    UnsupportedMagic(i8),

    /// Batch build was attempted with no records
    #[error("empty batch")]
    EmptyBatch,

    /// Topic metadata has no entry for the partition
    #[error("partition does not exist")]
    PartitionDoesNotExist,

    /// Topic metadata has an entry for the partition but no live leader
    #[error("no leader for partition")]
    NoLeaderForPartition,

    /// A broker-reported error code, promoted to a call failure
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Failure while resolving or connecting to a broker
    #[error("error connecting to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: Box<Error>,
    },

    /// Failure during a request-response round trip
    #[error("error making api call to {target}: {source}")]
    Call {
        target: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap an error with the broker address it happened against.
    pub(crate) fn connect(target: impl Into<String>, source: Error) -> Error {
        Error::Connect {
            target: target.into(),
            source: Box::new(source),
        }
    }

    pub(crate) fn call(target: impl Into<String>, source: Error) -> Error {
        Error::Call {
            target: target.into(),
            source: Box::new(source),
        }
    }
}

/// A Kafka error code with an optional broker-supplied message.
///
/// Formats with the code's canonical name, so `ApiError::new(21)` displays
/// as `INVALID_REQUIRED_ACKS (21)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: i16,
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(code: i16) -> ApiError {
        ApiError {
            code,
            message: None,
        }
    }

    pub fn with_message(code: i16, message: impl Into<String>) -> ApiError {
        let message = message.into();
        ApiError {
            code,
            message: if message.is_empty() {
                None
            } else {
                Some(message)
            },
        }
    }

    /// True when the code is `NONE`.
    pub fn is_none(&self) -> bool {
        self.code == error_codes::NONE
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", error_codes::name(self.code), self.code)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let e = ApiError::new(21);
        assert_eq!(e.to_string(), "INVALID_REQUIRED_ACKS (21)");
        let e = ApiError::with_message(36, "topic 'foo' already exists");
        assert_eq!(
            e.to_string(),
            "TOPIC_ALREADY_EXISTS (36): topic 'foo' already exists"
        );
    }

    #[test]
    fn test_error_chain() {
        let inner = Error::Protocol("error reading i32".to_string());
        let outer = Error::call("broker-1:9092", inner);
        let s = outer.to_string();
        assert!(s.contains("broker-1:9092"));
        assert!(s.contains("error reading i32"));
    }
}
