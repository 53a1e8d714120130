//! Error types for sfx-export

use reqwest;
use serde_json;
use std::io;
use thiserror::Error as ThisError;

/// Result type alias for sfx-export operations
pub type Result<T> = ::std::result::Result<T, Error>;

/// Error types for sfx-export
#[derive(Debug, ThisError)]
pub enum Error {
    /// No API token was configured. Raised by connect.
    #[error("field token required to be set for SignalFx output")]
    MissingCredential,
    /// A field value has no numeric datapoint representation. Raised per
    /// field during coercion and recovered by the exporter.
    #[error("undeterminable type")]
    UnrepresentableType,
    /// The batch could not be delivered.
    #[error("export failed: {0}")]
    Export(#[from] ExportFailure),
    /// Configuration file content is unusable.
    #[error("configuration error: {0}")]
    Config(String),
    /// A line of input is not valid line protocol.
    #[error("could not parse line {line:?}: {reason}")]
    Parse {
        /// The offending input line
        line: String,
        /// What was wrong with it
        reason: &'static str,
    },
    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Reasons a whole batch failed to reach the sink.
///
/// There is no per-datapoint acknowledgment. Any one of these fails the
/// entire write.
#[derive(Debug, ThisError)]
pub enum ExportFailure {
    /// The session timeout elapsed before the endpoint answered.
    #[error("timed out waiting for the ingestion endpoint")]
    Timeout,
    /// Connection, TLS or protocol failure below HTTP status level.
    #[error("transport failure: {0}")]
    Transport(reqwest::Error),
    /// The endpoint answered with a non-200 status.
    #[error("endpoint returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as much as could be read
        body: String,
    },
    /// The endpoint answered 200 but not with the expected `"OK"` body.
    #[error("unexpected response body: {0}")]
    UnexpectedResponse(String),
    /// The datapoints could not be serialized.
    #[error("could not encode datapoints: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ExportFailure {
    fn from(err: reqwest::Error) -> ExportFailure {
        if err.is_timeout() {
            ExportFailure::Timeout
        } else {
            ExportFailure::Transport(err)
        }
    }
}
