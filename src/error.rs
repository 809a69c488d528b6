use thiserror::Error;

/// Failures of the vision request. Only these are turned into user-facing
/// messages; everything else aborts the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VisionError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Any other failure while sending the request or reading the reply.
    #[error("{0}")]
    RequestFailure(String),
}

impl From<reqwest::Error> for VisionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            VisionError::Timeout
        } else {
            VisionError::RequestFailure(e.to_string())
        }
    }
}

/// A response line that does not have the `name: value` shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line:?} is not a `name: value` pair ({colons} colons)")]
    Malformed { line: String, colons: usize },
}

/// Invalid values in the environment-provided configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
}
