use thiserror::Error;

pub const VALIDATION_PREAMBLE: &str =
    "Request was not made due to invalid tokens. See validation errors below:";

/// Aggregate failure raised when a request contains at least one invalid token.
///
/// Holds one line per invalid token, `token <1-based index>: <errors>`, in token order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}\n{}", VALIDATION_PREAMBLE, .lines.join("\n"))]
pub struct RequestValidationError {
    pub lines: Vec<String>,
}

impl RequestValidationError {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] RequestValidationError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed: status={status}, body={body}")]
    Status { status: u16, body: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
