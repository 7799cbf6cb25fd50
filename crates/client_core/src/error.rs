use shared::error::FieldErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The server refused the record and said why, per field.
    #[error("submission rejected (status {status})")]
    Rejected { status: u16, errors: FieldErrors },
    #[error("submit failed with status {status}")]
    Status { status: u16 },
    #[error("malformed submit response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("submit request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SubmitError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmitError::Rejected { errors, .. } => Some(errors),
            _ => None,
        }
    }
}
