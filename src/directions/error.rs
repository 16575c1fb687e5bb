use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("directions request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("directions service answered {status}")]
    Status { status: StatusCode },

    #[error("malformed directions response: {0}")]
    MalformedResponse(String),

    #[error("invalid directions url: {0}")]
    InvalidUrl(String),
}
