//! Error types for license operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LicenseError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The endpoint answered, but the body is not a license response.
    #[error("malformed license response: {0}")]
    MalformedResponse(String),

    #[error("option store error: {0}")]
    Store(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type LicenseResult<T> = Result<T, LicenseError>;
