/// Crate-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main error type for gateway operations
///
/// Only transport and protocol problems are errors. A gateway declining a
/// transaction is reported through an unsuccessful `PaymentResponse`.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Channel code matched none of the known adapters
    #[error("Unsupported payment channel: {0}")]
    UnsupportedChannel(String),

    /// Network or client-level failure while talking to a gateway
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Gateway answered with a non-success HTTP status
    #[error("Gateway returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Gateway body was not the JSON object we expect
    #[error("Malformed gateway response: {message}")]
    MalformedResponse { message: String, raw_body: String },

    /// Signature or cryptogram did not verify
    #[error("Signature mismatch: {0}")]
    SignatureMismatch(String),

    /// Invalid merchant configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request failed local validation before being sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// OpenSSL failure while handling RSA material
    #[error("Crypto error: {0}")]
    Crypto(#[from] openssl::error::ErrorStack),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn signature_mismatch(msg: impl Into<String>) -> Self {
        AppError::SignatureMismatch(msg.into())
    }

    pub fn malformed(message: impl Into<String>, raw_body: impl Into<String>) -> Self {
        AppError::MalformedResponse {
            message: message.into(),
            raw_body: raw_body.into(),
        }
    }

    /// Raw gateway body carried by the error, if any
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            AppError::MalformedResponse { raw_body, .. } => Some(raw_body),
            AppError::UnexpectedStatus { body, .. } => Some(body),
            _ => None,
        }
    }

    /// True for failures of the network exchange itself
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::Transport(_) | AppError::UnexpectedStatus { .. }
        )
    }
}
