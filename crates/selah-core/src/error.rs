//! Error types for the Selah voice pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type VoiceResult<T> = Result<T, VoiceError>;

/// Errors that can occur while orchestrating vendor calls.
///
/// Translation and generation failures are absorbed by their components; the
/// remaining kinds travel up to the request boundary.
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Submission error: {0}")]
    Submission(String),

    #[error("Transcription job failed: {0}")]
    JobFailed(String),

    #[error("Timed out after {waited_secs}s waiting for transcription to finish")]
    JobTimeout { waited_secs: u64 },

    #[error("Vendor unavailable: {0}")]
    VendorUnavailable(String),

    #[error("Unrecognized vendor response: {0}")]
    UnrecognizedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for VoiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            VoiceError::UnrecognizedResponse(err.to_string())
        } else {
            VoiceError::VendorUnavailable(err.to_string())
        }
    }
}

impl From<config::ConfigError> for VoiceError {
    fn from(err: config::ConfigError) -> Self {
        VoiceError::Config(err.to_string())
    }
}

impl VoiceError {
    /// True for the kinds a caller may see before any vendor call was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, VoiceError::Validation(_) | VoiceError::Config(_))
    }
}
