use thiserror::Error;

/// Failures surfaced by the provider access layer and the offer mapper.
///
/// Each variant carries the raw diagnostic detail (status, body, parse
/// context) while [`ApiError::user_message`] yields the short text meant
/// for direct display through the notification side channel.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("token request failed with status {status}: {body}")]
    TokenAcquisitionFailed { status: u16, body: String },

    #[error("rate limited by provider after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("provider unavailable ({status}): {body}")]
    ProviderUnavailable { status: u16, body: String },

    #[error("provider rejected request ({status}): {body}")]
    RequestRejected { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("network error: {0}")]
    Network(String),
}

impl ApiError {
    /// Classifies an unexpected (non-2xx, non-429) HTTP status into an
    /// error variant, keeping the raw body for diagnostics.
    pub fn from_status(status: u16, body: String) -> Self {
        if status >= 500 {
            ApiError::ProviderUnavailable { status, body }
        } else {
            ApiError::RequestRejected { status, body }
        }
    }

    /// Short human-readable message suitable for direct display.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::RateLimited { .. } => {
                "Flight search is busy right now. Please wait a moment and try again."
            }
            ApiError::ProviderUnavailable { .. } => {
                "Flight data is temporarily unavailable. Try again shortly."
            }
            ApiError::TokenAcquisitionFailed { .. } => {
                "Something went wrong on our end. Please try again later."
            }
            ApiError::RequestRejected { status: 401, .. } => {
                "Something went wrong on our end. Please try again later."
            }
            ApiError::RequestRejected { .. }
            | ApiError::MalformedResponse(_)
            | ApiError::Network(_) => "Couldn't load flight results. Please try again.",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}
