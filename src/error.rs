use thiserror::Error;

/// Everything a workflow operation can fail with. Nothing here is retried
/// automatically — the operator re-issues the command.
#[derive(Error, Debug)]
pub enum DemoError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered but reported failure (`success: false` or non-2xx).
    /// `error_type` is a free-text discriminator used only for display.
    #[error("{message}")]
    Backend {
        message: String,
        error_type: Option<String>,
    },

    #[error("invalid response from backend: {0}")]
    Malformed(String),

    /// Client-side precondition failed; no request was issued.
    #[error("{0}")]
    Validation(String),

    /// Live-data gate refused the call — last market poll was not live
    /// or the backend did not echo a live-data tag.
    #[error("market data is not live — waiting for a fresh quote")]
    StaleMarketData,
}

impl DemoError {
    pub fn backend(message: impl Into<String>, error_type: Option<String>) -> Self {
        Self::Backend { message: message.into(), error_type }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type DemoResult<T> = Result<T, DemoError>;
