use thiserror::Error;

/// Ways a single lookup can fail.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The provider answered but flagged the request as failed.
    #[error("provider rejected lookup: {reason}")]
    Upstream { reason: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid provider endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl LookupError {
    pub fn upstream(reason: impl Into<String>) -> Self {
        LookupError::Upstream {
            reason: reason.into(),
        }
    }

    /// True when the provider itself reported the failure.
    pub fn is_upstream(&self) -> bool {
        matches!(self, LookupError::Upstream { .. })
    }
}
