use thiserror::Error;

/// Uniform failure surfaced by every catalog adapter.
///
/// Raw transport errors never leave an adapter; they are folded into one of
/// these variants. Adapters never retry.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{catalog} API key not configured")]
    MissingCredential { catalog: &'static str },

    #[error("{catalog} is disabled in the configuration")]
    Disabled { catalog: &'static str },

    #[error("{catalog} request failed: {message}")]
    Transport { catalog: &'static str, message: String },

    #[error("{catalog} returned HTTP {status}: {body}")]
    Http { catalog: &'static str, status: u16, body: String },

    #[error("{catalog} sent a malformed response: {message}")]
    Decode { catalog: &'static str, message: String },

    #[error("{catalog} has no item with id {id}")]
    NotFound { catalog: &'static str, id: String },

    #[error("Invalid request: {0}")]
    Validation(String),
}

impl SourceError {
    /// Short machine-readable category, used in logs and JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::MissingCredential { .. } => "missing_credential",
            SourceError::Disabled { .. } => "disabled",
            SourceError::Transport { .. } | SourceError::Http { .. } | SourceError::Decode { .. } => "transport",
            SourceError::NotFound { .. } => "not_found",
            SourceError::Validation(_) => "validation",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound { .. })
    }
}
