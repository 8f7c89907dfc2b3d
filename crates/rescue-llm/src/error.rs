//! Error types for the collaborator client.
//!
//! Every variant means the same thing to callers: the collaborator could
//! not produce a usable answer. The variants exist so logs say why.

/// Errors from a collaborator call.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    /// The backend returned an error status or was unreachable.
    #[error("collaborator backend error: {0}")]
    Backend(String),

    /// The call did not finish within the configured deadline.
    #[error("collaborator call timed out after {0} ms")]
    Timeout(u128),

    /// The reply did not match the expected schema.
    #[error("collaborator response rejected: {0}")]
    Parse(String),

    /// A prompt template failed to load or render.
    #[error("prompt template error: {0}")]
    Template(String),

    /// The collaborator settings are unusable.
    #[error("collaborator config error: {0}")]
    Config(String),
}
