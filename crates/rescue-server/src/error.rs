//! Error types for the server binary.
//!
//! [`ServerBinError`] wraps every failure mode during startup and
//! shutdown so `main` can propagate with `?`.

/// Top-level error for the server binary.
#[derive(Debug, thiserror::Error)]
pub enum ServerBinError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: rescue_core::ConfigError,
    },

    /// The language collaborator could not be built.
    #[error("collaborator error: {source}")]
    Collaborator {
        /// The underlying collaborator error.
        #[from]
        source: rescue_llm::CollaboratorError,
    },

    /// The dashboard server failed to start.
    #[error("startup error: {source}")]
    Startup {
        /// The underlying startup error.
        #[from]
        source: rescue_api::StartupError,
    },

    /// The dashboard server stopped with an error.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: rescue_api::ServerError,
    },

    /// The server task panicked or was cancelled.
    #[error("server task failed: {message}")]
    Join {
        /// Description of the join failure.
        message: String,
    },
}
