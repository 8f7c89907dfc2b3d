//! Error types for snapshot commands.

/// Errors a command handler can surface.
///
/// Never fatal: the periodic mutator and connection registry keep running
/// regardless of what a single command returns. Collaborator failures are
/// not represented here; the commands that call the collaborator absorb
/// them (a failed negotiation round, the fallback chat reply).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The referenced inventory item, supplier, or route does not exist,
    /// or no supplier carries the requested item.
    #[error("{0}")]
    NotFound(String),
}
