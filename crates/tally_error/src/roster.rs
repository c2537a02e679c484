//! Admin roster error types.

/// Roster error conditions.
///
/// `Forbidden` deliberately carries no detail: denial notices must not leak
/// why access was refused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RosterErrorKind {
    /// Caller lacks the privilege the operation requires
    #[display("Access denied")]
    Forbidden,
    /// Target identifier already holds admin rights
    #[display("Already an admin")]
    AlreadyAdmin,
    /// Target is a main admin and cannot be removed
    #[display("Cannot remove main admin")]
    CannotRemoveMain,
    /// No roster row for the given identifier
    #[display("Admin not found")]
    AdminNotFound,
}

/// Roster error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Roster Error: {} at line {} in {}", kind, line, file)]
pub struct RosterError {
    /// The kind of error that occurred
    pub kind: RosterErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RosterError {
    /// Create a new RosterError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RosterErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
