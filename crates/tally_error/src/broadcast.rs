//! Broadcast scheduler error types.

/// Broadcast error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum BroadcastErrorKind {
    /// An advertisement with this name already exists
    #[display("Advertisement '{}' already exists", _0)]
    DuplicateName(String),
    /// Resend interval below the minimum
    #[display("Interval {} s below minimum {} s", interval_secs, minimum_secs)]
    IntervalTooShort {
        /// Requested interval
        interval_secs: u64,
        /// Smallest accepted interval
        minimum_secs: u64,
    },
    /// No advertisement with the given name
    #[display("Advertisement '{}' not found", _0)]
    AdNotFound(String),
    /// Reading or writing the advertisement file failed
    #[display("Advertisement persistence error: {}", _0)]
    Persistence(String),
}

/// Broadcast error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Broadcast Error: {} at line {} in {}", kind, line, file)]
pub struct BroadcastError {
    /// The kind of error that occurred
    pub kind: BroadcastErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl BroadcastError {
    /// Create a new BroadcastError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: BroadcastErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
