//! Moderation error types: inbound message gates and ticket transitions.

/// Moderation error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ModerationErrorKind {
    /// Sender is muted until the given instant (sentinel maximum = forever)
    #[display("Sender is muted")]
    Muted,
    /// Message body exceeds the length limit
    #[display("Message too long: {} characters, limit {}", length, limit)]
    MessageTooLong {
        /// Actual body length in characters
        length: usize,
        /// Maximum accepted length
        limit: usize,
    },
    /// Message body contains a banned word
    #[display("Message contains banned content")]
    BannedContent,
    /// No message with the given identifier
    #[display("Message not found")]
    MessageNotFound,
    /// Message already left the pending state
    #[display("Message is no longer pending")]
    MessageNotPending,
}

/// Moderation error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Moderation Error: {} at line {} in {}", kind, line, file)]
pub struct ModerationError {
    /// The kind of error that occurred
    pub kind: ModerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ModerationError {
    /// Create a new ModerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ModerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
