//! Ledger error types: account lookup and balance preconditions.

/// Ledger error conditions.
///
/// Every variant is user-recoverable: the transport renders it as a plain
/// failure notice and the underlying state is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum LedgerErrorKind {
    /// Operation on an identifier with no account record
    #[display("Account not registered")]
    NotRegistered,
    /// Balance below the withdrawal minimum
    #[display("Insufficient balance: {} points, {} required", points, minimum)]
    InsufficientBalance {
        /// Current balance
        points: i64,
        /// Withdrawal minimum
        minimum: i64,
    },
    /// No payout wallet linked to the account
    #[display("No wallet address set")]
    NoWallet,
    /// Supplied wallet address is empty after trimming
    #[display("Invalid wallet address")]
    InvalidWallet,
}

/// Ledger error with source location tracking.
///
/// # Examples
///
/// ```
/// use tally_error::{LedgerError, LedgerErrorKind};
///
/// let err = LedgerError::new(LedgerErrorKind::NoWallet);
/// assert!(format!("{}", err).contains("wallet"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Ledger Error: {} at line {} in {}", kind, line, file)]
pub struct LedgerError {
    /// The kind of error that occurred
    pub kind: LedgerErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl LedgerError {
    /// Create a new LedgerError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LedgerErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
