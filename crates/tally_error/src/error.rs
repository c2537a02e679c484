//! Top-level error wrapper types.

use crate::{
    BroadcastError, ConfigError, DatabaseError, LedgerError, ModerationError, RosterError,
};

/// This is the foundation error enum. Each tally crate contributes the
/// variant for its own domain.
///
/// # Examples
///
/// ```
/// use tally_error::{TallyError, ConfigError};
///
/// let cfg_err = ConfigError::new("Missing field");
/// let err: TallyError = cfg_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum TallyErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Ledger store error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Referral / balance precondition error
    #[from(LedgerError)]
    Ledger(LedgerError),
    /// Moderation gate or ticket error
    #[from(ModerationError)]
    Moderation(ModerationError),
    /// Admin roster error
    #[from(RosterError)]
    Roster(RosterError),
    /// Broadcast scheduler error
    #[from(BroadcastError)]
    Broadcast(BroadcastError),
}

/// Tally error with kind discrimination.
///
/// # Examples
///
/// ```
/// use tally_error::{TallyResult, ConfigError};
///
/// fn might_fail() -> TallyResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Tally Error: {}", _0)]
pub struct TallyError(Box<TallyErrorKind>);

impl TallyError {
    /// Create a new error from a kind.
    pub fn new(kind: TallyErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TallyErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to TallyErrorKind
impl<T> From<T> for TallyError
where
    T: Into<TallyErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for tally operations.
///
/// # Examples
///
/// ```
/// use tally_error::{TallyResult, LedgerError, LedgerErrorKind};
///
/// fn lookup() -> TallyResult<i64> {
///     Err(LedgerError::new(LedgerErrorKind::NotRegistered))?
/// }
/// ```
pub type TallyResult<T> = std::result::Result<T, TallyError>;
