//! Error types for the tally referral ledger.
//!
//! This crate provides the foundation error types used throughout the tally
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! User-recoverable conditions from the ledger (unknown account, failed
//! precondition, denied access, stale reference) are ordinary kind variants:
//! the transport surfaces them verbatim and never retries them. Transient
//! delivery failures never appear here at all; callers swallow and log them
//! at the call site.
//!
//! # Examples
//!
//! ```
//! use tally_error::{TallyResult, LedgerError, LedgerErrorKind};
//!
//! fn lookup() -> TallyResult<String> {
//!     Err(LedgerError::new(LedgerErrorKind::NotRegistered))?
//! }
//!
//! match lookup() {
//!     Ok(code) => println!("Got: {}", code),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod broadcast;
mod config;
mod database;
mod error;
mod ledger;
mod moderation;
mod roster;

pub use broadcast::{BroadcastError, BroadcastErrorKind};
pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{TallyError, TallyErrorKind, TallyResult};
pub use ledger::{LedgerError, LedgerErrorKind};
pub use moderation::{ModerationError, ModerationErrorKind};
pub use roster::{RosterError, RosterErrorKind};
