//! PostgreSQL integration for tally.
//!
//! This crate provides the Diesel schema, row models, and the
//! database-backed [`tally_interface::LedgerStore`] implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use tally_database::{establish_pool, PgLedger};
//! use tally_interface::LedgerStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = establish_pool()?;
//! let store = PgLedger::new(pool);
//! let user = store.get_user(42).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod connection;
mod models;
mod repository;

// Public module for external access
pub mod schema;

pub use connection::{PgPool, establish_pool};
pub use models::{
    AdminRow, AdminSettingRow, BannedWordRow, MessageRow, MuteRow, NewAdminRow, NewBannedWordRow,
    NewMessageRow, NewUserRow, UserRow,
};
pub use repository::PgLedger;

/// Result type for database operations.
pub type DatabaseResult<T> = std::result::Result<T, tally_error::DatabaseError>;
