//! Advertisement persistence and the broadcast task supervisor.
//!
//! Advertisements live in a flat JSON file ordered by creation, outside the
//! relational ledger. [`AdStore`] owns that file and validates creation;
//! [`AdSupervisor`] owns one long-lived delivery task per advertisement and
//! the cooperative shutdown signal for each.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod store;
mod supervisor;

pub use store::AdStore;
pub use supervisor::AdSupervisor;
