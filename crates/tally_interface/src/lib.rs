//! Trait definitions for the tally referral ledger.
//!
//! This crate provides the seams between the engines and their
//! collaborators:
//!
//! - [`LedgerStore`]: the durable relational store behind every engine,
//!   implemented by `tally_database` (PostgreSQL) and by the bundled
//!   [`MemoryLedger`] backend for tests and Postgres-free embedding.
//! - [`Notifier`]: best-effort user notification; failures are logged and
//!   swallowed by callers, never propagated.
//! - [`AdSender`]: best-effort advertisement delivery, same discipline.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;
mod notify;
mod records;
mod store;

pub use memory::MemoryLedger;
pub use notify::{AdSender, DeliveryFailure, Notifier};
pub use records::{AdminRecord, MessageRecord, MuteRecord, NewUserRecord, UserRecord};
pub use store::{LedgerStore, WithdrawalTake};
