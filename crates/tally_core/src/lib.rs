//! Core data types for the tally referral ledger.
//!
//! This crate provides the foundation data types used across all tally
//! crates: referral-code derivation, mute durations, message status, the
//! pagination window, the tagged admin command type, the per-admin session
//! state machine, and the advertisement payload.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod advertisement;
mod command;
mod display;
mod duration;
mod page;
mod referral;
mod session;
mod status;

pub use advertisement::{AdButton, Advertisement};
pub use command::Command;
pub use display::DisplayMode;
pub use duration::{FOREVER, MuteDuration};
pub use page::{PAGE_SIZE, Page, page_window, total_pages};
pub use referral::referral_code;
pub use session::{AdDraft, AdDraftStep, AdminSession, DraftIssue, DraftProgress};
pub use status::MessageStatus;
