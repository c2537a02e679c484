//! Moderation, mute, and admin-roster engines.
//!
//! [`ModerationEngine`] gates inbound support messages and drives the
//! pending/replied/ignored ticket lifecycle. [`MuteEngine`] owns timed and
//! indefinite mutes. [`AdminRoster`] answers authorization questions for a
//! fixed super-admin set plus a stored delegated roster.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod moderation;
mod mute;
mod roster;

pub use moderation::ModerationEngine;
pub use mute::{MuteEngine, MuteEntry};
pub use roster::AdminRoster;
