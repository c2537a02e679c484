//! Referral and points ledger with admin moderation.
//!
//! This facade crate assembles the tally engines behind one [`Tally`]
//! bundle and loads deployment settings from a TOML file. A messaging
//! transport embeds the bundle, decodes its inbound events into
//! [`tally_core::Command`] values, and calls the engines; the engines never
//! see transport types.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tally::{Tally, TallyConfig};
//!
//! # async fn run(notifier: Arc<dyn tally_interface::Notifier>,
//! #              sender: Arc<dyn tally_interface::AdSender>) -> tally_error::TallyResult<()> {
//! let config = TallyConfig::from_file("tally.toml")?;
//! let tally = Tally::with_postgres(&config, notifier, sender)?;
//! tally.resume_broadcasts();
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod tally;
mod trace;

pub use config::{BroadcastConfig, LedgerConfig, ModerationConfig, TallyConfig};
pub use tally::Tally;
pub use trace::init_tracing;

pub use tally_broadcast::{AdStore, AdSupervisor};
pub use tally_core::{
    AdButton, Advertisement, AdminSession, Command, DisplayMode, MuteDuration, Page,
};
pub use tally_error::{TallyError, TallyErrorKind, TallyResult};
pub use tally_interface::{
    AdSender, AdminRecord, LedgerStore, MemoryLedger, MessageRecord, MuteRecord, Notifier,
    UserRecord,
};
pub use tally_ledger::{
    Balance, BalanceEngine, ProgressSink, ReferralEngine, Registration, SilentProgress,
    WithdrawalOffer, WithdrawalReceipt,
};
pub use tally_moderation::{AdminRoster, ModerationEngine, MuteEngine};
