//! Referral and balance engines for the tally ledger.
//!
//! [`ReferralEngine`] owns registration and referral-code lookup;
//! [`BalanceEngine`] owns balance queries, wallet linking, withdrawal, and
//! the admin-side balance mutations. Both engines speak to storage through
//! the [`tally_interface::LedgerStore`] seam and send user notices through
//! [`tally_interface::Notifier`], always mutating first and notifying
//! best-effort afterwards.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod balance;
mod referral;

pub use balance::{
    Balance, BalanceEngine, ProgressSink, SilentProgress, WithdrawalOffer, WithdrawalReceipt,
};
pub use referral::{ReferralEngine, Registration};
