//! Plain record types spoken across the [`crate::LedgerStore`] seam.
//!
//! These deliberately carry no ORM derives; the database crate converts
//! between these and its Diesel row types at its own boundary.

use chrono::NaiveDateTime;
use tally_core::MessageStatus;

/// A user account row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Opaque, externally assigned account identifier
    pub id: i64,
    /// Point balance, never negative
    pub points: i64,
    /// Unique 8-character referral code, immutable after creation
    pub referral_code: String,
    /// Weak back-reference to the referring account, set at most once
    pub referred_by: Option<i64>,
    /// Opaque payout wallet address, never validated
    pub wallet_address: Option<String>,
}

/// Fields for creating a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    /// Account identifier
    pub id: i64,
    /// Starting balance
    pub points: i64,
    /// Referral code derived from the identifier
    pub referral_code: String,
    /// Referring account, when registration carried a valid foreign code
    pub referred_by: Option<i64>,
}

/// A support-message row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    /// Sequential message identifier
    pub id: i32,
    /// Sending account
    pub user_id: i64,
    /// Body text
    pub body: String,
    /// Creation time
    pub created_at: NaiveDateTime,
    /// Lifecycle status
    pub status: MessageStatus,
    /// Reply body, present once replied
    pub reply: Option<String>,
    /// Replying admin, present once replied
    pub replied_by: Option<i64>,
}

/// An administrator roster row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRecord {
    /// Admin identifier
    pub id: i64,
    /// Persisted main-admin flag; removal refuses when set
    pub is_main: bool,
    /// Admin who added this row
    pub added_by: i64,
    /// Insertion time
    pub added_at: NaiveDateTime,
}

/// A mute row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuteRecord {
    /// Muted account
    pub user_id: i64,
    /// Expiry; [`tally_core::FOREVER`] encodes an indefinite mute
    pub muted_until: NaiveDateTime,
    /// Muting admin
    pub muted_by: i64,
}

impl MuteRecord {
    /// True while the mute still blocks the user at `now`.
    pub fn active_at(&self, now: NaiveDateTime) -> bool {
        self.muted_until > now
    }
}
