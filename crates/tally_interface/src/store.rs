//! The durable ledger store seam.

use crate::{AdminRecord, MessageRecord, MuteRecord, NewUserRecord, UserRecord};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use tally_error::TallyResult;
use tally_core::{DisplayMode, Page};

/// Outcome of atomically taking a user's full balance for withdrawal.
///
/// Produced inside one row-locked transaction so the balance cannot change
/// between the re-check and the zeroing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WithdrawalTake {
    /// Balance zeroed; `amount` points go to `wallet`
    Taken {
        /// Points transferred
        amount: i64,
        /// Destination wallet
        wallet: String,
    },
    /// Balance below the minimum; nothing changed
    Insufficient {
        /// Balance at check time
        points: i64,
    },
    /// No wallet linked; nothing changed
    NoWallet,
    /// No such account
    Missing,
}

/// Durable relational storage for users, messages, banned words, admins,
/// mutes, and per-admin display preferences.
///
/// Every method is one logical operation wrapped in a short-lived
/// transaction by the implementation; no transaction is ever held across an
/// await point on the caller's side. Balance mutations serialize per user.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    // -- users -------------------------------------------------------------

    /// Fetch a user by identifier.
    async fn get_user(&self, id: i64) -> TallyResult<Option<UserRecord>>;

    /// Resolve a referral code to its owner.
    async fn find_user_by_code(&self, code: &str) -> TallyResult<Option<UserRecord>>;

    /// Insert a new user; returns `false` when the identifier already has a
    /// row (existing data untouched).
    async fn create_user(&self, user: NewUserRecord) -> TallyResult<bool>;

    /// Add `delta` points to a user's balance under a per-row lock.
    async fn credit_points(&self, id: i64, delta: i64) -> TallyResult<bool>;

    /// Overwrite a user's balance.
    async fn set_points(&self, id: i64, points: i64) -> TallyResult<bool>;

    /// Overwrite a user's wallet address.
    async fn set_wallet(&self, id: i64, wallet: &str) -> TallyResult<bool>;

    /// Atomically re-check the minimum and zero the balance.
    async fn take_full_balance(&self, id: i64, minimum: i64) -> TallyResult<WithdrawalTake>;

    /// Restore a user to `points` and clear the wallet.
    async fn reset_user(&self, id: i64, points: i64) -> TallyResult<bool>;

    /// Delete a user; clears `referred_by` back-references pointing at the
    /// deleted row in the same transaction (orphaning, not cascading).
    async fn delete_user(&self, id: i64) -> TallyResult<bool>;

    /// Page of users ordered by identifier.
    async fn list_users(&self, page: i64, page_size: i64) -> TallyResult<Page<UserRecord>>;

    /// Every account identifier, for broadcast delivery.
    async fn user_ids(&self) -> TallyResult<Vec<i64>>;

    // -- messages ----------------------------------------------------------

    /// Insert a pending support message, stamped with the current time.
    async fn insert_message(&self, user_id: i64, body: &str) -> TallyResult<MessageRecord>;

    /// Fetch a message by identifier.
    async fn get_message(&self, id: i32) -> TallyResult<Option<MessageRecord>>;

    /// Page of pending messages, newest first.
    async fn pending_messages(&self, page: i64, page_size: i64)
    -> TallyResult<Page<MessageRecord>>;

    /// Transition `pending → replied`, storing the reply and replier.
    ///
    /// Returns the sender's identifier when the transition happened, `None`
    /// when the message is absent or already terminal.
    async fn mark_replied(&self, id: i32, reply: &str, admin_id: i64)
    -> TallyResult<Option<i64>>;

    /// Transition `pending → ignored`; `false` when absent or terminal.
    async fn mark_ignored(&self, id: i32) -> TallyResult<bool>;

    // -- banned words ------------------------------------------------------

    /// Add a banned word (stored lowercase; duplicate adds are no-ops).
    async fn add_banned_word(&self, word: &str, admin_id: i64) -> TallyResult<()>;

    /// Remove a banned word; `false` when it was not banned.
    async fn remove_banned_word(&self, word: &str) -> TallyResult<bool>;

    /// The full banned-word set, lowercase.
    async fn banned_words(&self) -> TallyResult<Vec<String>>;

    // -- administrators ----------------------------------------------------

    /// Fetch a roster row by identifier.
    async fn get_admin(&self, id: i64) -> TallyResult<Option<AdminRecord>>;

    /// Every roster row.
    async fn list_admins(&self) -> TallyResult<Vec<AdminRecord>>;

    /// Insert a delegated (non-main) admin; `false` when already present.
    async fn insert_admin(&self, id: i64, added_by: i64) -> TallyResult<bool>;

    /// Delete a roster row; `false` when absent.
    async fn delete_admin(&self, id: i64) -> TallyResult<bool>;

    // -- mutes -------------------------------------------------------------

    /// Insert or replace the mute for a user (never stacks durations).
    async fn upsert_mute(&self, user_id: i64, until: NaiveDateTime, by: i64) -> TallyResult<()>;

    /// Delete a mute; absent row is a no-op returning `false`.
    async fn delete_mute(&self, user_id: i64) -> TallyResult<bool>;

    /// Fetch the mute row for a user, expired or not.
    async fn get_mute(&self, user_id: i64) -> TallyResult<Option<MuteRecord>>;

    /// Page of all stored mutes, expired rows included.
    async fn list_mutes(&self, page: i64, page_size: i64) -> TallyResult<Page<MuteRecord>>;

    // -- per-admin settings ------------------------------------------------

    /// Display preference for an admin; default when no row exists.
    async fn display_mode(&self, admin_id: i64) -> TallyResult<DisplayMode>;

    /// Upsert an admin's display preference.
    async fn set_display_mode(&self, admin_id: i64, mode: DisplayMode) -> TallyResult<()>;
}
