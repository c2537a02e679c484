//! In-memory ledger backend.
//!
//! Implements [`LedgerStore`] over plain maps for tests and for embedding
//! without PostgreSQL. Single-lock serialization gives the same per-user
//! ordering guarantees the database backend provides with row locks.

use crate::{
    AdminRecord, LedgerStore, MessageRecord, MuteRecord, NewUserRecord, UserRecord, WithdrawalTake,
};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tally_core::{DisplayMode, MessageStatus, Page, page_window};
use tally_error::TallyResult;

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<i64, UserRecord>,
    messages: BTreeMap<i32, MessageRecord>,
    next_message_id: i32,
    banned_words: BTreeMap<String, (i64, NaiveDateTime)>,
    admins: BTreeMap<i64, AdminRecord>,
    mutes: BTreeMap<i64, MuteRecord>,
    display_modes: BTreeMap<i64, DisplayMode>,
}

/// Map-backed [`LedgerStore`].
#[derive(Debug, Default)]
pub struct MemoryLedger {
    inner: Mutex<Inner>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn window<T: Clone>(rows: Vec<T>, page: i64, page_size: i64) -> Page<T> {
    let total = rows.len() as i64;
    let (limit, offset) = page_window(page, page_size);
    let items = rows
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();
    Page::new(items, page.max(0), total, page_size)
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn get_user(&self, id: i64) -> TallyResult<Option<UserRecord>> {
        Ok(self.inner.lock().users.get(&id).cloned())
    }

    async fn find_user_by_code(&self, code: &str) -> TallyResult<Option<UserRecord>> {
        Ok(self
            .inner
            .lock()
            .users
            .values()
            .find(|u| u.referral_code == code)
            .cloned())
    }

    async fn create_user(&self, user: NewUserRecord) -> TallyResult<bool> {
        let mut inner = self.inner.lock();
        if inner.users.contains_key(&user.id) {
            return Ok(false);
        }
        inner.users.insert(
            user.id,
            UserRecord {
                id: user.id,
                points: user.points,
                referral_code: user.referral_code,
                referred_by: user.referred_by,
                wallet_address: None,
            },
        );
        Ok(true)
    }

    async fn credit_points(&self, id: i64, delta: i64) -> TallyResult<bool> {
        let mut inner = self.inner.lock();
        match inner.users.get_mut(&id) {
            Some(user) => {
                user.points += delta;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_points(&self, id: i64, points: i64) -> TallyResult<bool> {
        let mut inner = self.inner.lock();
        match inner.users.get_mut(&id) {
            Some(user) => {
                user.points = points;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_wallet(&self, id: i64, wallet: &str) -> TallyResult<bool> {
        let mut inner = self.inner.lock();
        match inner.users.get_mut(&id) {
            Some(user) => {
                user.wallet_address = Some(wallet.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn take_full_balance(&self, id: i64, minimum: i64) -> TallyResult<WithdrawalTake> {
        let mut inner = self.inner.lock();
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(WithdrawalTake::Missing);
        };
        if user.points < minimum {
            return Ok(WithdrawalTake::Insufficient { points: user.points });
        }
        let Some(wallet) = user.wallet_address.clone() else {
            return Ok(WithdrawalTake::NoWallet);
        };
        let amount = user.points;
        user.points = 0;
        Ok(WithdrawalTake::Taken { amount, wallet })
    }

    async fn reset_user(&self, id: i64, points: i64) -> TallyResult<bool> {
        let mut inner = self.inner.lock();
        match inner.users.get_mut(&id) {
            Some(user) => {
                user.points = points;
                user.wallet_address = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: i64) -> TallyResult<bool> {
        let mut inner = self.inner.lock();
        if inner.users.remove(&id).is_none() {
            return Ok(false);
        }
        for user in inner.users.values_mut() {
            if user.referred_by == Some(id) {
                user.referred_by = None;
            }
        }
        Ok(true)
    }

    async fn list_users(&self, page: i64, page_size: i64) -> TallyResult<Page<UserRecord>> {
        let rows: Vec<UserRecord> = self.inner.lock().users.values().cloned().collect();
        Ok(window(rows, page, page_size))
    }

    async fn user_ids(&self) -> TallyResult<Vec<i64>> {
        Ok(self.inner.lock().users.keys().copied().collect())
    }

    async fn insert_message(&self, user_id: i64, body: &str) -> TallyResult<MessageRecord> {
        let mut inner = self.inner.lock();
        inner.next_message_id += 1;
        let record = MessageRecord {
            id: inner.next_message_id,
            user_id,
            body: body.to_string(),
            created_at: now(),
            status: MessageStatus::Pending,
            reply: None,
            replied_by: None,
        };
        inner.messages.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_message(&self, id: i32) -> TallyResult<Option<MessageRecord>> {
        Ok(self.inner.lock().messages.get(&id).cloned())
    }

    async fn pending_messages(
        &self,
        page: i64,
        page_size: i64,
    ) -> TallyResult<Page<MessageRecord>> {
        let mut rows: Vec<MessageRecord> = self
            .inner
            .lock()
            .messages
            .values()
            .filter(|m| m.status == MessageStatus::Pending)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(window(rows, page, page_size))
    }

    async fn mark_replied(
        &self,
        id: i32,
        reply: &str,
        admin_id: i64,
    ) -> TallyResult<Option<i64>> {
        let mut inner = self.inner.lock();
        match inner.messages.get_mut(&id) {
            Some(message) if message.status == MessageStatus::Pending => {
                message.status = MessageStatus::Replied;
                message.reply = Some(reply.to_string());
                message.replied_by = Some(admin_id);
                Ok(Some(message.user_id))
            }
            _ => Ok(None),
        }
    }

    async fn mark_ignored(&self, id: i32) -> TallyResult<bool> {
        let mut inner = self.inner.lock();
        match inner.messages.get_mut(&id) {
            Some(message) if message.status == MessageStatus::Pending => {
                message.status = MessageStatus::Ignored;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn add_banned_word(&self, word: &str, admin_id: i64) -> TallyResult<()> {
        self.inner
            .lock()
            .banned_words
            .entry(word.to_lowercase())
            .or_insert((admin_id, now()));
        Ok(())
    }

    async fn remove_banned_word(&self, word: &str) -> TallyResult<bool> {
        Ok(self
            .inner
            .lock()
            .banned_words
            .remove(&word.to_lowercase())
            .is_some())
    }

    async fn banned_words(&self) -> TallyResult<Vec<String>> {
        Ok(self.inner.lock().banned_words.keys().cloned().collect())
    }

    async fn get_admin(&self, id: i64) -> TallyResult<Option<AdminRecord>> {
        Ok(self.inner.lock().admins.get(&id).cloned())
    }

    async fn list_admins(&self) -> TallyResult<Vec<AdminRecord>> {
        Ok(self.inner.lock().admins.values().cloned().collect())
    }

    async fn insert_admin(&self, id: i64, added_by: i64) -> TallyResult<bool> {
        let mut inner = self.inner.lock();
        if inner.admins.contains_key(&id) {
            return Ok(false);
        }
        inner.admins.insert(
            id,
            AdminRecord {
                id,
                is_main: false,
                added_by,
                added_at: now(),
            },
        );
        Ok(true)
    }

    async fn delete_admin(&self, id: i64) -> TallyResult<bool> {
        Ok(self.inner.lock().admins.remove(&id).is_some())
    }

    async fn upsert_mute(&self, user_id: i64, until: NaiveDateTime, by: i64) -> TallyResult<()> {
        self.inner.lock().mutes.insert(
            user_id,
            MuteRecord {
                user_id,
                muted_until: until,
                muted_by: by,
            },
        );
        Ok(())
    }

    async fn delete_mute(&self, user_id: i64) -> TallyResult<bool> {
        Ok(self.inner.lock().mutes.remove(&user_id).is_some())
    }

    async fn get_mute(&self, user_id: i64) -> TallyResult<Option<MuteRecord>> {
        Ok(self.inner.lock().mutes.get(&user_id).cloned())
    }

    async fn list_mutes(&self, page: i64, page_size: i64) -> TallyResult<Page<MuteRecord>> {
        let rows: Vec<MuteRecord> = self.inner.lock().mutes.values().cloned().collect();
        Ok(window(rows, page, page_size))
    }

    async fn display_mode(&self, admin_id: i64) -> TallyResult<DisplayMode> {
        Ok(self
            .inner
            .lock()
            .display_modes
            .get(&admin_id)
            .copied()
            .unwrap_or_default())
    }

    async fn set_display_mode(&self, admin_id: i64, mode: DisplayMode) -> TallyResult<()> {
        self.inner.lock().display_modes.insert(admin_id, mode);
        Ok(())
    }
}

// Promoting a stored admin to main is a test-support concern; production
// main-admin status comes from configuration, not the roster.
impl MemoryLedger {
    /// Insert a roster row with the persisted main flag set.
    pub fn insert_main_admin(&self, id: i64, added_by: i64) {
        self.inner.lock().admins.insert(
            id,
            AdminRecord {
                id,
                is_main: true,
                added_by,
                added_at: now(),
            },
        );
    }
}
