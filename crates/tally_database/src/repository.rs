//! Database-backed implementation of the [`LedgerStore`] trait.
//!
//! Every operation runs its blocking Diesel work inside
//! `tokio::task::spawn_blocking` as one short-lived transaction, so no
//! database state is ever held across an await point. Balance
//! read-modify-write paths take a `FOR UPDATE` row lock: two concurrent
//! credits for the same account serialize instead of racing.

use crate::models::{
    AdminRow, AdminSettingRow, MessageRow, MuteRow, NewAdminRow, NewBannedWordRow, NewMessageRow,
    NewUserRow, UserRow,
};
use crate::schema::{admin_settings, administrators, banned_words, messages, muted_users, users};
use crate::PgPool;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use std::str::FromStr;
use tally_core::{DisplayMode, MessageStatus, Page, page_window};
use tally_error::{DatabaseError, DatabaseErrorKind, TallyResult};
use tally_interface::{
    AdminRecord, LedgerStore, MessageRecord, MuteRecord, NewUserRecord, UserRecord, WithdrawalTake,
};
use tracing::instrument;

/// PostgreSQL-backed ledger store.
#[derive(Clone)]
pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    /// Create a new ledger store over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run one blocking ledger operation on the pool.
    async fn run<T, F>(&self, op: F) -> TallyResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> Result<T, DatabaseError> + Send + 'static,
    {
        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                DatabaseError::new(DatabaseErrorKind::Connection(e.to_string()))
            })?;
            op(&mut conn)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Query(e.to_string())))?;
        result.map_err(Into::into)
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[async_trait]
impl LedgerStore for PgLedger {
    #[instrument(skip(self))]
    async fn get_user(&self, id: i64) -> TallyResult<Option<UserRecord>> {
        self.run(move |conn| {
            let row = users::table
                .find(id)
                .first::<UserRow>(conn)
                .optional()?;
            Ok(row.map(UserRecord::from))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_user_by_code(&self, code: &str) -> TallyResult<Option<UserRecord>> {
        let code = code.to_string();
        self.run(move |conn| {
            let row = users::table
                .filter(users::referral_code.eq(code))
                .first::<UserRow>(conn)
                .optional()?;
            Ok(row.map(UserRecord::from))
        })
        .await
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    async fn create_user(&self, user: NewUserRecord) -> TallyResult<bool> {
        self.run(move |conn| {
            let inserted = diesel::insert_into(users::table)
                .values(NewUserRow {
                    id: user.id,
                    points: user.points,
                    referral_code: user.referral_code,
                    referred_by: user.referred_by,
                })
                .on_conflict(users::id)
                .do_nothing()
                .execute(conn)?;
            Ok(inserted == 1)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn credit_points(&self, id: i64, delta: i64) -> TallyResult<bool> {
        self.run(move |conn| {
            conn.transaction::<_, DatabaseError, _>(|conn| {
                let row = users::table
                    .find(id)
                    .for_update()
                    .first::<UserRow>(conn)
                    .optional()?;
                match row {
                    Some(user) => {
                        diesel::update(users::table.find(id))
                            .set(users::points.eq(user.points + delta))
                            .execute(conn)?;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            })
        })
        .await
    }

    #[instrument(skip(self))]
    async fn set_points(&self, id: i64, points: i64) -> TallyResult<bool> {
        self.run(move |conn| {
            let updated = diesel::update(users::table.find(id))
                .set(users::points.eq(points))
                .execute(conn)?;
            Ok(updated == 1)
        })
        .await
    }

    #[instrument(skip(self, wallet))]
    async fn set_wallet(&self, id: i64, wallet: &str) -> TallyResult<bool> {
        let wallet = wallet.to_string();
        self.run(move |conn| {
            let updated = diesel::update(users::table.find(id))
                .set(users::wallet_address.eq(wallet))
                .execute(conn)?;
            Ok(updated == 1)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn take_full_balance(&self, id: i64, minimum: i64) -> TallyResult<WithdrawalTake> {
        self.run(move |conn| {
            conn.transaction::<_, DatabaseError, _>(|conn| {
                let row = users::table
                    .find(id)
                    .for_update()
                    .first::<UserRow>(conn)
                    .optional()?;
                let Some(user) = row else {
                    return Ok(WithdrawalTake::Missing);
                };
                if user.points < minimum {
                    return Ok(WithdrawalTake::Insufficient { points: user.points });
                }
                let Some(wallet) = user.wallet_address else {
                    return Ok(WithdrawalTake::NoWallet);
                };
                diesel::update(users::table.find(id))
                    .set(users::points.eq(0))
                    .execute(conn)?;
                Ok(WithdrawalTake::Taken {
                    amount: user.points,
                    wallet,
                })
            })
        })
        .await
    }

    #[instrument(skip(self))]
    async fn reset_user(&self, id: i64, points: i64) -> TallyResult<bool> {
        self.run(move |conn| {
            let updated = diesel::update(users::table.find(id))
                .set((
                    users::points.eq(points),
                    users::wallet_address.eq(None::<String>),
                ))
                .execute(conn)?;
            Ok(updated == 1)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: i64) -> TallyResult<bool> {
        self.run(move |conn| {
            conn.transaction::<_, DatabaseError, _>(|conn| {
                diesel::update(users::table.filter(users::referred_by.eq(id)))
                    .set(users::referred_by.eq(None::<i64>))
                    .execute(conn)?;
                let deleted = diesel::delete(users::table.find(id)).execute(conn)?;
                Ok(deleted == 1)
            })
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list_users(&self, page: i64, page_size: i64) -> TallyResult<Page<UserRecord>> {
        self.run(move |conn| {
            let total: i64 = users::table.count().get_result(conn)?;
            let (limit, offset) = page_window(page, page_size);
            let rows = users::table
                .order(users::id.asc())
                .limit(limit)
                .offset(offset)
                .load::<UserRow>(conn)?;
            let items = rows.into_iter().map(UserRecord::from).collect();
            Ok(Page::new(items, page.max(0), total, page_size))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn user_ids(&self) -> TallyResult<Vec<i64>> {
        self.run(move |conn| {
            let ids = users::table
                .select(users::id)
                .order(users::id.asc())
                .load::<i64>(conn)?;
            Ok(ids)
        })
        .await
    }

    #[instrument(skip(self, body))]
    async fn insert_message(&self, user_id: i64, body: &str) -> TallyResult<MessageRecord> {
        let body = body.to_string();
        self.run(move |conn| {
            let row: MessageRow = diesel::insert_into(messages::table)
                .values(NewMessageRow {
                    user_id,
                    body,
                    created_at: now(),
                    status: MessageStatus::Pending.to_string(),
                })
                .get_result(conn)?;
            MessageRecord::try_from(row)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_message(&self, id: i32) -> TallyResult<Option<MessageRecord>> {
        self.run(move |conn| {
            let row = messages::table
                .find(id)
                .first::<MessageRow>(conn)
                .optional()?;
            row.map(MessageRecord::try_from).transpose()
        })
        .await
    }

    #[instrument(skip(self))]
    async fn pending_messages(
        &self,
        page: i64,
        page_size: i64,
    ) -> TallyResult<Page<MessageRecord>> {
        self.run(move |conn| {
            let pending = MessageStatus::Pending.to_string();
            let total: i64 = messages::table
                .filter(messages::status.eq(&pending))
                .count()
                .get_result(conn)?;
            let (limit, offset) = page_window(page, page_size);
            let rows = messages::table
                .filter(messages::status.eq(&pending))
                .order((messages::created_at.desc(), messages::id.desc()))
                .limit(limit)
                .offset(offset)
                .load::<MessageRow>(conn)?;
            let items = rows
                .into_iter()
                .map(MessageRecord::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Page::new(items, page.max(0), total, page_size))
        })
        .await
    }

    #[instrument(skip(self, reply))]
    async fn mark_replied(
        &self,
        id: i32,
        reply: &str,
        admin_id: i64,
    ) -> TallyResult<Option<i64>> {
        let reply = reply.to_string();
        self.run(move |conn| {
            // The status filter is the terminal-state guard: a replied or
            // ignored message matches zero rows.
            let sender = diesel::update(
                messages::table
                    .filter(messages::id.eq(id))
                    .filter(messages::status.eq(MessageStatus::Pending.to_string())),
            )
            .set((
                messages::status.eq(MessageStatus::Replied.to_string()),
                messages::reply.eq(reply),
                messages::replied_by.eq(admin_id),
            ))
            .returning(messages::user_id)
            .get_result::<i64>(conn)
            .optional()?;
            Ok(sender)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn mark_ignored(&self, id: i32) -> TallyResult<bool> {
        self.run(move |conn| {
            let updated = diesel::update(
                messages::table
                    .filter(messages::id.eq(id))
                    .filter(messages::status.eq(MessageStatus::Pending.to_string())),
            )
            .set(messages::status.eq(MessageStatus::Ignored.to_string()))
            .execute(conn)?;
            Ok(updated == 1)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn add_banned_word(&self, word: &str, admin_id: i64) -> TallyResult<()> {
        let word = word.to_lowercase();
        self.run(move |conn| {
            diesel::insert_into(banned_words::table)
                .values(NewBannedWordRow {
                    word,
                    added_by: admin_id,
                    added_at: now(),
                })
                .on_conflict(banned_words::word)
                .do_nothing()
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn remove_banned_word(&self, word: &str) -> TallyResult<bool> {
        let word = word.to_lowercase();
        self.run(move |conn| {
            let deleted =
                diesel::delete(banned_words::table.filter(banned_words::word.eq(word)))
                    .execute(conn)?;
            Ok(deleted == 1)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn banned_words(&self) -> TallyResult<Vec<String>> {
        self.run(move |conn| {
            let words = banned_words::table
                .select(banned_words::word)
                .order(banned_words::word.asc())
                .load::<String>(conn)?;
            Ok(words)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_admin(&self, id: i64) -> TallyResult<Option<AdminRecord>> {
        self.run(move |conn| {
            let row = administrators::table
                .find(id)
                .first::<AdminRow>(conn)
                .optional()?;
            Ok(row.map(AdminRecord::from))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list_admins(&self) -> TallyResult<Vec<AdminRecord>> {
        self.run(move |conn| {
            let rows = administrators::table
                .order(administrators::id.asc())
                .load::<AdminRow>(conn)?;
            Ok(rows.into_iter().map(AdminRecord::from).collect())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn insert_admin(&self, id: i64, added_by: i64) -> TallyResult<bool> {
        self.run(move |conn| {
            let inserted = diesel::insert_into(administrators::table)
                .values(NewAdminRow {
                    id,
                    is_main: false,
                    added_by,
                    added_at: now(),
                })
                .on_conflict(administrators::id)
                .do_nothing()
                .execute(conn)?;
            Ok(inserted == 1)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_admin(&self, id: i64) -> TallyResult<bool> {
        self.run(move |conn| {
            let deleted = diesel::delete(administrators::table.find(id)).execute(conn)?;
            Ok(deleted == 1)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn upsert_mute(&self, user_id: i64, until: NaiveDateTime, by: i64) -> TallyResult<()> {
        self.run(move |conn| {
            diesel::insert_into(muted_users::table)
                .values(MuteRow {
                    user_id,
                    muted_until: until,
                    muted_by: by,
                })
                .on_conflict(muted_users::user_id)
                .do_update()
                .set((
                    muted_users::muted_until.eq(until),
                    muted_users::muted_by.eq(by),
                ))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_mute(&self, user_id: i64) -> TallyResult<bool> {
        self.run(move |conn| {
            let deleted = diesel::delete(muted_users::table.find(user_id)).execute(conn)?;
            Ok(deleted == 1)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_mute(&self, user_id: i64) -> TallyResult<Option<MuteRecord>> {
        self.run(move |conn| {
            let row = muted_users::table
                .find(user_id)
                .first::<MuteRow>(conn)
                .optional()?;
            Ok(row.map(MuteRecord::from))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list_mutes(&self, page: i64, page_size: i64) -> TallyResult<Page<MuteRecord>> {
        self.run(move |conn| {
            let total: i64 = muted_users::table.count().get_result(conn)?;
            let (limit, offset) = page_window(page, page_size);
            let rows = muted_users::table
                .order(muted_users::user_id.asc())
                .limit(limit)
                .offset(offset)
                .load::<MuteRow>(conn)?;
            let items = rows.into_iter().map(MuteRecord::from).collect();
            Ok(Page::new(items, page.max(0), total, page_size))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn display_mode(&self, admin_id: i64) -> TallyResult<DisplayMode> {
        self.run(move |conn| {
            let stored = admin_settings::table
                .find(admin_id)
                .select(admin_settings::display_mode)
                .first::<String>(conn)
                .optional()?;
            // Unknown stored values fall back to the default rendering.
            Ok(stored
                .and_then(|s| DisplayMode::from_str(&s).ok())
                .unwrap_or_default())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn set_display_mode(&self, admin_id: i64, mode: DisplayMode) -> TallyResult<()> {
        self.run(move |conn| {
            diesel::insert_into(admin_settings::table)
                .values(AdminSettingRow {
                    admin_id,
                    display_mode: mode.to_string(),
                })
                .on_conflict(admin_settings::admin_id)
                .do_update()
                .set(admin_settings::display_mode.eq(mode.to_string()))
                .execute(conn)?;
            Ok(())
        })
        .await
    }
}
