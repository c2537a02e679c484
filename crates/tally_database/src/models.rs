//! Diesel row models for the ledger tables.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use std::str::FromStr;
use tally_core::MessageStatus;
use tally_error::{DatabaseError, DatabaseErrorKind};
use tally_interface::{AdminRecord, MessageRecord, MuteRecord, UserRecord};

/// Database row for the users table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub points: i64,
    pub referral_code: String,
    pub referred_by: Option<i64>,
    pub wallet_address: Option<String>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            id: row.id,
            points: row.points,
            referral_code: row.referral_code,
            referred_by: row.referred_by,
            wallet_address: row.wallet_address,
        }
    }
}

/// Insertable struct for the users table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUserRow {
    pub id: i64,
    pub points: i64,
    pub referral_code: String,
    pub referred_by: Option<i64>,
}

/// Database row for the messages table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    pub id: i32,
    pub user_id: i64,
    pub body: String,
    pub created_at: NaiveDateTime,
    pub status: String,
    pub reply: Option<String>,
    pub replied_by: Option<i64>,
}

impl TryFrom<MessageRow> for MessageRecord {
    type Error = DatabaseError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let status = MessageStatus::from_str(&row.status).map_err(|_| {
            DatabaseError::new(DatabaseErrorKind::Serialization(format!(
                "unknown message status '{}'",
                row.status
            )))
        })?;
        Ok(MessageRecord {
            id: row.id,
            user_id: row.user_id,
            body: row.body,
            created_at: row.created_at,
            status,
            reply: row.reply,
            replied_by: row.replied_by,
        })
    }
}

/// Insertable struct for the messages table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::messages)]
pub struct NewMessageRow {
    pub user_id: i64,
    pub body: String,
    pub created_at: NaiveDateTime,
    pub status: String,
}

/// Database row for the banned_words table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::banned_words)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BannedWordRow {
    pub word: String,
    pub added_by: i64,
    pub added_at: NaiveDateTime,
}

/// Insertable struct for the banned_words table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::banned_words)]
pub struct NewBannedWordRow {
    pub word: String,
    pub added_by: i64,
    pub added_at: NaiveDateTime,
}

/// Database row for the administrators table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::administrators)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AdminRow {
    pub id: i64,
    pub is_main: bool,
    pub added_by: i64,
    pub added_at: NaiveDateTime,
}

impl From<AdminRow> for AdminRecord {
    fn from(row: AdminRow) -> Self {
        AdminRecord {
            id: row.id,
            is_main: row.is_main,
            added_by: row.added_by,
            added_at: row.added_at,
        }
    }
}

/// Insertable struct for the administrators table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::administrators)]
pub struct NewAdminRow {
    pub id: i64,
    pub is_main: bool,
    pub added_by: i64,
    pub added_at: NaiveDateTime,
}

/// Row and insertable struct for the muted_users table.
#[derive(Debug, Clone, Queryable, Insertable, Selectable)]
#[diesel(table_name = crate::schema::muted_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MuteRow {
    pub user_id: i64,
    pub muted_until: NaiveDateTime,
    pub muted_by: i64,
}

impl From<MuteRow> for MuteRecord {
    fn from(row: MuteRow) -> Self {
        MuteRecord {
            user_id: row.user_id,
            muted_until: row.muted_until,
            muted_by: row.muted_by,
        }
    }
}

/// Row and insertable struct for the admin_settings table.
#[derive(Debug, Clone, Queryable, Insertable, Selectable)]
#[diesel(table_name = crate::schema::admin_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AdminSettingRow {
    pub admin_id: i64,
    pub display_mode: String,
}
