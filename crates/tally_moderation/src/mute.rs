//! Timed and indefinite mutes.

use chrono::Utc;
use std::sync::Arc;
use tally_core::{MuteDuration, Page};
use tally_error::TallyResult;
use tally_interface::{LedgerStore, MuteRecord, Notifier};
use tracing::{info, instrument, warn};

/// One listed mute, annotated with whether it still blocks the user.
///
/// Expired rows stay in storage until replaced or deleted; listings show
/// them for context but only unexpired rows are actionable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuteEntry {
    /// The stored row
    pub record: MuteRecord,
    /// True while the expiry is still in the future
    pub actionable: bool,
}

/// Mute issuance, lifting, and queries.
pub struct MuteEngine {
    store: Arc<dyn LedgerStore>,
    notifier: Arc<dyn Notifier>,
    page_size: i64,
}

impl MuteEngine {
    /// Create an engine over the given store and notifier.
    pub fn new(store: Arc<dyn LedgerStore>, notifier: Arc<dyn Notifier>, page_size: i64) -> Self {
        Self {
            store,
            notifier,
            page_size,
        }
    }

    /// Mute a user for the given duration.
    ///
    /// A new mute replaces any existing one outright; durations never
    /// stack. The expiry notice is best-effort after the upsert.
    #[instrument(skip(self))]
    pub async fn mute(&self, user_id: i64, duration: MuteDuration, by: i64) -> TallyResult<()> {
        let now = Utc::now().naive_utc();
        let until = duration.expiry(now);
        self.store.upsert_mute(user_id, until, by).await?;
        info!(user_id, %duration, "user muted");

        let notice = if duration.is_forever() {
            "You have been muted indefinitely.".to_string()
        } else {
            format!("You have been muted until {}.", until.format("%Y-%m-%d %H:%M"))
        };
        if let Err(failure) = self.notifier.notify(user_id, &notice).await {
            warn!(user_id, %failure, "mute notice undelivered");
        }
        Ok(())
    }

    /// Lift a user's mute. Lifting an absent mute is a no-op.
    #[instrument(skip(self))]
    pub async fn unmute(&self, user_id: i64) -> TallyResult<bool> {
        let lifted = self.store.delete_mute(user_id).await?;
        if lifted {
            info!(user_id, "user unmuted");
        }
        Ok(lifted)
    }

    /// True while an unexpired mute blocks the user.
    #[instrument(skip(self))]
    pub async fn is_muted(&self, user_id: i64) -> TallyResult<bool> {
        let now = Utc::now().naive_utc();
        Ok(self
            .store
            .get_mute(user_id)
            .await?
            .is_some_and(|m| m.active_at(now)))
    }

    /// Page of stored mutes, expired rows flagged as non-actionable.
    #[instrument(skip(self))]
    pub async fn muted_users(&self, page: i64) -> TallyResult<Page<MuteEntry>> {
        let now = Utc::now().naive_utc();
        let page = self.store.list_mutes(page, self.page_size).await?;
        Ok(page.map(|record| {
            let actionable = record.active_at(now);
            MuteEntry { record, actionable }
        }))
    }
}
