//! Support-message gates and the ticket lifecycle.

use chrono::Utc;
use std::sync::Arc;
use tally_core::Page;
use tally_error::{ModerationError, ModerationErrorKind, TallyResult};
use tally_interface::{LedgerStore, MessageRecord, Notifier};
use tracing::{info, instrument, warn};

/// Inbound message gating and the pending/replied/ignored lifecycle.
///
/// Gate order on submission is fixed: mute, then length, then banned
/// content. The first failing gate reports; later gates never run.
pub struct ModerationEngine {
    store: Arc<dyn LedgerStore>,
    notifier: Arc<dyn Notifier>,
    max_message_len: usize,
    page_size: i64,
}

impl ModerationEngine {
    /// Create an engine over the given store and notifier.
    pub fn new(
        store: Arc<dyn LedgerStore>,
        notifier: Arc<dyn Notifier>,
        max_message_len: usize,
        page_size: i64,
    ) -> Self {
        Self {
            store,
            notifier,
            max_message_len,
            page_size,
        }
    }

    /// Submit a support message, returning the stored pending row.
    #[instrument(skip(self, body))]
    pub async fn submit_message(&self, user_id: i64, body: &str) -> TallyResult<MessageRecord> {
        let now = Utc::now().naive_utc();
        if let Some(mute) = self.store.get_mute(user_id).await? {
            if mute.active_at(now) {
                return Err(ModerationError::new(ModerationErrorKind::Muted).into());
            }
        }

        let length = body.chars().count();
        if length > self.max_message_len {
            return Err(ModerationError::new(ModerationErrorKind::MessageTooLong {
                length,
                limit: self.max_message_len,
            })
            .into());
        }

        let lowered = body.to_lowercase();
        for word in self.store.banned_words().await? {
            if lowered.contains(&word) {
                return Err(ModerationError::new(ModerationErrorKind::BannedContent).into());
            }
        }

        let message = self.store.insert_message(user_id, body).await?;
        info!(user_id, message_id = message.id, "message accepted");
        Ok(message)
    }

    /// Page of pending messages, newest first.
    #[instrument(skip(self))]
    pub async fn pending_messages(&self, page: i64) -> TallyResult<Page<MessageRecord>> {
        self.store.pending_messages(page, self.page_size).await
    }

    /// Fetch one message by identifier.
    #[instrument(skip(self))]
    pub async fn message(&self, id: i32) -> TallyResult<MessageRecord> {
        self.store
            .get_message(id)
            .await?
            .ok_or_else(|| ModerationError::new(ModerationErrorKind::MessageNotFound).into())
    }

    /// Reply to a pending message.
    ///
    /// The transition to `replied` commits first; the reply notice to the
    /// sender is best-effort afterwards. A message already replied to or
    /// ignored is rejected without change.
    #[instrument(skip(self, text))]
    pub async fn reply(&self, id: i32, admin_id: i64, text: &str) -> TallyResult<()> {
        if self.store.get_message(id).await?.is_none() {
            return Err(ModerationError::new(ModerationErrorKind::MessageNotFound).into());
        }
        let sender = self
            .store
            .mark_replied(id, text, admin_id)
            .await?
            .ok_or_else(|| ModerationError::new(ModerationErrorKind::MessageNotPending))?;
        info!(message_id = id, admin_id, "message replied");

        let notice = format!("Support replied to your message:\n\n{text}");
        if let Err(failure) = self.notifier.notify(sender, &notice).await {
            warn!(message_id = id, sender, %failure, "reply notice undelivered");
        }
        Ok(())
    }

    /// Ignore a pending message. No notification goes out.
    #[instrument(skip(self))]
    pub async fn ignore(&self, id: i32) -> TallyResult<()> {
        if self.store.get_message(id).await?.is_none() {
            return Err(ModerationError::new(ModerationErrorKind::MessageNotFound).into());
        }
        if !self.store.mark_ignored(id).await? {
            return Err(ModerationError::new(ModerationErrorKind::MessageNotPending).into());
        }
        info!(message_id = id, "message ignored");
        Ok(())
    }

    /// Ban a word. Stored lowercase; banning an already banned word is a
    /// no-op.
    #[instrument(skip(self))]
    pub async fn ban_word(&self, admin_id: i64, word: &str) -> TallyResult<()> {
        self.store.add_banned_word(word, admin_id).await
    }

    /// Lift a word ban; `false` when the word was not banned.
    #[instrument(skip(self))]
    pub async fn unban_word(&self, word: &str) -> TallyResult<bool> {
        self.store.remove_banned_word(word).await
    }

    /// The current banned-word set.
    #[instrument(skip(self))]
    pub async fn banned_words(&self) -> TallyResult<Vec<String>> {
        self.store.banned_words().await
    }
}
