//! Gate-order, lifecycle, and pagination tests over the in-memory store.

mod support;

use chrono::Utc;
use std::sync::Arc;
use support::RecordingNotifier;
use tally_core::{MessageStatus, MuteDuration, PAGE_SIZE};
use tally_error::{ModerationErrorKind, TallyError, TallyErrorKind};
use tally_interface::{LedgerStore, MemoryLedger};
use tally_moderation::{ModerationEngine, MuteEngine};

const MAX_MESSAGE_LEN: usize = 300;

struct Harness {
    store: Arc<MemoryLedger>,
    notifier: Arc<RecordingNotifier>,
    moderation: ModerationEngine,
    mutes: MuteEngine,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryLedger::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let moderation = ModerationEngine::new(
        store.clone(),
        notifier.clone(),
        MAX_MESSAGE_LEN,
        PAGE_SIZE,
    );
    let mutes = MuteEngine::new(store.clone(), notifier.clone(), PAGE_SIZE);
    Harness {
        store,
        notifier,
        moderation,
        mutes,
    }
}

fn moderation_kind(err: TallyError) -> ModerationErrorKind {
    match err.kind() {
        TallyErrorKind::Moderation(e) => e.kind.clone(),
        other => panic!("expected moderation error, got {other}"),
    }
}

#[tokio::test]
async fn muted_sender_is_blocked_before_other_gates() {
    let h = harness();
    h.mutes.mute(7, MuteDuration::OneDay, 1).await.unwrap();

    // Over-length and banned content are irrelevant while muted.
    h.moderation.ban_word(1, "spam").await.unwrap();
    let err = h.moderation.submit_message(7, &"spam ".repeat(100)).await.unwrap_err();
    assert_eq!(moderation_kind(err), ModerationErrorKind::Muted);
}

#[tokio::test]
async fn expired_mute_no_longer_blocks() {
    let h = harness();
    let past = Utc::now().naive_utc() - chrono::Duration::hours(1);
    h.store.upsert_mute(7, past, 1).await.unwrap();

    assert!(!h.mutes.is_muted(7).await.unwrap());
    let message = h.moderation.submit_message(7, "hello").await.unwrap();
    assert_eq!(message.status, MessageStatus::Pending);
}

#[tokio::test]
async fn forever_mute_blocks_until_lifted() {
    let h = harness();
    h.mutes.mute(7, MuteDuration::Forever, 1).await.unwrap();
    assert!(h.mutes.is_muted(7).await.unwrap());

    assert!(h.mutes.unmute(7).await.unwrap());
    assert!(!h.mutes.is_muted(7).await.unwrap());
    h.moderation.submit_message(7, "hello").await.unwrap();

    // Lifting again is a no-op.
    assert!(!h.mutes.unmute(7).await.unwrap());
}

#[tokio::test]
async fn length_limit_is_inclusive() {
    let h = harness();
    let at_limit = "a".repeat(MAX_MESSAGE_LEN);
    h.moderation.submit_message(1, &at_limit).await.unwrap();

    let over = "a".repeat(MAX_MESSAGE_LEN + 1);
    let err = h.moderation.submit_message(1, &over).await.unwrap_err();
    assert_eq!(
        moderation_kind(err),
        ModerationErrorKind::MessageTooLong {
            length: MAX_MESSAGE_LEN + 1,
            limit: MAX_MESSAGE_LEN
        }
    );
}

#[tokio::test]
async fn banned_words_match_as_substrings_ignoring_case() {
    let h = harness();
    h.moderation.ban_word(1, "SPAM").await.unwrap();

    let err = h.moderation.submit_message(1, "Sir Spamalot").await.unwrap_err();
    assert_eq!(moderation_kind(err), ModerationErrorKind::BannedContent);

    h.moderation.submit_message(1, "perfectly fine").await.unwrap();

    assert!(h.moderation.unban_word("spam").await.unwrap());
    h.moderation.submit_message(1, "Sir Spamalot").await.unwrap();
    assert!(!h.moderation.unban_word("spam").await.unwrap());
}

#[tokio::test]
async fn pending_listing_pages_newest_first() {
    let h = harness();
    for i in 0..12 {
        h.moderation
            .submit_message(i, &format!("message {i}"))
            .await
            .unwrap();
    }

    let first = h.moderation.pending_messages(0).await.unwrap();
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.items.len(), 5);
    assert_eq!(first.items[0].body, "message 11");
    assert!(first.has_next());
    assert!(!first.has_prev());

    let last = h.moderation.pending_messages(2).await.unwrap();
    assert_eq!(last.items.len(), 2);
    assert_eq!(last.items[1].body, "message 0");
    assert!(!last.has_next());
}

#[tokio::test]
async fn reply_is_terminal_and_notifies_the_sender() {
    let h = harness();
    let message = h.moderation.submit_message(42, "help me").await.unwrap();

    h.moderation.reply(message.id, 1, "done").await.unwrap();
    let stored = h.moderation.message(message.id).await.unwrap();
    assert_eq!(stored.status, MessageStatus::Replied);
    assert_eq!(stored.reply.as_deref(), Some("done"));
    assert_eq!(stored.replied_by, Some(1));
    assert!(h.notifier.sent().iter().any(|(id, text)| *id == 42 && text.contains("done")));

    let err = h.moderation.reply(message.id, 1, "again").await.unwrap_err();
    assert_eq!(moderation_kind(err), ModerationErrorKind::MessageNotPending);
    let err = h.moderation.ignore(message.id).await.unwrap_err();
    assert_eq!(moderation_kind(err), ModerationErrorKind::MessageNotPending);

    // The ticket leaves the pending queue.
    assert!(h.moderation.pending_messages(0).await.unwrap().items.is_empty());
}

#[tokio::test]
async fn ignore_is_silent() {
    let h = harness();
    let message = h.moderation.submit_message(42, "help me").await.unwrap();

    h.moderation.ignore(message.id).await.unwrap();
    assert_eq!(
        h.moderation.message(message.id).await.unwrap().status,
        MessageStatus::Ignored
    );
    assert!(h.notifier.sent().is_empty());
}

#[tokio::test]
async fn missing_messages_are_not_found() {
    let h = harness();
    let err = h.moderation.message(99).await.unwrap_err();
    assert_eq!(moderation_kind(err), ModerationErrorKind::MessageNotFound);
    let err = h.moderation.reply(99, 1, "hi").await.unwrap_err();
    assert_eq!(moderation_kind(err), ModerationErrorKind::MessageNotFound);
}

#[tokio::test]
async fn a_new_mute_replaces_the_previous_one() {
    let h = harness();
    h.mutes.mute(7, MuteDuration::Forever, 1).await.unwrap();
    h.mutes.mute(7, MuteDuration::OneDay, 2).await.unwrap();

    let page = h.mutes.muted_users(0).await.unwrap();
    assert_eq!(page.items.len(), 1);
    let entry = &page.items[0];
    assert!(entry.actionable);
    assert_eq!(entry.record.muted_by, 2);
    assert!(entry.record.muted_until < tally_core::FOREVER);
}

#[tokio::test]
async fn listings_show_expired_mutes_as_non_actionable() {
    let h = harness();
    let past = Utc::now().naive_utc() - chrono::Duration::hours(1);
    h.store.upsert_mute(7, past, 1).await.unwrap();
    h.mutes.mute(8, MuteDuration::OneWeek, 1).await.unwrap();

    let page = h.mutes.muted_users(0).await.unwrap();
    assert_eq!(page.items.len(), 2);
    let expired = page.items.iter().find(|e| e.record.user_id == 7).unwrap();
    assert!(!expired.actionable);
    let active = page.items.iter().find(|e| e.record.user_id == 8).unwrap();
    assert!(active.actionable);
}
