//! Engine tests over the in-memory store.

mod support;

use std::sync::Arc;
use std::time::Duration;
use support::{RecordingNotifier, TickCounter};
use tally_core::referral_code;
use tally_error::{LedgerErrorKind, TallyError, TallyErrorKind};
use tally_interface::{LedgerStore, MemoryLedger};
use tally_ledger::{BalanceEngine, ReferralEngine, Registration};

const STARTING_POINTS: i64 = 5000;
const REFERRAL_REWARD: i64 = 1500;
const WITHDRAWAL_MINIMUM: i64 = 6500;
const PROGRESS_STEPS: u32 = 5;

struct Harness {
    store: Arc<MemoryLedger>,
    notifier: Arc<RecordingNotifier>,
    referrals: ReferralEngine,
    balances: BalanceEngine,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryLedger::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let referrals = ReferralEngine::new(
        store.clone(),
        notifier.clone(),
        STARTING_POINTS,
        REFERRAL_REWARD,
    );
    let balances = BalanceEngine::new(
        store.clone(),
        notifier.clone(),
        STARTING_POINTS,
        WITHDRAWAL_MINIMUM,
        PROGRESS_STEPS,
        Duration::from_millis(1),
    );
    Harness {
        store,
        notifier,
        referrals,
        balances,
    }
}

fn ledger_kind(err: TallyError) -> LedgerErrorKind {
    match err.kind() {
        TallyErrorKind::Ledger(e) => e.kind.clone(),
        other => panic!("expected ledger error, got {other}"),
    }
}

#[tokio::test]
async fn referral_credit_lands_exactly_once() {
    let h = harness();

    let first = h.referrals.register(100, None).await.unwrap();
    let code = match first {
        Registration::Created { referral_code, credited_referrer } => {
            assert!(credited_referrer.is_none());
            referral_code
        }
        other => panic!("unexpected outcome {other:?}"),
    };
    assert_eq!(code, referral_code(100));

    let second = h.referrals.register(200, Some(&code)).await.unwrap();
    assert!(matches!(
        second,
        Registration::Created { credited_referrer: Some(100), .. }
    ));
    assert_eq!(h.balances.balance(100).await.unwrap().points, 6500);
    assert_eq!(h.balances.balance(200).await.unwrap().points, STARTING_POINTS);
    assert_eq!(h.notifier.sent().len(), 1);

    // Re-registering the referred account changes nothing.
    let again = h.referrals.register(200, Some(&code)).await.unwrap();
    assert_eq!(again, Registration::AlreadyRegistered);
    assert_eq!(h.balances.balance(100).await.unwrap().points, 6500);
    assert_eq!(h.notifier.sent().len(), 1);
}

#[tokio::test]
async fn bad_codes_fall_back_to_plain_registration() {
    let h = harness();

    let own_code = referral_code(300);
    let with_own = h.referrals.register(300, Some(&own_code)).await.unwrap();
    assert!(matches!(
        with_own,
        Registration::Created { credited_referrer: None, .. }
    ));

    let with_unknown = h.referrals.register(301, Some("deadbeef")).await.unwrap();
    assert!(matches!(
        with_unknown,
        Registration::Created { credited_referrer: None, .. }
    ));
    let user = h.store.get_user(301).await.unwrap().unwrap();
    assert_eq!(user.referred_by, None);
    assert!(h.notifier.sent().is_empty());
}

#[tokio::test]
async fn unregistered_lookups_error() {
    let h = harness();
    let err = h.referrals.referral_code(9).await.unwrap_err();
    assert_eq!(ledger_kind(err), LedgerErrorKind::NotRegistered);
    let err = h.balances.balance(9).await.unwrap_err();
    assert_eq!(ledger_kind(err), LedgerErrorKind::NotRegistered);
}

#[tokio::test]
async fn wallet_is_trimmed_and_never_empty() {
    let h = harness();
    h.referrals.register(1, None).await.unwrap();

    h.balances.set_wallet(1, "  0xabc123  ").await.unwrap();
    assert_eq!(
        h.balances.balance(1).await.unwrap().wallet.as_deref(),
        Some("0xabc123")
    );

    let err = h.balances.set_wallet(1, "   ").await.unwrap_err();
    assert_eq!(ledger_kind(err), LedgerErrorKind::InvalidWallet);
    let err = h.balances.set_wallet(2, "0xabc").await.unwrap_err();
    assert_eq!(ledger_kind(err), LedgerErrorKind::NotRegistered);
}

#[tokio::test]
async fn withdrawal_preconditions_gate_the_offer() {
    let h = harness();
    h.referrals.register(1, None).await.unwrap();

    let err = h.balances.request_withdrawal(1).await.unwrap_err();
    assert_eq!(
        ledger_kind(err),
        LedgerErrorKind::InsufficientBalance {
            points: STARTING_POINTS,
            minimum: WITHDRAWAL_MINIMUM
        }
    );

    h.balances.set_points(1, 7000).await.unwrap();
    let err = h.balances.request_withdrawal(1).await.unwrap_err();
    assert_eq!(ledger_kind(err), LedgerErrorKind::NoWallet);

    h.balances.set_wallet(1, "0xabc").await.unwrap();
    let offer = h.balances.request_withdrawal(1).await.unwrap();
    assert_eq!(offer.amount, 7000);
    assert_eq!(offer.wallet, "0xabc");
    // The preview mutates nothing.
    assert_eq!(h.balances.balance(1).await.unwrap().points, 7000);
}

#[tokio::test]
async fn the_minimum_is_inclusive() {
    let h = harness();
    h.referrals.register(1, None).await.unwrap();
    h.balances.set_wallet(1, "0xabc").await.unwrap();

    h.balances.set_points(1, WITHDRAWAL_MINIMUM - 1).await.unwrap();
    let err = h.balances.request_withdrawal(1).await.unwrap_err();
    assert_eq!(
        ledger_kind(err),
        LedgerErrorKind::InsufficientBalance {
            points: WITHDRAWAL_MINIMUM - 1,
            minimum: WITHDRAWAL_MINIMUM
        }
    );
    assert_eq!(
        h.balances.balance(1).await.unwrap().points,
        WITHDRAWAL_MINIMUM - 1
    );

    h.balances.set_points(1, WITHDRAWAL_MINIMUM).await.unwrap();
    let receipt = h
        .balances
        .confirm_withdrawal(1, &tally_ledger::SilentProgress)
        .await
        .unwrap();
    assert_eq!(receipt.amount, WITHDRAWAL_MINIMUM);
    assert_eq!(h.balances.balance(1).await.unwrap().points, 0);
}

#[tokio::test]
async fn confirmed_withdrawal_ticks_then_zeroes() {
    let h = harness();
    h.referrals.register(1, None).await.unwrap();
    h.balances.set_points(1, 8000).await.unwrap();
    h.balances.set_wallet(1, "0xabc").await.unwrap();

    let sink = TickCounter::new();
    let receipt = h.balances.confirm_withdrawal(1, &sink).await.unwrap();
    assert_eq!(receipt.amount, 8000);
    assert_eq!(receipt.wallet, "0xabc");
    assert_eq!(
        sink.ticks(),
        vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]
    );
    assert_eq!(h.balances.balance(1).await.unwrap().points, 0);

    // A second confirmation finds nothing left to take.
    let err = h.balances.confirm_withdrawal(1, &sink).await.unwrap_err();
    assert!(matches!(
        ledger_kind(err),
        LedgerErrorKind::InsufficientBalance { points: 0, .. }
    ));
}

#[tokio::test]
async fn balance_drained_during_progress_is_caught_at_commit() {
    let h = harness();
    h.referrals.register(1, None).await.unwrap();
    h.balances.set_points(1, 8000).await.unwrap();
    h.balances.set_wallet(1, "0xabc").await.unwrap();

    // Sink that simulates an admin zeroing the balance mid-sequence.
    struct Drain {
        store: Arc<MemoryLedger>,
    }
    #[async_trait::async_trait]
    impl tally_ledger::ProgressSink for Drain {
        async fn step(&self, current: u32, _total: u32) {
            if current == 3 {
                self.store.set_points(1, 100).await.unwrap();
            }
        }
    }

    let sink = Drain { store: h.store.clone() };
    let err = h.balances.confirm_withdrawal(1, &sink).await.unwrap_err();
    assert_eq!(
        ledger_kind(err),
        LedgerErrorKind::InsufficientBalance { points: 100, minimum: WITHDRAWAL_MINIMUM }
    );
    assert_eq!(h.balances.balance(1).await.unwrap().points, 100);
}

#[tokio::test]
async fn reset_restores_points_and_clears_wallet() {
    let h = harness();
    h.referrals.register(1, None).await.unwrap();
    h.balances.set_points(1, 42).await.unwrap();
    h.balances.set_wallet(1, "0xabc").await.unwrap();

    h.balances.reset_user(1).await.unwrap();
    let balance = h.balances.balance(1).await.unwrap();
    assert_eq!(balance.points, STARTING_POINTS);
    assert_eq!(balance.wallet, None);
    assert!(h.notifier.sent().iter().any(|(id, _)| *id == 1));
}

#[tokio::test]
async fn deletion_survives_a_failed_notice() {
    let h = harness();
    h.referrals.register(1, None).await.unwrap();
    let code = h.referrals.referral_code(1).await.unwrap();
    h.referrals.register(2, Some(&code)).await.unwrap();

    h.notifier.fail_deliveries();
    h.balances.delete_user(1).await.unwrap();

    assert!(h.store.get_user(1).await.unwrap().is_none());
    // The referred account survives with its back-reference cleared.
    let survivor = h.store.get_user(2).await.unwrap().unwrap();
    assert_eq!(survivor.referred_by, None);
    assert_eq!(survivor.points, STARTING_POINTS);
}
