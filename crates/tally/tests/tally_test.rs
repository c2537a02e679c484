//! End-to-end assembly test over the in-memory store.

use std::sync::Arc;
use tally::{
    MemoryLedger, MuteDuration, Registration, SilentProgress, Tally, TallyConfig,
};
use tally_core::Advertisement;
use tally_interface::{AdSender, DeliveryFailure, Notifier};

struct NullTransport;

#[async_trait::async_trait]
impl Notifier for NullTransport {
    async fn notify(&self, _user_id: i64, _text: &str) -> Result<(), DeliveryFailure> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl AdSender for NullTransport {
    async fn send_ad(&self, _user_id: i64, _ad: &Advertisement) -> Result<(), DeliveryFailure> {
        Ok(())
    }
}

fn test_config(tag: &str) -> TallyConfig {
    let mut config = TallyConfig::default();
    config.super_admins = vec![1];
    config.ledger.progress_step_delay_ms = 1;
    config.broadcast.ads_path = std::env::temp_dir().join(format!(
        "tally_facade_{tag}_{}.json",
        std::process::id()
    ));
    config
}

fn assemble(tag: &str) -> (Tally, TallyConfig) {
    let config = test_config(tag);
    let transport = Arc::new(NullTransport);
    let tally = Tally::new(
        &config,
        Arc::new(MemoryLedger::new()),
        transport.clone(),
        transport,
    )
    .unwrap();
    (tally, config)
}

#[tokio::test]
async fn a_user_journey_runs_through_the_bundle() {
    let (tally, config) = assemble("journey");

    let created = tally.referrals().register(100, None).await.unwrap();
    let code = match created {
        Registration::Created { referral_code, .. } => referral_code,
        other => panic!("unexpected outcome {other:?}"),
    };
    tally.referrals().register(200, Some(&code)).await.unwrap();
    assert_eq!(tally.balances().balance(100).await.unwrap().points, 6500);

    let listing = tally.users(0).await.unwrap();
    assert_eq!(listing.items.len(), 2);
    assert_eq!(listing.items[1].id, 200);
    assert_eq!(listing.items[1].referred_by, Some(100));

    tally.balances().set_wallet(100, "0xabc").await.unwrap();
    let receipt = tally
        .balances()
        .confirm_withdrawal(100, &SilentProgress)
        .await
        .unwrap();
    assert_eq!(receipt.amount, 6500);
    assert_eq!(tally.balances().balance(100).await.unwrap().points, 0);

    std::fs::remove_file(&config.broadcast.ads_path).ok();
}

#[tokio::test]
async fn moderation_and_roster_share_the_store() {
    let (tally, config) = assemble("moderation");

    tally.roster().gate(1).await.unwrap();
    assert!(tally.roster().gate(9).await.is_err());

    tally.roster().add_admin(1, 9).await.unwrap();
    tally.roster().gate(9).await.unwrap();

    let message = tally.moderation().submit_message(42, "help").await.unwrap();
    tally.moderation().reply(message.id, 9, "done").await.unwrap();

    tally.mutes().mute(42, MuteDuration::OneDay, 9).await.unwrap();
    assert!(tally.moderation().submit_message(42, "again").await.is_err());

    std::fs::remove_file(&config.broadcast.ads_path).ok();
}

#[tokio::test]
async fn broadcasts_resume_from_the_persisted_store() {
    let (tally, config) = assemble("broadcast");

    tally
        .broadcasts()
        .create(Advertisement {
            name: "promo".to_string(),
            text: "hello".to_string(),
            buttons: Vec::new(),
            interval_secs: 120,
            last_sent: None,
        })
        .unwrap();
    assert_eq!(tally.broadcasts().running(), vec!["promo".to_string()]);
    tally.broadcasts().shutdown();

    // A fresh bundle over the same file resumes delivery on boot.
    let transport = Arc::new(NullTransport);
    let rebooted = Tally::new(
        &config,
        Arc::new(MemoryLedger::new()),
        transport.clone(),
        transport,
    )
    .unwrap();
    assert!(rebooted.broadcasts().running().is_empty());
    rebooted.resume_broadcasts();
    assert_eq!(rebooted.broadcasts().running(), vec!["promo".to_string()]);
    rebooted.broadcasts().shutdown();

    std::fs::remove_file(&config.broadcast.ads_path).ok();
}
