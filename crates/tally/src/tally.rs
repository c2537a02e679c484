//! Wiring the engines into one deployable bundle.

use crate::TallyConfig;
use std::sync::Arc;
use tally_broadcast::{AdStore, AdSupervisor};
use tally_database::{PgLedger, establish_pool};
use tally_core::Page;
use tally_error::TallyResult;
use tally_interface::{AdSender, LedgerStore, Notifier, UserRecord};
use tally_ledger::{BalanceEngine, ReferralEngine};
use tally_moderation::{AdminRoster, ModerationEngine, MuteEngine};
use tracing::info;

/// The assembled ledger: every engine wired over one store, one notifier,
/// and one advertisement sender.
///
/// The transport embedding this owns the inbound event loop; `Tally` owns
/// everything behind it.
pub struct Tally {
    store: Arc<dyn LedgerStore>,
    page_size: i64,
    referrals: ReferralEngine,
    balances: BalanceEngine,
    moderation: ModerationEngine,
    mutes: MuteEngine,
    roster: AdminRoster,
    ads: AdSupervisor,
    ad_store: Arc<AdStore>,
}

impl Tally {
    /// Assemble the engines over an already-constructed store.
    ///
    /// Failing to open the advertisement file is the one fatal startup
    /// error here; everything later is per-operation.
    pub fn new(
        config: &TallyConfig,
        store: Arc<dyn LedgerStore>,
        notifier: Arc<dyn Notifier>,
        ad_sender: Arc<dyn AdSender>,
    ) -> TallyResult<Self> {
        let ad_store = Arc::new(AdStore::open(
            &config.broadcast.ads_path,
            config.broadcast.minimum_interval_secs,
        )?);
        let referrals = ReferralEngine::new(
            store.clone(),
            notifier.clone(),
            config.ledger.starting_points,
            config.ledger.referral_reward,
        );
        let balances = BalanceEngine::new(
            store.clone(),
            notifier.clone(),
            config.ledger.starting_points,
            config.ledger.withdrawal_minimum,
            config.ledger.progress_steps,
            config.ledger.progress_step_delay(),
        );
        let moderation = ModerationEngine::new(
            store.clone(),
            notifier.clone(),
            config.moderation.max_message_len,
            config.moderation.page_size,
        );
        let mutes = MuteEngine::new(store.clone(), notifier.clone(), config.moderation.page_size);
        let roster = AdminRoster::new(
            store.clone(),
            notifier,
            config.super_admins.iter().copied(),
        );
        let ads = AdSupervisor::new(
            ad_store.clone(),
            store.clone(),
            ad_sender,
            config.broadcast.pacing_delay(),
        );
        info!("ledger assembled");
        Ok(Self {
            store,
            page_size: config.moderation.page_size,
            referrals,
            balances,
            moderation,
            mutes,
            roster,
            ads,
            ad_store,
        })
    }

    /// Assemble the engines over the PostgreSQL store from `DATABASE_URL`.
    pub fn with_postgres(
        config: &TallyConfig,
        notifier: Arc<dyn Notifier>,
        ad_sender: Arc<dyn AdSender>,
    ) -> TallyResult<Self> {
        let pool = establish_pool()?;
        let store: Arc<dyn LedgerStore> = Arc::new(PgLedger::new(pool));
        Self::new(config, store, notifier, ad_sender)
    }

    /// Restart delivery for every persisted advertisement. Called once on
    /// boot.
    pub fn resume_broadcasts(&self) {
        self.ads.resume_all();
    }

    /// Paged user listing for the admin panel, ordered by identifier.
    ///
    /// The referral view is the same window: each row's `referred_by`
    /// carries the edge, and the presenter decides which columns to render.
    pub async fn users(&self, page: i64) -> TallyResult<Page<UserRecord>> {
        self.store.list_users(page, self.page_size).await
    }

    /// The shared ledger store, for transports with their own queries.
    pub fn store(&self) -> Arc<dyn LedgerStore> {
        self.store.clone()
    }

    /// Registration and referral lookups.
    pub fn referrals(&self) -> &ReferralEngine {
        &self.referrals
    }

    /// Balances, wallets, and withdrawal.
    pub fn balances(&self) -> &BalanceEngine {
        &self.balances
    }

    /// Message gates and the ticket lifecycle.
    pub fn moderation(&self) -> &ModerationEngine {
        &self.moderation
    }

    /// Timed and indefinite mutes.
    pub fn mutes(&self) -> &MuteEngine {
        &self.mutes
    }

    /// Authorization and the delegated admin roster.
    pub fn roster(&self) -> &AdminRoster {
        &self.roster
    }

    /// Advertisement delivery tasks.
    pub fn broadcasts(&self) -> &AdSupervisor {
        &self.ads
    }

    /// The persisted advertisement list.
    pub fn ad_store(&self) -> &AdStore {
        &self.ad_store
    }
}
