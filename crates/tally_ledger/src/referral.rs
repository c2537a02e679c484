//! Registration and referral crediting.

use std::sync::Arc;
use tally_core::referral_code;
use tally_error::{LedgerError, LedgerErrorKind, TallyResult};
use tally_interface::{LedgerStore, NewUserRecord, Notifier};
use tracing::{info, instrument, warn};

/// Outcome of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// A fresh account was created.
    Created {
        /// The new account's referral code
        referral_code: String,
        /// Referrer credited with the reward, when a valid foreign code
        /// was supplied
        credited_referrer: Option<i64>,
    },
    /// The identifier already had an account; nothing changed.
    AlreadyRegistered,
}

/// Registration and referral-code lookups.
///
/// Registration is the only writer of `referred_by`, and an existing
/// account short-circuits before any credit, so the referral reward is
/// granted at most once per registered account.
pub struct ReferralEngine {
    store: Arc<dyn LedgerStore>,
    notifier: Arc<dyn Notifier>,
    starting_points: i64,
    referral_reward: i64,
}

impl ReferralEngine {
    /// Create an engine over the given store and notifier.
    pub fn new(
        store: Arc<dyn LedgerStore>,
        notifier: Arc<dyn Notifier>,
        starting_points: i64,
        referral_reward: i64,
    ) -> Self {
        Self {
            store,
            notifier,
            starting_points,
            referral_reward,
        }
    }

    /// Register an account, optionally under a referral code.
    ///
    /// An unresolvable or self-referential code falls back silently to a
    /// plain registration. The referrer is credited only after the new
    /// account row actually landed, and the credit notice is best-effort:
    /// a delivery failure is logged and the credit stands.
    #[instrument(skip(self))]
    pub async fn register(&self, id: i64, code_input: Option<&str>) -> TallyResult<Registration> {
        if self.store.get_user(id).await?.is_some() {
            return Ok(Registration::AlreadyRegistered);
        }

        let referrer = match code_input {
            Some(code) => self.resolve_referrer(id, code).await?,
            None => None,
        };

        let code = referral_code(id);
        let created = self
            .store
            .create_user(NewUserRecord {
                id,
                points: self.starting_points,
                referral_code: code.clone(),
                referred_by: referrer,
            })
            .await?;
        if !created {
            // Lost a race with a concurrent registration for the same id.
            return Ok(Registration::AlreadyRegistered);
        }
        info!(id, referrer, "registered account");

        let mut credited = None;
        if let Some(referrer_id) = referrer {
            if self.store.credit_points(referrer_id, self.referral_reward).await? {
                credited = Some(referrer_id);
                let notice = format!(
                    "You earned {} points for a successful referral!",
                    self.referral_reward
                );
                if let Err(failure) = self.notifier.notify(referrer_id, &notice).await {
                    warn!(referrer_id, %failure, "referral credit notice undelivered");
                }
            }
        }

        Ok(Registration::Created {
            referral_code: code,
            credited_referrer: credited,
        })
    }

    /// Look up an account's referral code.
    #[instrument(skip(self))]
    pub async fn referral_code(&self, id: i64) -> TallyResult<String> {
        match self.store.get_user(id).await? {
            Some(user) => Ok(user.referral_code),
            None => Err(LedgerError::new(LedgerErrorKind::NotRegistered).into()),
        }
    }

    async fn resolve_referrer(&self, id: i64, code: &str) -> TallyResult<Option<i64>> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }
        let owner = self.store.find_user_by_code(code).await?;
        Ok(owner.map(|u| u.id).filter(|&owner_id| owner_id != id))
    }
}
