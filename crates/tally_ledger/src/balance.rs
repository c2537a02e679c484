//! Balance queries, wallet linking, and the withdrawal sequence.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tally_error::{LedgerError, LedgerErrorKind, TallyResult};
use tally_interface::{LedgerStore, Notifier, WithdrawalTake};
use tracing::{info, instrument, warn};

/// A balance snapshot for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    /// Current points
    pub points: i64,
    /// Linked payout wallet, when set
    pub wallet: Option<String>,
}

/// The read-only preview shown before a withdrawal is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalOffer {
    /// Points that would be withdrawn
    pub amount: i64,
    /// Destination wallet
    pub wallet: String,
}

/// The committed result of a confirmed withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalReceipt {
    /// Points taken from the balance
    pub amount: i64,
    /// Destination wallet
    pub wallet: String,
}

/// Receives withdrawal progress ticks.
///
/// The transport renders these as an advancing indicator. Each tick lands
/// after one configured delay; no ledger transaction is open while a tick
/// is in flight.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Report that `current` of `total` steps have elapsed.
    async fn step(&self, current: u32, total: u32);
}

/// A sink that drops every tick.
pub struct SilentProgress;

#[async_trait]
impl ProgressSink for SilentProgress {
    async fn step(&self, _current: u32, _total: u32) {}
}

/// Balance queries, wallet linking, withdrawal, and admin-side balance
/// mutations.
pub struct BalanceEngine {
    store: Arc<dyn LedgerStore>,
    notifier: Arc<dyn Notifier>,
    starting_points: i64,
    withdrawal_minimum: i64,
    progress_steps: u32,
    progress_step_delay: Duration,
}

impl BalanceEngine {
    /// Create an engine over the given store and notifier.
    pub fn new(
        store: Arc<dyn LedgerStore>,
        notifier: Arc<dyn Notifier>,
        starting_points: i64,
        withdrawal_minimum: i64,
        progress_steps: u32,
        progress_step_delay: Duration,
    ) -> Self {
        Self {
            store,
            notifier,
            starting_points,
            withdrawal_minimum,
            progress_steps,
            progress_step_delay,
        }
    }

    /// Current balance and wallet for an account.
    #[instrument(skip(self))]
    pub async fn balance(&self, id: i64) -> TallyResult<Balance> {
        match self.store.get_user(id).await? {
            Some(user) => Ok(Balance {
                points: user.points,
                wallet: user.wallet_address,
            }),
            None => Err(LedgerError::new(LedgerErrorKind::NotRegistered).into()),
        }
    }

    /// Link a payout wallet address.
    ///
    /// The address is trimmed and stored opaquely; no format validation
    /// beyond non-emptiness.
    #[instrument(skip(self, address))]
    pub async fn set_wallet(&self, id: i64, address: &str) -> TallyResult<()> {
        let address = address.trim();
        if address.is_empty() {
            return Err(LedgerError::new(LedgerErrorKind::InvalidWallet).into());
        }
        if !self.store.set_wallet(id, address).await? {
            return Err(LedgerError::new(LedgerErrorKind::NotRegistered).into());
        }
        Ok(())
    }

    /// Preview a full-balance withdrawal without mutating anything.
    #[instrument(skip(self))]
    pub async fn request_withdrawal(&self, id: i64) -> TallyResult<WithdrawalOffer> {
        let user = self
            .store
            .get_user(id)
            .await?
            .ok_or_else(|| LedgerError::new(LedgerErrorKind::NotRegistered))?;
        if user.points < self.withdrawal_minimum {
            return Err(LedgerError::new(LedgerErrorKind::InsufficientBalance {
                points: user.points,
                minimum: self.withdrawal_minimum,
            })
            .into());
        }
        let wallet = user
            .wallet_address
            .ok_or_else(|| LedgerError::new(LedgerErrorKind::NoWallet))?;
        Ok(WithdrawalOffer {
            amount: user.points,
            wallet,
        })
    }

    /// Run the confirmed withdrawal sequence.
    ///
    /// The preconditions are validated up front, the progress ticks elapse
    /// with no transaction held, and the final take re-checks the minimum
    /// under a row lock before zeroing the balance. A balance that changed
    /// during the delays is caught by that re-check.
    #[instrument(skip(self, sink))]
    pub async fn confirm_withdrawal(
        &self,
        id: i64,
        sink: &dyn ProgressSink,
    ) -> TallyResult<WithdrawalReceipt> {
        self.request_withdrawal(id).await?;

        for current in 1..=self.progress_steps {
            tokio::time::sleep(self.progress_step_delay).await;
            sink.step(current, self.progress_steps).await;
        }

        match self.store.take_full_balance(id, self.withdrawal_minimum).await? {
            WithdrawalTake::Taken { amount, wallet } => {
                info!(id, amount, "withdrawal committed");
                Ok(WithdrawalReceipt { amount, wallet })
            }
            WithdrawalTake::Insufficient { points } => {
                Err(LedgerError::new(LedgerErrorKind::InsufficientBalance {
                    points,
                    minimum: self.withdrawal_minimum,
                })
                .into())
            }
            WithdrawalTake::NoWallet => Err(LedgerError::new(LedgerErrorKind::NoWallet).into()),
            WithdrawalTake::Missing => {
                Err(LedgerError::new(LedgerErrorKind::NotRegistered).into())
            }
        }
    }

    /// Overwrite an account's balance (admin operation).
    #[instrument(skip(self))]
    pub async fn set_points(&self, id: i64, points: i64) -> TallyResult<()> {
        if !self.store.set_points(id, points).await? {
            return Err(LedgerError::new(LedgerErrorKind::NotRegistered).into());
        }
        info!(id, points, "balance overwritten");
        Ok(())
    }

    /// Restore an account to the starting balance and clear its wallet
    /// (admin operation).
    #[instrument(skip(self))]
    pub async fn reset_user(&self, id: i64) -> TallyResult<()> {
        if !self.store.reset_user(id, self.starting_points).await? {
            return Err(LedgerError::new(LedgerErrorKind::NotRegistered).into());
        }
        info!(id, "account reset");
        let notice = format!("Your account was reset to {} points.", self.starting_points);
        if let Err(failure) = self.notifier.notify(id, &notice).await {
            warn!(id, %failure, "reset notice undelivered");
        }
        Ok(())
    }

    /// Delete an account (admin operation).
    ///
    /// Accounts referred by the deleted one keep their points and lose only
    /// the back-reference. The deletion notice goes out after the row is
    /// gone and its failure is swallowed.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: i64) -> TallyResult<()> {
        if !self.store.delete_user(id).await? {
            return Err(LedgerError::new(LedgerErrorKind::NotRegistered).into());
        }
        info!(id, "account deleted");
        if let Err(failure) = self
            .notifier
            .notify(id, "Your account has been deleted by an administrator.")
            .await
        {
            warn!(id, %failure, "deletion notice undelivered");
        }
        Ok(())
    }
}
