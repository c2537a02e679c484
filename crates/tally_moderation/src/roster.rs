//! Authorization and the delegated admin roster.

use std::collections::BTreeSet;
use std::sync::Arc;
use tally_core::DisplayMode;
use tally_error::{RosterError, RosterErrorKind, TallyResult};
use tally_interface::{AdminRecord, LedgerStore, Notifier};
use tracing::{info, instrument, warn};

/// The admin roster: a fixed super-admin set from configuration plus
/// delegated admins stored in the ledger.
///
/// Super-admins need no roster row; they are main admins by construction
/// and can never be removed through the roster.
pub struct AdminRoster {
    store: Arc<dyn LedgerStore>,
    notifier: Arc<dyn Notifier>,
    super_admins: BTreeSet<i64>,
}

impl AdminRoster {
    /// Create a roster with the given fixed super-admin set.
    pub fn new(
        store: Arc<dyn LedgerStore>,
        notifier: Arc<dyn Notifier>,
        super_admins: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self {
            store,
            notifier,
            super_admins: super_admins.into_iter().collect(),
        }
    }

    /// True for super-admins and every stored roster row.
    #[instrument(skip(self))]
    pub async fn is_admin(&self, id: i64) -> TallyResult<bool> {
        if self.super_admins.contains(&id) {
            return Ok(true);
        }
        Ok(self.store.get_admin(id).await?.is_some())
    }

    /// True for super-admins and stored rows flagged as main.
    #[instrument(skip(self))]
    pub async fn is_main_admin(&self, id: i64) -> TallyResult<bool> {
        if self.super_admins.contains(&id) {
            return Ok(true);
        }
        Ok(self
            .store
            .get_admin(id)
            .await?
            .is_some_and(|admin| admin.is_main))
    }

    /// Authorization short-circuit used by every admin-facing path.
    ///
    /// No state changes and no detail beyond the refusal leaks out.
    #[instrument(skip(self))]
    pub async fn gate(&self, id: i64) -> TallyResult<()> {
        if self.is_admin(id).await? {
            Ok(())
        } else {
            Err(RosterError::new(RosterErrorKind::Forbidden).into())
        }
    }

    /// Every stored roster row.
    #[instrument(skip(self))]
    pub async fn list_admins(&self) -> TallyResult<Vec<AdminRecord>> {
        self.store.list_admins().await
    }

    /// Add a delegated admin. Only main admins may delegate.
    #[instrument(skip(self))]
    pub async fn add_admin(&self, requester: i64, new_admin: i64) -> TallyResult<()> {
        if !self.is_main_admin(requester).await? {
            return Err(RosterError::new(RosterErrorKind::Forbidden).into());
        }
        if self.super_admins.contains(&new_admin) {
            return Err(RosterError::new(RosterErrorKind::AlreadyAdmin).into());
        }
        if !self.store.insert_admin(new_admin, requester).await? {
            return Err(RosterError::new(RosterErrorKind::AlreadyAdmin).into());
        }
        info!(new_admin, requester, "admin added");
        if let Err(failure) = self
            .notifier
            .notify(new_admin, "You have been granted administrator access.")
            .await
        {
            warn!(new_admin, %failure, "admin welcome undelivered");
        }
        Ok(())
    }

    /// Remove a delegated admin. Main admins are refused.
    #[instrument(skip(self))]
    pub async fn remove_admin(&self, requester: i64, target: i64) -> TallyResult<()> {
        if !self.is_main_admin(requester).await? {
            return Err(RosterError::new(RosterErrorKind::Forbidden).into());
        }
        if self.super_admins.contains(&target) {
            return Err(RosterError::new(RosterErrorKind::CannotRemoveMain).into());
        }
        let stored = self
            .store
            .get_admin(target)
            .await?
            .ok_or_else(|| RosterError::new(RosterErrorKind::AdminNotFound))?;
        if stored.is_main {
            return Err(RosterError::new(RosterErrorKind::CannotRemoveMain).into());
        }
        self.store.delete_admin(target).await?;
        info!(target, requester, "admin removed");
        Ok(())
    }

    /// Display preference for rendering user listings to this admin.
    #[instrument(skip(self))]
    pub async fn display_mode(&self, admin_id: i64) -> TallyResult<DisplayMode> {
        self.store.display_mode(admin_id).await
    }

    /// Set an admin's display preference.
    #[instrument(skip(self))]
    pub async fn set_display_mode(&self, admin_id: i64, mode: DisplayMode) -> TallyResult<()> {
        self.store.set_display_mode(admin_id, mode).await
    }
}
