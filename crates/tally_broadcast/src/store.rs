//! Flat-file advertisement persistence.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use tally_core::Advertisement;
use tally_error::{BroadcastError, BroadcastErrorKind, TallyResult};
use tracing::{info, instrument};

/// The advertisement store: an ordered JSON array in one flat file.
///
/// Every mutation rewrites the whole file under the store lock, so the
/// on-disk list always matches the in-memory one. The file holds few
/// records; rewriting it is cheaper than meriting a table.
pub struct AdStore {
    path: PathBuf,
    ads: Mutex<Vec<Advertisement>>,
    minimum_interval_secs: u64,
}

fn persistence(err: impl std::fmt::Display) -> BroadcastError {
    BroadcastError::new(BroadcastErrorKind::Persistence(err.to_string()))
}

impl AdStore {
    /// Open the store at `path`, loading any existing file.
    ///
    /// A missing file is an empty store; an unreadable or unparsable file
    /// is a startup failure.
    #[instrument]
    pub fn open(path: impl AsRef<Path> + std::fmt::Debug, minimum_interval_secs: u64) -> TallyResult<Self> {
        let path = path.as_ref().to_path_buf();
        let ads = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(persistence)?;
            serde_json::from_str(&raw).map_err(persistence)?
        } else {
            Vec::new()
        };
        Ok(Self {
            path,
            ads: Mutex::new(ads),
            minimum_interval_secs,
        })
    }

    /// Create an advertisement and persist the list.
    #[instrument(skip(self, ad), fields(name = %ad.name))]
    pub fn create(&self, ad: Advertisement) -> TallyResult<()> {
        if ad.interval_secs < self.minimum_interval_secs {
            return Err(BroadcastError::new(BroadcastErrorKind::IntervalTooShort {
                interval_secs: ad.interval_secs,
                minimum_secs: self.minimum_interval_secs,
            })
            .into());
        }
        let mut ads = self.ads.lock();
        if ads.iter().any(|existing| existing.name == ad.name) {
            return Err(
                BroadcastError::new(BroadcastErrorKind::DuplicateName(ad.name.clone())).into(),
            );
        }
        ads.push(ad);
        self.persist(&ads)?;
        info!("advertisement created");
        Ok(())
    }

    /// Remove an advertisement by name and persist the list.
    #[instrument(skip(self))]
    pub fn remove(&self, name: &str) -> TallyResult<Advertisement> {
        let mut ads = self.ads.lock();
        let position = ads
            .iter()
            .position(|ad| ad.name == name)
            .ok_or_else(|| {
                BroadcastError::new(BroadcastErrorKind::AdNotFound(name.to_string()))
            })?;
        let removed = ads.remove(position);
        self.persist(&ads)?;
        info!(name, "advertisement removed");
        Ok(removed)
    }

    /// Fetch an advertisement by name.
    pub fn get(&self, name: &str) -> Option<Advertisement> {
        self.ads.lock().iter().find(|ad| ad.name == name).cloned()
    }

    /// The full ordered list.
    pub fn list(&self) -> Vec<Advertisement> {
        self.ads.lock().clone()
    }

    /// Stamp the completion time of a full send pass.
    ///
    /// A name that was removed mid-pass is a silent no-op.
    pub fn record_sent(&self, name: &str, when: DateTime<Utc>) -> TallyResult<()> {
        let mut ads = self.ads.lock();
        let Some(ad) = ads.iter_mut().find(|ad| ad.name == name) else {
            return Ok(());
        };
        ad.last_sent = Some(when);
        self.persist(&ads)
    }

    fn persist(&self, ads: &[Advertisement]) -> TallyResult<()> {
        let json = serde_json::to_string_pretty(ads).map_err(persistence)?;
        fs::write(&self.path, json).map_err(persistence)?;
        Ok(())
    }
}
