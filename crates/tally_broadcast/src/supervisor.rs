//! One long-lived delivery task per advertisement.

use crate::AdStore;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tally_core::Advertisement;
use tally_error::TallyResult;
use tally_interface::{AdSender, LedgerStore};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

struct TaskHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

/// Owns the running advertisement tasks, keyed by advertisement name.
///
/// Each task sends the payload to every registered user with a pacing
/// delay between recipients, then sleeps the advertisement's interval.
/// Shutdown is cooperative: the signal is observed between sends and at
/// the sleep boundary, never mid-send. Tasks only read the user set; they
/// never mutate the ledger.
pub struct AdSupervisor {
    store: Arc<AdStore>,
    ledger: Arc<dyn LedgerStore>,
    sender: Arc<dyn AdSender>,
    pacing: Duration,
    tasks: Mutex<HashMap<String, TaskHandle>>,
}

impl AdSupervisor {
    /// Create a supervisor with no running tasks.
    pub fn new(
        store: Arc<AdStore>,
        ledger: Arc<dyn LedgerStore>,
        sender: Arc<dyn AdSender>,
        pacing: Duration,
    ) -> Self {
        Self {
            store,
            ledger,
            sender,
            pacing,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Validate, persist, and start delivering a new advertisement.
    #[instrument(skip(self, ad), fields(name = %ad.name))]
    pub fn create(&self, ad: Advertisement) -> TallyResult<()> {
        self.store.create(ad.clone())?;
        self.start(ad);
        Ok(())
    }

    /// Stop delivery and delete the advertisement.
    ///
    /// The record is gone either way; a task that was never running is a
    /// silent no-op on the supervisor side.
    #[instrument(skip(self))]
    pub fn remove(&self, name: &str) -> TallyResult<Advertisement> {
        let removed = self.store.remove(name)?;
        self.stop(name);
        Ok(removed)
    }

    /// Start one delivery task for an already-persisted advertisement.
    ///
    /// A task already running under the same name is signalled to stop
    /// first; the replacement owns the name from here on.
    pub fn start(&self, ad: Advertisement) {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let name = ad.name.clone();
        let join = tokio::spawn(delivery_loop(
            ad,
            self.store.clone(),
            self.ledger.clone(),
            self.sender.clone(),
            self.pacing,
            shutdown_rx,
        ));
        let previous = self
            .tasks
            .lock()
            .insert(name.clone(), TaskHandle { shutdown, join });
        if let Some(previous) = previous {
            previous.shutdown.send(true).ok();
        }
        info!(name, "advertisement task started");
    }

    /// Signal one task to stop at its next cancellation point.
    ///
    /// Returns the task's join handle so a caller that needs the in-flight
    /// send drained can await it; `None` when no task ran under that name.
    pub fn stop(&self, name: &str) -> Option<JoinHandle<()>> {
        let handle = self.tasks.lock().remove(name)?;
        handle.shutdown.send(true).ok();
        info!(name, "advertisement task stopped");
        Some(handle.join)
    }

    /// Start a task for every persisted advertisement. Called on boot.
    #[instrument(skip(self))]
    pub fn resume_all(&self) {
        for ad in self.store.list() {
            self.start(ad);
        }
    }

    /// Signal every task to stop and forget the handles.
    pub fn shutdown(&self) {
        let mut tasks = self.tasks.lock();
        for (name, handle) in tasks.drain() {
            handle.shutdown.send(true).ok();
            info!(name, "advertisement task stopped");
        }
    }

    /// Names of the currently running tasks.
    pub fn running(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tasks.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

async fn delivery_loop(
    ad: Advertisement,
    store: Arc<AdStore>,
    ledger: Arc<dyn LedgerStore>,
    sender: Arc<dyn AdSender>,
    pacing: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let interval = Duration::from_secs(ad.interval_secs);
    loop {
        let ids = match ledger.user_ids().await {
            Ok(ids) => ids,
            Err(err) => {
                warn!(name = %ad.name, %err, "user set unavailable, skipping pass");
                Vec::new()
            }
        };
        for id in ids {
            if *shutdown.borrow() {
                return;
            }
            if let Err(failure) = sender.send_ad(id, &ad).await {
                warn!(name = %ad.name, id, %failure, "advertisement undelivered");
            }
            tokio::time::sleep(pacing).await;
        }
        if let Err(err) = store.record_sent(&ad.name, Utc::now()) {
            warn!(name = %ad.name, %err, "could not stamp send pass");
        }

        tokio::select! {
            changed = shutdown.changed() => {
                // A dropped supervisor also lands here and stops the task.
                if changed.is_err() || *shutdown.borrow() {
                    return;
                }
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
