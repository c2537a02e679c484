//! Shared doubles and scratch-file helpers for the broadcast tests.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use parking_lot::Mutex;
use tally_core::Advertisement;
use tally_interface::{AdSender, DeliveryFailure};

static SCRATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A unique throwaway path for one test's advertisement file.
pub fn scratch_path(tag: &str) -> PathBuf {
    let n = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("tally_ads_{tag}_{}_{n}.json", std::process::id()))
}

/// Records every delivery instead of sending it.
#[derive(Debug, Default)]
pub struct CountingSender {
    sent: Mutex<Vec<(i64, String)>>,
}

impl CountingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl AdSender for CountingSender {
    async fn send_ad(&self, user_id: i64, ad: &Advertisement) -> Result<(), DeliveryFailure> {
        self.sent.lock().push((user_id, ad.name.clone()));
        Ok(())
    }
}
