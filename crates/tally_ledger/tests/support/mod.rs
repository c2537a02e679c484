//! Shared doubles for the ledger engine tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use tally_interface::{DeliveryFailure, Notifier};

/// Records every notice instead of delivering it.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(i64, String)>>,
    failing: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent delivery attempt fail.
    pub fn fail_deliveries(&self) {
        *self.failing.lock() = true;
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, user_id: i64, text: &str) -> Result<(), DeliveryFailure> {
        if *self.failing.lock() {
            return Err(DeliveryFailure::new("transport unavailable"));
        }
        self.sent.lock().push((user_id, text.to_string()));
        Ok(())
    }
}

/// Counts progress ticks.
#[derive(Debug, Default)]
pub struct TickCounter {
    ticks: Mutex<Vec<(u32, u32)>>,
}

impl TickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticks(&self) -> Vec<(u32, u32)> {
        self.ticks.lock().clone()
    }
}

#[async_trait]
impl tally_ledger::ProgressSink for TickCounter {
    async fn step(&self, current: u32, total: u32) {
        self.ticks.lock().push((current, total));
    }
}
