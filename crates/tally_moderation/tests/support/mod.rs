//! Shared doubles for the moderation engine tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use tally_interface::{DeliveryFailure, Notifier};

/// Records every notice instead of delivering it.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, user_id: i64, text: &str) -> Result<(), DeliveryFailure> {
        self.sent.lock().push((user_id, text.to_string()));
        Ok(())
    }
}
