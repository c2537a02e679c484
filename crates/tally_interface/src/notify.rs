//! Best-effort outbound delivery seams.

use async_trait::async_trait;
use tally_core::Advertisement;

/// A notification or broadcast send that did not reach its recipient.
///
/// Callers log this and move on: delivery failures are never retried,
/// never surfaced to the triggering actor, and never rolled back against
/// the primary state change they accompanied.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Delivery failed: {}", reason)]
pub struct DeliveryFailure {
    /// Transport-reported reason
    pub reason: String,
}

impl DeliveryFailure {
    /// Create a failure with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Sends a short text notice to one user.
///
/// Implemented by the messaging transport; engines call this after their
/// primary mutation has committed.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempt to deliver `text` to `user_id`.
    async fn notify(&self, user_id: i64, text: &str) -> Result<(), DeliveryFailure>;
}

/// Delivers one advertisement payload to one user.
#[async_trait]
pub trait AdSender: Send + Sync {
    /// Attempt to deliver `ad` to `user_id`.
    async fn send_ad(&self, user_id: i64, ad: &Advertisement) -> Result<(), DeliveryFailure>;
}
