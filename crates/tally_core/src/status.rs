//! Support-message status.

/// Lifecycle status of a support message.
///
/// `Pending` is the only non-terminal state: a message moves to `Replied`
/// or `Ignored` exactly once and never back.
///
/// # Examples
///
/// ```
/// use tally_core::MessageStatus;
/// use std::str::FromStr;
///
/// assert_eq!(MessageStatus::Pending.to_string(), "pending");
/// assert_eq!(MessageStatus::from_str("replied").unwrap(), MessageStatus::Replied);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum MessageStatus {
    /// Awaiting admin action
    Pending,
    /// Answered by an admin; terminal
    Replied,
    /// Dismissed without reply; terminal
    Ignored,
}

impl MessageStatus {
    /// True once the message has left the pending state.
    pub fn is_terminal(self) -> bool {
        !matches!(self, MessageStatus::Pending)
    }
}
