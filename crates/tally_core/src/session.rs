//! Per-admin session state machine.
//!
//! Replaces ad hoc "awaiting X" scratch flags with an explicit value
//! attached to the admin's session. Transitions are driven by the next
//! inbound event, and `cancel` returns to `Idle` from every state.

use crate::{AdButton, Advertisement};

/// What the next free-text input from an admin means.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AdminSession {
    /// No conversation in flight
    #[default]
    Idle,
    /// Next input is the identifier of a new delegated admin
    AwaitingAdminId,
    /// Next input is the reply body for a support message
    AwaitingReply {
        /// Message being answered
        message_id: i32,
    },
    /// Walking the advertisement-creation conversation
    AwaitingAdBody(AdDraft),
}

impl AdminSession {
    /// Enter the add-admin conversation.
    pub fn begin_add_admin(self) -> Self {
        AdminSession::AwaitingAdminId
    }

    /// Enter the reply conversation for one message.
    pub fn begin_reply(self, message_id: i32) -> Self {
        AdminSession::AwaitingReply { message_id }
    }

    /// Enter the advertisement-creation conversation.
    pub fn begin_ad_draft(self) -> Self {
        AdminSession::AwaitingAdBody(AdDraft::new())
    }

    /// Abandon whatever conversation is in flight.
    pub fn cancel(self) -> Self {
        AdminSession::Idle
    }
}

/// Step of the advertisement-creation conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdDraftStep {
    /// Waiting for the unique name
    Name,
    /// Waiting for the body text
    Text,
    /// Collecting `label | url` button lines until `done` / `skip`
    Buttons,
    /// Waiting for the resend interval in seconds
    Interval,
}

/// Why a draft input was rejected.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum DraftIssue {
    /// Empty name input
    #[display("Name must not be empty")]
    EmptyName,
    /// Button line did not match `label | url`
    #[display("Button must be 'label | url'")]
    MalformedButton,
    /// Interval input was not a number
    #[display("Interval must be a number of seconds")]
    MalformedInterval,
    /// Interval below the configured minimum
    #[display("Interval must be at least {} seconds", _0)]
    IntervalTooShort(u64),
}

/// Accumulating advertisement draft.
#[derive(Debug, Clone, PartialEq)]
pub struct AdDraft {
    step: AdDraftStep,
    name: Option<String>,
    text: Option<String>,
    buttons: Vec<AdButton>,
}

/// Outcome of feeding one input line to a draft.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftProgress {
    /// Input accepted, more steps remain
    Continue(AdDraft),
    /// Conversation finished; the advertisement is ready to create
    Complete(Advertisement),
    /// Input rejected; the draft stays on the same step
    Invalid {
        /// The unchanged draft
        draft: AdDraft,
        /// What was wrong with the input
        issue: DraftIssue,
    },
}

impl Default for AdDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl AdDraft {
    /// Start a fresh draft at the name step.
    pub fn new() -> Self {
        Self {
            step: AdDraftStep::Name,
            name: None,
            text: None,
            buttons: Vec::new(),
        }
    }

    /// Current conversation step.
    pub fn step(&self) -> AdDraftStep {
        self.step
    }

    /// Feed the next input line to the draft.
    ///
    /// Duplicate-name rejection happens later, at store-create time; the
    /// draft only enforces local shape (non-empty name, button grammar,
    /// numeric interval ≥ `minimum_interval_secs`).
    pub fn offer(mut self, input: &str, minimum_interval_secs: u64) -> DraftProgress {
        let input = input.trim();
        match self.step {
            AdDraftStep::Name => {
                if input.is_empty() {
                    return DraftProgress::Invalid {
                        draft: self,
                        issue: DraftIssue::EmptyName,
                    };
                }
                self.name = Some(input.to_string());
                self.step = AdDraftStep::Text;
                DraftProgress::Continue(self)
            }
            AdDraftStep::Text => {
                self.text = Some(input.to_string());
                self.step = AdDraftStep::Buttons;
                DraftProgress::Continue(self)
            }
            AdDraftStep::Buttons => {
                let lowered = input.to_lowercase();
                if lowered == "done" || lowered == "skip" {
                    self.step = AdDraftStep::Interval;
                    return DraftProgress::Continue(self);
                }
                match AdButton::parse(input) {
                    Some(button) => {
                        self.buttons.push(button);
                        DraftProgress::Continue(self)
                    }
                    None => DraftProgress::Invalid {
                        draft: self,
                        issue: DraftIssue::MalformedButton,
                    },
                }
            }
            AdDraftStep::Interval => {
                let Ok(interval_secs) = input.parse::<u64>() else {
                    return DraftProgress::Invalid {
                        draft: self,
                        issue: DraftIssue::MalformedInterval,
                    };
                };
                if interval_secs < minimum_interval_secs {
                    return DraftProgress::Invalid {
                        draft: self,
                        issue: DraftIssue::IntervalTooShort(minimum_interval_secs),
                    };
                }
                let name = self.name.take().unwrap_or_default();
                let text = self.text.take().unwrap_or_default();
                DraftProgress::Complete(Advertisement {
                    name,
                    text,
                    buttons: self.buttons,
                    interval_secs,
                    last_sent: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: u64 = 60;

    fn advance(draft: AdDraft, input: &str) -> AdDraft {
        match draft.offer(input, MIN) {
            DraftProgress::Continue(next) => next,
            other => panic!("expected Continue, got {other:?}"),
        }
    }

    #[test]
    fn full_walk_builds_an_advertisement() {
        let draft = AdDraft::new();
        let draft = advance(draft, "Summer Promo");
        let draft = advance(draft, "<b>Sale!</b>");
        let draft = advance(draft, "Shop | https://example.com");
        let draft = advance(draft, "done");
        match draft.offer("3600", MIN) {
            DraftProgress::Complete(ad) => {
                assert_eq!(ad.name, "Summer Promo");
                assert_eq!(ad.buttons.len(), 1);
                assert_eq!(ad.interval_secs, 3600);
                assert!(ad.last_sent.is_none());
            }
            other => panic!("expected Complete, got {other:?}"),
        }
    }

    #[test]
    fn skip_bypasses_buttons() {
        let draft = advance(advance(AdDraft::new(), "promo"), "text");
        let draft = advance(draft, "SKIP");
        assert_eq!(draft.step(), AdDraftStep::Interval);
    }

    #[test]
    fn bad_button_keeps_the_step() {
        let draft = advance(advance(AdDraft::new(), "promo"), "text");
        match draft.offer("no separator here", MIN) {
            DraftProgress::Invalid { draft, issue } => {
                assert_eq!(issue, DraftIssue::MalformedButton);
                assert_eq!(draft.step(), AdDraftStep::Buttons);
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn short_interval_is_rejected() {
        let draft = advance(advance(AdDraft::new(), "promo"), "text");
        let draft = advance(draft, "done");
        match draft.offer("30", MIN) {
            DraftProgress::Invalid { issue, .. } => {
                assert_eq!(issue, DraftIssue::IntervalTooShort(MIN));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn cancel_returns_to_idle_from_every_state() {
        assert_eq!(AdminSession::Idle.cancel(), AdminSession::Idle);
        assert_eq!(AdminSession::AwaitingAdminId.cancel(), AdminSession::Idle);
        assert_eq!(
            AdminSession::AwaitingReply { message_id: 7 }.cancel(),
            AdminSession::Idle
        );
        assert_eq!(
            AdminSession::Idle.begin_ad_draft().cancel(),
            AdminSession::Idle
        );
    }
}
