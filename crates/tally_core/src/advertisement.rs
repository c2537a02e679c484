//! Broadcast advertisement payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A link button attached to an advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdButton {
    /// Visible label
    pub label: String,
    /// Target URL
    pub url: String,
}

impl AdButton {
    /// Parse a `label | url` line from the ad-creation conversation.
    ///
    /// Returns `None` when the separator is missing or either side is empty.
    pub fn parse(line: &str) -> Option<Self> {
        let (label, url) = line.split_once('|')?;
        let label = label.trim();
        let url = url.trim();
        if label.is_empty() || url.is_empty() {
            return None;
        }
        Some(Self {
            label: label.to_string(),
            url: url.to_string(),
        })
    }
}

/// A named, repeatedly-resent broadcast payload.
///
/// Persisted as an ordered flat list in a JSON file, outside the relational
/// ledger. The name is the unique key; one delivery task runs per
/// advertisement, keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advertisement {
    /// Unique name
    pub name: String,
    /// Body text; rich-text markup passes through opaquely
    pub text: String,
    /// Ordered link buttons
    #[serde(default)]
    pub buttons: Vec<AdButton>,
    /// Seconds between resends; never below the configured minimum
    pub interval_secs: u64,
    /// Completion time of the most recent full send pass
    #[serde(default)]
    pub last_sent: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_line_parses_and_trims() {
        let button = AdButton::parse(" Join now | https://example.com/promo ").unwrap();
        assert_eq!(button.label, "Join now");
        assert_eq!(button.url, "https://example.com/promo");
    }

    #[test]
    fn button_line_without_separator_is_rejected() {
        assert!(AdButton::parse("Join now https://example.com").is_none());
        assert!(AdButton::parse("| https://example.com").is_none());
        assert!(AdButton::parse("Join |").is_none());
    }

    #[test]
    fn advertisement_round_trips_through_json() {
        let ad = Advertisement {
            name: "promo".to_string(),
            text: "<b>Sale!</b>".to_string(),
            buttons: vec![AdButton {
                label: "Shop".to_string(),
                url: "https://example.com".to_string(),
            }],
            interval_secs: 3600,
            last_sent: None,
        };
        let json = serde_json::to_string(&ad).unwrap();
        let back: Advertisement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ad);
    }
}
