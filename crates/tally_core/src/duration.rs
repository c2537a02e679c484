//! Mute duration tags and expiry arithmetic.

use chrono::NaiveDateTime;

/// Sentinel expiry encoding an indefinite mute.
///
/// Stored verbatim in the ledger; any comparison against a real clock reads
/// as "still muted".
pub const FOREVER: NaiveDateTime = NaiveDateTime::MAX;

/// Mute duration selected by an admin.
///
/// The wire tags (`1d`, `1w`, ...) match the legacy callback grammar.
///
/// # Examples
///
/// ```
/// use tally_core::MuteDuration;
/// use std::str::FromStr;
///
/// assert_eq!(MuteDuration::from_str("2w").unwrap(), MuteDuration::TwoWeeks);
/// assert_eq!(MuteDuration::Forever.to_string(), "forever");
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
pub enum MuteDuration {
    /// One day
    #[strum(serialize = "1d")]
    OneDay,
    /// Seven days
    #[strum(serialize = "1w")]
    OneWeek,
    /// Fourteen days
    #[strum(serialize = "2w")]
    TwoWeeks,
    /// Thirty days
    #[strum(serialize = "1m")]
    OneMonth,
    /// Indefinite; persists until explicit unmute
    #[strum(serialize = "forever")]
    Forever,
}

impl MuteDuration {
    /// Compute the mute expiry relative to `now`.
    pub fn expiry(self, now: NaiveDateTime) -> NaiveDateTime {
        let days = match self {
            MuteDuration::OneDay => 1,
            MuteDuration::OneWeek => 7,
            MuteDuration::TwoWeeks => 14,
            MuteDuration::OneMonth => 30,
            MuteDuration::Forever => return FOREVER,
        };
        now.checked_add_signed(chrono::Duration::days(days))
            .unwrap_or(FOREVER)
    }

    /// True for the indefinite variant.
    pub fn is_forever(self) -> bool {
        matches!(self, MuteDuration::Forever)
    }
}
