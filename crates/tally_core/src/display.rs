//! Per-admin user-list display preference.

/// How user rows are rendered in paged admin listings.
///
/// Stored per admin; `UserId` is the default when no preference row exists.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum DisplayMode {
    /// Show the raw account identifier
    #[default]
    UserId,
    /// Show the transport nickname
    Nickname,
    /// Show identifier and nickname
    Both,
}
