//! TOML configuration for a tally deployment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tally_error::{ConfigError, TallyResult};

/// Top-level deployment configuration.
///
/// Every field and section is optional in the file; omitted values fall
/// back to the defaults the ledger has always shipped with.
///
/// # Examples
///
/// ```
/// use tally::TallyConfig;
///
/// let config: TallyConfig = toml::from_str(
///     r#"
///     super_admins = [1]
///
///     [ledger]
///     withdrawal_minimum = 10000
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.super_admins, vec![1]);
/// assert_eq!(config.ledger.withdrawal_minimum, 10000);
/// assert_eq!(config.ledger.starting_points, 5000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TallyConfig {
    /// Fixed main-admin identifiers; never stored in the roster table
    #[serde(default)]
    pub super_admins: Vec<i64>,
    /// Balance and withdrawal tuning
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Message gate tuning
    #[serde(default)]
    pub moderation: ModerationConfig,
    /// Advertisement tuning
    #[serde(default)]
    pub broadcast: BroadcastConfig,
}

impl TallyConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> TallyResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!("could not read {}: {e}", path.display()))
        })?;
        let config = toml::from_str(&raw).map_err(|e| {
            ConfigError::new(format!("could not parse {}: {e}", path.display()))
        })?;
        Ok(config)
    }
}

/// Balance and withdrawal settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Points granted on registration
    pub starting_points: i64,
    /// Points credited to a referrer per successful referral
    pub referral_reward: i64,
    /// Minimum balance for a withdrawal
    pub withdrawal_minimum: i64,
    /// Number of withdrawal progress ticks
    pub progress_steps: u32,
    /// Delay between progress ticks, in milliseconds
    pub progress_step_delay_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            starting_points: 5000,
            referral_reward: 1500,
            withdrawal_minimum: 6500,
            progress_steps: 5,
            progress_step_delay_ms: 3000,
        }
    }
}

impl LedgerConfig {
    /// The tick delay as a [`Duration`].
    pub fn progress_step_delay(&self) -> Duration {
        Duration::from_millis(self.progress_step_delay_ms)
    }
}

/// Message gate settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Maximum support-message length in characters
    pub max_message_len: usize,
    /// Rows per page in admin listings
    pub page_size: i64,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            max_message_len: 300,
            page_size: tally_core::PAGE_SIZE,
        }
    }
}

/// Advertisement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Flat file holding the advertisement list
    pub ads_path: PathBuf,
    /// Delay between recipients within one send pass, in milliseconds
    pub pacing_delay_ms: u64,
    /// Smallest accepted resend interval, in seconds
    pub minimum_interval_secs: u64,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            ads_path: PathBuf::from("advertisements.json"),
            pacing_delay_ms: 50,
            minimum_interval_secs: 60,
        }
    }
}

impl BroadcastConfig {
    /// The pacing delay as a [`Duration`].
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }
}
