use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Minutes-before lead for the first reminder stage, in seconds.
pub const DEFAULT_LEAD_SECS: i64 = 900;
/// Cadence of the reconciliation poll, in seconds.
pub const DEFAULT_POLL_SECS: u64 = 60;
/// Upper bound on a single outbound notification delivery.
pub const DEFAULT_NOTIFY_TIMEOUT_MS: u64 = 10_000;

/// Top-level config (orbis.toml + ORBIS_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbisConfig {
    #[serde(default)]
    pub agenda: AgendaConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
}

impl Default for OrbisConfig {
    fn default() -> Self {
        Self {
            agenda: AgendaConfig::default(),
            reminders: ReminderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaConfig {
    /// Path of the JSON snapshot the appointment store loads and saves.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Seconds before an appointment at which the early notification fires.
    #[serde(default = "default_lead_secs")]
    pub lead_secs: i64,
    /// Seconds between reconciliation polls of the upcoming window.
    #[serde(default = "default_poll_secs")]
    pub poll_interval_secs: u64,
    /// Milliseconds allowed for one notification delivery before it is dropped.
    #[serde(default = "default_notify_timeout_ms")]
    pub notify_timeout_ms: u64,
    /// Destination chat for poller-driven notifications, when configured.
    pub default_chat_id: Option<i64>,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            lead_secs: DEFAULT_LEAD_SECS,
            poll_interval_secs: DEFAULT_POLL_SECS,
            notify_timeout_ms: DEFAULT_NOTIFY_TIMEOUT_MS,
            default_chat_id: None,
        }
    }
}

fn default_snapshot_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.orbis/agenda.json", home)
}
fn default_lead_secs() -> i64 {
    DEFAULT_LEAD_SECS
}
fn default_poll_secs() -> u64 {
    DEFAULT_POLL_SECS
}
fn default_notify_timeout_ms() -> u64 {
    DEFAULT_NOTIFY_TIMEOUT_MS
}

impl OrbisConfig {
    /// Load config from a TOML file with ORBIS_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.orbis/orbis.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: OrbisConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("ORBIS_").split("_"))
            .extract()
            .map_err(|e| crate::error::OrbisError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.orbis/orbis.toml", home)
}
