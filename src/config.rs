//! Application-level configuration loading for the background job knobs.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "JAMVOTE_BACK_CONFIG_PATH";
/// Interval between automatic backup rounds when the config does not say otherwise.
const DEFAULT_BACKUP_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);
/// Interval between prune sweeps when the config does not say otherwise.
const DEFAULT_PRUNE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
/// Age in days past which automatic snapshots become prunable.
const DEFAULT_RETENTION_DAYS: u32 = 30;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    backup_interval: Duration,
    prune_interval: Duration,
    backup_retention: Duration,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        backup_interval_secs = app_config.backup_interval.as_secs(),
                        prune_interval_secs = app_config.prune_interval.as_secs(),
                        retention_days = app_config.backup_retention.as_secs() / SECONDS_PER_DAY,
                        "loaded scheduler settings from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// How often the automatic backup job runs.
    pub fn backup_interval(&self) -> Duration {
        self.backup_interval
    }

    /// How often the prune job runs.
    pub fn prune_interval(&self) -> Duration {
        self.prune_interval
    }

    /// How long automatic snapshots are kept before the prune job may delete them.
    pub fn backup_retention(&self) -> Duration {
        self.backup_retention
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backup_interval: DEFAULT_BACKUP_INTERVAL,
            prune_interval: DEFAULT_PRUNE_INTERVAL,
            backup_retention: retention_from_days(DEFAULT_RETENTION_DAYS),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    backup_interval_secs: Option<u64>,
    prune_interval_secs: Option<u64>,
    backup_retention_days: Option<u32>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            backup_interval: value
                .backup_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_BACKUP_INTERVAL),
            prune_interval: value
                .prune_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_PRUNE_INTERVAL),
            backup_retention: value
                .backup_retention_days
                .map(retention_from_days)
                .unwrap_or_else(|| retention_from_days(DEFAULT_RETENTION_DAYS)),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn retention_from_days(days: u32) -> Duration {
    Duration::from_secs(u64::from(days) * SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let raw: RawConfig = serde_json::from_str("{}").unwrap();
        let config: AppConfig = raw.into();

        assert_eq!(config.backup_interval(), DEFAULT_BACKUP_INTERVAL);
        assert_eq!(config.prune_interval(), DEFAULT_PRUNE_INTERVAL);
        assert_eq!(config.backup_retention(), retention_from_days(30));
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let raw: RawConfig = serde_json::from_str(
            r#"{"backup_interval_secs": 60, "prune_interval_secs": 120, "backup_retention_days": 7}"#,
        )
        .unwrap();
        let config: AppConfig = raw.into();

        assert_eq!(config.backup_interval(), Duration::from_secs(60));
        assert_eq!(config.prune_interval(), Duration::from_secs(120));
        assert_eq!(config.backup_retention(), Duration::from_secs(7 * 24 * 60 * 60));
    }
}
