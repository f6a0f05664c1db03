use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use crate::errors::{NavError, Result};

pub const DEFAULT_SKIN: &str = "skin1";
pub const DEFAULT_CONFIG_FILE: &str = "pomnav.yaml";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Process-wide settings initialized once from environment variables.
///
/// Access via `Settings::get()`. CLI flags override individual fields on a
/// clone; the singleton itself never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// `POMNAV_SKIN`
    pub skin: String,
    /// `POMNAV_VARIABLES`
    pub variables_path: Option<PathBuf>,
    /// `POMNAV_CONFIG`
    pub config_path: PathBuf,
    /// `POMNAV_TIMEOUT`, in seconds.
    pub readiness_timeout: Duration,
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

impl Settings {
    pub fn get() -> &'static Settings {
        SETTINGS.get_or_init(|| Settings::from_lookup(|key| std::env::var(key).ok()))
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let readiness_timeout = match lookup("POMNAV_TIMEOUT") {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => parse_timeout(&raw).unwrap_or_else(|e| {
                tracing::warn!(
                    "{}; using the default of {}s",
                    e,
                    DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }),
        };

        Self {
            skin: lookup("POMNAV_SKIN")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SKIN.to_string()),
            variables_path: lookup("POMNAV_VARIABLES")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            config_path: lookup("POMNAV_CONFIG")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
            readiness_timeout,
        }
    }
}

/// Parse a `POMNAV_TIMEOUT` value in whole seconds.
pub fn parse_timeout(raw: &str) -> Result<Duration> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| {
            NavError::Config(format!(
                "POMNAV_TIMEOUT must be a whole number of seconds, got '{}'",
                raw
            ))
        })
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
