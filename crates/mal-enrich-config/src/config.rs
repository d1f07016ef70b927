use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Rate-limit budget and pacing for one upstream service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceLimits {
    pub requests_per_window: u32,
    pub window_secs: u64,
    /// Fixed inter-request delay applied on top of the token bucket.
    pub pacing_ms: u64,
}

impl ServiceLimits {
    /// Trakt allows 1000 requests per 5 minutes.
    pub fn trakt() -> Self {
        Self {
            requests_per_window: 1000,
            window_secs: 300,
            pacing_ms: 500,
        }
    }

    /// Letterboxd is unauthenticated; stay well under 100 per minute.
    pub fn letterboxd() -> Self {
        Self {
            requests_per_window: 100,
            window_secs: 60,
            pacing_ms: 500,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub initial_backoff_secs: u64,
    pub max_backoff_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_secs: 1,
            max_backoff_secs: 32,
        }
    }
}

/// Optional operator tuning loaded from `config.toml`. Every field has a
/// default, so a missing file yields a fully usable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "ServiceLimits::trakt")]
    pub trakt: ServiceLimits,
    #[serde(default = "ServiceLimits::letterboxd")]
    pub letterboxd: ServiceLimits,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trakt: ServiceLimits::trakt(),
            letterboxd: ServiceLimits::letterboxd(),
            retry: RetrySettings::default(),
            cache_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file
    /// does not exist. A file that exists but fails to parse is an error:
    /// silently ignoring operator config would be worse than aborting.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using default settings");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Scratch directory for the response cache.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("trakt_data"))
    }
}

/// Assembled, read-only configuration for a single run. Built by the CLI
/// from flags, environment, and `Settings`; the core never reads flags or
/// the environment itself.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub api_key: String,
    pub tv_file: Option<PathBuf>,
    pub movie_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub force: bool,
    pub no_progress: bool,
    pub settings: Settings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings.trakt.requests_per_window, 1000);
        assert_eq!(settings.letterboxd.window_secs, 60);
        assert_eq!(settings.retry.max_retries, 3);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[retry]\nmax_retries = 5\ninitial_backoff_secs = 2\nmax_backoff_secs = 60\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.retry.max_retries, 5);
        assert_eq!(settings.trakt.pacing_ms, 500);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid toml [[").unwrap();
        assert!(Settings::load(&path).is_err());
    }
}
