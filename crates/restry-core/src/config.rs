use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::method::HttpMethod;
use crate::retry::{Backoff, RetryPolicy};

/// Retry policy parameters (optional `[retry]` section in config.toml).
/// Missing keys take the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per call (including the first).
    pub max_attempts: u32,
    /// Retry HTTP 429 responses.
    pub retry_rate_limited: bool,
    /// Retry transport failures (connection errors, timeouts).
    pub retry_transport_errors: bool,
    /// Methods eligible for transport retries; replaces the default list.
    pub retry_transport_methods: Vec<HttpMethod>,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
    /// Randomize each delay upwards by up to 20%.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        let backoff = policy.backoff();
        Self {
            max_attempts: policy.max_attempts(),
            retry_rate_limited: policy.retry_rate_limited(),
            retry_transport_errors: policy.retry_transport_errors(),
            retry_transport_methods: policy.retry_transport_methods().iter().copied().collect(),
            base_delay_secs: backoff.base_delay.as_secs_f64(),
            max_delay_secs: backoff.max_delay.as_secs(),
            jitter: backoff.jitter,
        }
    }
}

impl RetryConfig {
    /// Reject delays that cannot form a backoff schedule.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.base_delay_secs.is_finite() && self.base_delay_secs >= 0.0,
            "retry.base_delay_secs must be a non-negative number, got {}",
            self.base_delay_secs
        );
        anyhow::ensure!(
            self.base_delay_secs <= self.max_delay_secs as f64,
            "retry.base_delay_secs ({}) exceeds retry.max_delay_secs ({})",
            self.base_delay_secs,
            self.max_delay_secs
        );
        Ok(())
    }

    /// Build the policy. Out-of-range delays fall back to the defaults;
    /// call `validate` first to report them instead.
    pub fn to_policy(&self) -> RetryPolicy {
        let defaults = Backoff::default();
        let backoff = Backoff {
            base_delay: Duration::try_from_secs_f64(self.base_delay_secs)
                .unwrap_or(defaults.base_delay),
            max_delay: Duration::from_secs(self.max_delay_secs),
            jitter: self.jitter,
        };
        RetryPolicy::default()
            .with_max_attempts(self.max_attempts)
            .with_retry_rate_limited(self.retry_rate_limited)
            .with_retry_transport_errors(self.retry_transport_errors)
            .with_retry_transport_methods(self.retry_transport_methods.iter().copied())
            .with_backoff(backoff)
    }
}

/// Global configuration loaded from `~/.config/restry/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestryConfig {
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl RestryConfig {
    /// Effective retry policy (the default policy when `[retry]` is absent).
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfig::to_policy)
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        match &self.retry {
            Some(r) => r.validate(),
            None => Ok(()),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("restry")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load and validate configuration from `path`.
pub fn load_from(path: &Path) -> Result<RestryConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: RestryConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RestryConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RestryConfig {
            retry: Some(RetryConfig::default()),
        };
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}
