use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::retry::RetryPolicy;

pub const CONFIG_ENV: &str = "ENCYCLOPEDIAN_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_attempts: u32,
    pub random_attempts: u32,
    pub retry_delay_ms: u64,
    pub link_limit: u32,
    pub category_limit: u32,
    pub random_min_size: u32,
    pub serendipity_pool: u32,
    pub serendipity_min_size: u32,
    pub image_cache_capacity: u64,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "https://en.wikipedia.org/w/api.php".to_string(),
            user_agent: format!("encyclopedian/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 15,
            max_attempts: 3,
            random_attempts: 3,
            retry_delay_ms: 1000,
            link_limit: 50,
            category_limit: 50,
            random_min_size: 3000,
            serendipity_pool: 20,
            serendipity_min_size: 1000,
            image_cache_capacity: 50,
            seed: None,
        }
    }
}

impl Config {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.retry_delay_ms))
    }

    pub fn random_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.random_attempts, Duration::from_millis(self.retry_delay_ms))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("parsing config TOML")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("in {}", path.display()))
    }

    /// Apply `ENCYCLOPEDIAN_*` overrides using `lookup` for variable values.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ENCYCLOPEDIAN_API_BASE") {
            self.api_base = v;
        }
        if let Some(v) = lookup("ENCYCLOPEDIAN_SEED") {
            self.seed = Some(v.parse().context("ENCYCLOPEDIAN_SEED must be an integer")?);
        }
        if let Some(v) = lookup("ENCYCLOPEDIAN_MAX_ATTEMPTS") {
            self.max_attempts = v
                .parse()
                .context("ENCYCLOPEDIAN_MAX_ATTEMPTS must be an integer")?;
        }
        if let Some(v) = lookup("ENCYCLOPEDIAN_RETRY_DELAY_MS") {
            self.retry_delay_ms = v
                .parse()
                .context("ENCYCLOPEDIAN_RETRY_DELAY_MS must be an integer")?;
        }
        Ok(())
    }
}

/// Resolve the config: explicit path > `ENCYCLOPEDIAN_CONFIG` > defaults,
/// then environment overrides on top.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let path: Option<PathBuf> = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));

    let mut cfg = match path {
        Some(p) => {
            // Friendlier error if missing
            if !p.exists() {
                anyhow::bail!(
                    "config not found at {}\n\
                     Pass --config or set {CONFIG_ENV}. Example config.toml:\n\
                     api_base = \"https://en.wikipedia.org/w/api.php\"\n\
                     max_attempts = 3\nretry_delay_ms = 1000\n",
                    p.display()
                );
            }
            debug!("Using config file: {}", p.display());
            Config::from_file(&p)?
        }
        None => {
            debug!("No config file, using defaults");
            Config::default()
        }
    };

    cfg.apply_overrides(|k| std::env::var(k).ok())?;
    Ok(cfg)
}
