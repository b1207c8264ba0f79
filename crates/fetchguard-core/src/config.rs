use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime configuration loaded from `~/.config/fetchguard/config.toml`.
///
/// Only collaborators are tunable here. The classification table is compiled
/// in and has no configuration surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Upper bound on one DNS lookup, in milliseconds. Must be non-zero.
    pub resolve_timeout_ms: u64,
    /// Maximum redirects the fetcher follows (each one revalidated).
    pub max_redirects: u32,
    /// Fetcher connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Fetcher total timeout per hop in seconds.
    pub request_timeout_secs: u64,
    /// User-Agent sent by the fetcher.
    pub user_agent: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            resolve_timeout_ms: 3000,
            max_redirects: 5,
            connect_timeout_secs: 10,
            request_timeout_secs: 20,
            user_agent: format!("fetchguard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GuardConfig {
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject values that would disable a bound.
    pub fn check(&self) -> Result<()> {
        if self.resolve_timeout_ms == 0 {
            bail!("resolve_timeout_ms must be greater than zero");
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            bail!("fetcher timeouts must be greater than zero");
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fetchguard")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GuardConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = GuardConfig::default();
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

/// Load and check configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<GuardConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: GuardConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    cfg.check()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
