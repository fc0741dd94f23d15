use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::filename::percent_decode;

/// Object storage provider credentials and endpoint.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Cloud (account) name used in API paths.
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Admin/upload API base, without trailing `/v1_1`.
    pub api_base_url: String,
    /// Connect timeout for each provider call, in seconds.
    pub connect_timeout_secs: u64,
    /// Total timeout for each provider call, in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            api_base_url: "https://api.cloudinary.com".to_string(),
            connect_timeout_secs: 15,
            timeout_secs: 120,
        }
    }
}

impl ProviderConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_credentials(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

// Keeps the secret out of `{:?}` log lines.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &if self.api_secret.is_empty() { "" } else { "***" })
            .field("api_base_url", &self.api_base_url)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Global configuration loaded from `~/.config/docfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocfetchConfig {
    /// Address the HTTP endpoint binds to.
    pub bind_address: String,
    /// Stored document URLs must have this host or a subdomain of it.
    pub host_suffix: String,
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Default for DocfetchConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            host_suffix: "cloudinary.com".to_string(),
            provider: ProviderConfig::default(),
        }
    }
}

impl DocfetchConfig {
    /// Applies environment overrides. `CLOUDINARY_URL` is read first so the
    /// individual `CLOUDINARY_*` variables can refine it.
    ///
    /// `lookup` is `std::env::var(..).ok()` in production; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(cloudinary_url) = get("CLOUDINARY_URL") {
            self.apply_cloudinary_url(&cloudinary_url)?;
        }
        if let Some(v) = get("CLOUDINARY_CLOUD_NAME") {
            self.provider.cloud_name = v;
        }
        if let Some(v) = get("CLOUDINARY_API_KEY") {
            self.provider.api_key = v;
        }
        if let Some(v) = get("CLOUDINARY_API_SECRET") {
            self.provider.api_secret = v;
        }
        if let Some(v) = get("DOCFETCH_BIND") {
            self.bind_address = v;
        }
        Ok(())
    }

    /// `cloudinary://<api_key>:<api_secret>@<cloud_name>`
    fn apply_cloudinary_url(&mut self, value: &str) -> Result<()> {
        let parsed = url::Url::parse(value.trim()).context("parse CLOUDINARY_URL")?;
        if parsed.scheme() != "cloudinary" {
            anyhow::bail!("CLOUDINARY_URL must use the cloudinary:// scheme");
        }
        let cloud = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .context("CLOUDINARY_URL has no cloud name")?;
        let secret = parsed
            .password()
            .context("CLOUDINARY_URL has no api secret")?;
        if parsed.username().is_empty() {
            anyhow::bail!("CLOUDINARY_URL has no api key");
        }
        self.provider.cloud_name = cloud.to_string();
        self.provider.api_key = percent_decode(parsed.username());
        self.provider.api_secret = percent_decode(secret);
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("docfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DocfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DocfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: DocfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

/// [`load_or_init`] plus process environment overrides.
pub fn load() -> Result<DocfetchConfig> {
    let mut cfg = load_or_init()?;
    cfg.apply_env(|key| std::env::var(key).ok())?;
    if !cfg.provider.has_credentials() {
        tracing::warn!("provider credentials are not configured; downloads will fail");
    }
    Ok(cfg)
}
