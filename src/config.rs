use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::harden::HardenConfig;
use crate::markdown::MarkdownOptions;
use crate::post::PostOptions;

/// Top-level configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HardmarkConfig {
    pub harden: HardenConfig,
    pub markdown: MarkdownConfig,
}

/// The `[markdown]` table: parser options and the post pass share it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    #[serde(flatten)]
    pub options: MarkdownOptions,
    #[serde(flatten)]
    pub post: PostOptions,
}

/// Load and validate configuration.
///
/// Search order:
/// 1. `HARDMARK_CONFIG` env var
/// 2. `~/.hardmark/config.toml`
/// 3. Zero-config defaults (no file needed): every link and image is blocked
pub fn load() -> anyhow::Result<HardmarkConfig> {
    let config = load_from_path(None)?;
    validate(&config)?;
    Ok(config)
}

/// Read `path`, or search as [`load`] does when `None`, then fill the
/// default origin from the environment. Not validated, so callers can
/// layer overrides first.
pub fn load_from_path(path: Option<&Path>) -> anyhow::Result<HardmarkConfig> {
    let mut config = match path {
        Some(path) => {
            let config = load_from(path)?;
            info!("loaded config from {}", path.display());
            config
        }
        None => {
            let path = config_path();
            if path.exists() {
                let config = load_from(&path)?;
                info!("loaded config from {}", path.display());
                config
            } else {
                info!("no config file found, using zero-config defaults");
                HardmarkConfig::default()
            }
        }
    };
    resolve_default_origin(&mut config);
    Ok(config)
}

/// Parse a config file without validating it.
pub fn load_from(path: &Path) -> anyhow::Result<HardmarkConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    toml::from_str(&content).map_err(|e| anyhow::anyhow!("invalid config at {}: {e}", path.display()))
}

/// `HARDMARK_CONFIG`, else `~/.hardmark/config.toml`.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("HARDMARK_CONFIG") {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".hardmark").join("config.toml")
}

/// Fill `default_origin` from `HARDMARK_DEFAULT_ORIGIN` if the file left it empty.
pub fn resolve_default_origin(config: &mut HardmarkConfig) {
    if config.harden.default_origin.is_empty() {
        if let Ok(origin) = std::env::var("HARDMARK_DEFAULT_ORIGIN") {
            config.harden.default_origin = origin;
        }
    }
}

/// Validate the config and return clear error messages.
pub fn validate(config: &HardmarkConfig) -> anyhow::Result<()> {
    config.harden.validate()?;
    config.markdown.post.validate()?;

    if !config.harden.default_origin.is_empty() {
        let origin = url::Url::parse(&config.harden.default_origin).map_err(|e| {
            anyhow::anyhow!(
                "invalid harden.default_origin '{}': {e}",
                config.harden.default_origin
            )
        })?;
        if origin.cannot_be_a_base() {
            anyhow::bail!(
                "invalid harden.default_origin '{}': must be a base URL such as https://example.com",
                config.harden.default_origin
            );
        }
    }

    Ok(())
}
