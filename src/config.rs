//! Runtime settings.
//!
//! Layering, lowest to highest: compiled-in defaults, the JSON config file,
//! the `FCW_ENDPOINT` environment variable, then CLI flags. The core modules
//! only ever see the resolved [`Settings`].
use crate::sequencer::SequencerTimings;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub(crate) const DEFAULT_ENDPOINT: &str = "https://onita-detachable-nakia.ngrok-free.dev/predict";
pub(crate) const ENDPOINT_ENV: &str = "FCW_ENDPOINT";
pub(crate) const CONFIG_SCHEMA_VERSION: u32 = 1;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// On-disk config. Every field but the schema version is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    pub(crate) schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) request_timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) tick_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) hold_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) exit_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) endpoint: String,
    pub(crate) request_timeout: Duration,
    pub(crate) timings: SequencerTimings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            timings: SequencerTimings::default(),
        }
    }
}

impl Settings {
    fn apply_file(&mut self, config: &ConfigFile) {
        if let Some(endpoint) = &config.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(ms) = config.request_timeout_ms {
            self.request_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = config.tick_ms {
            self.timings.tick = Duration::from_millis(ms);
        }
        if let Some(ms) = config.hold_ms {
            self.timings.hold = Duration::from_millis(ms);
        }
        if let Some(ms) = config.exit_ms {
            self.timings.exit = Duration::from_millis(ms);
        }
    }
}

/// `<config dir>/fcw/config.json`, when the platform has a config dir.
pub(crate) fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fcw").join("config.json"))
}

pub(crate) fn load_config(path: &Path) -> Result<ConfigFile> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: ConfigFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

pub(crate) fn validate_config(config: &ConfigFile) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if let Some(endpoint) = config.endpoint.as_deref() {
        validate_endpoint(endpoint)?;
    }
    if config.tick_ms == Some(0) {
        return Err(anyhow!("tick_ms must be greater than zero"));
    }
    if config.request_timeout_ms == Some(0) {
        return Err(anyhow!("request_timeout_ms must be greater than zero"));
    }
    Ok(())
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("endpoint must be non-empty"));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(anyhow!("endpoint must be an http(s) URL (got {trimmed:?})"));
    }
    Ok(())
}

/// Resolve settings from every layer.
///
/// An explicit `config_path` must exist; the default path is optional.
pub(crate) fn resolve_settings(
    config_path: Option<&Path>,
    env_endpoint: Option<String>,
    flag_endpoint: Option<String>,
) -> Result<Settings> {
    resolve_layers(
        config_path,
        default_config_path().as_deref(),
        env_endpoint,
        flag_endpoint,
    )
}

/// `fallback_path` is only read when it exists and no explicit path was given.
fn resolve_layers(
    config_path: Option<&Path>,
    fallback_path: Option<&Path>,
    env_endpoint: Option<String>,
    flag_endpoint: Option<String>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    let file = match (config_path, fallback_path) {
        (Some(path), _) => Some(load_config(path)?),
        (None, Some(path)) if path.exists() => Some(load_config(path)?),
        (None, _) => None,
    };
    if let Some(file) = &file {
        settings.apply_file(file);
    }

    for endpoint in [env_endpoint, flag_endpoint].into_iter().flatten() {
        validate_endpoint(&endpoint)?;
        settings.endpoint = endpoint.trim().to_string();
    }

    tracing::debug!(
        endpoint = %settings.endpoint,
        timeout_ms = settings.request_timeout.as_millis(),
        from_file = file.is_some(),
        "settings resolved"
    );
    Ok(settings)
}
