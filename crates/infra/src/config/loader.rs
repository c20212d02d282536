//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `TPEDESK_API_BASE_URL`: Backend base URL (required)
//! - `TPEDESK_API_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `TPEDESK_CLIENT_POLICY`: `always_create` or `dedupe_by_phone`
//! - `TPEDESK_NOTICE_SUCCESS_MS`: Success notice duration
//! - `TPEDESK_NOTICE_ERROR_MS`: Error notice duration
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./tpedesk.json` or `./tpedesk.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)

use std::path::{Path, PathBuf};

use tpedesk_domain::{
    ApiConfig, NewClientPolicy, NoticeConfig, Result, TpeDeskConfig, TpeDeskError,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `TpeDeskError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<TpeDeskConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `TpeDeskError::Config` if `TPEDESK_API_BASE_URL` is missing or
/// any optional variable has an invalid value.
pub fn load_from_env() -> Result<TpeDeskConfig> {
    let base_url = env_var("TPEDESK_API_BASE_URL")?;
    let timeout_seconds = env_parse("TPEDESK_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

    let client_policy = match std::env::var("TPEDESK_CLIENT_POLICY").ok().as_deref() {
        None => NewClientPolicy::default(),
        Some("always_create") => NewClientPolicy::AlwaysCreate,
        Some("dedupe_by_phone") => NewClientPolicy::DedupeByPhone,
        Some(other) => {
            return Err(TpeDeskError::Config(format!("Invalid client policy: {other}")))
        }
    };

    let defaults = NoticeConfig::default();
    let notices = NoticeConfig {
        success_ms: env_parse("TPEDESK_NOTICE_SUCCESS_MS", defaults.success_ms)?,
        error_ms: env_parse("TPEDESK_NOTICE_ERROR_MS", defaults.error_ms)?,
    };

    Ok(TpeDeskConfig {
        api: ApiConfig { base_url, timeout_seconds },
        notices,
        client_policy,
    })
}

/// Load configuration from a JSON or TOML file
///
/// When `path` is `None`, probes the default locations listed in the
/// module documentation.
///
/// # Errors
/// Returns `TpeDeskError::Config` when no file is found or parsing fails.
pub fn load_from_file(path: Option<&Path>) -> Result<TpeDeskConfig> {
    let path = match path {
        Some(explicit) => explicit.to_path_buf(),
        None => probe_default_paths().ok_or_else(|| {
            TpeDeskError::Config("No configuration file found in default locations".into())
        })?,
    };

    let content = std::fs::read_to_string(&path).map_err(|e| {
        TpeDeskError::Config(format!("Cannot read config file {}: {e}", path.display()))
    })?;

    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .map_err(|e| TpeDeskError::Config(format!("Invalid JSON config: {e}")))?,
        Some("toml") => toml::from_str(&content)
            .map_err(|e| TpeDeskError::Config(format!("Invalid TOML config: {e}")))?,
        _ => {
            return Err(TpeDeskError::Config(format!(
                "Unsupported config format: {}",
                path.display()
            )))
        }
    };

    tracing::info!(path = %path.display(), "Configuration loaded from file");
    Ok(config)
}

fn probe_default_paths() -> Option<PathBuf> {
    let candidates = [
        "config.json",
        "config.toml",
        "tpedesk.json",
        "tpedesk.toml",
        "../config.json",
        "../config.toml",
    ];
    candidates.iter().map(PathBuf::from).find(|p| p.exists())
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| TpeDeskError::Config(format!("Missing environment variable: {name}")))
}

fn env_parse(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse()
            .map_err(|e| TpeDeskError::Config(format!("Invalid value for {name}: {e}"))),
    }
}
