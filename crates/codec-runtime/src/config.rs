//! Configuration loading for the runtime.

use anyhow::{Context, Result};
use std::path::Path;
use token_codec::CodecConfig;
use tracing::{info, warn};

/// Hex-encoded HMAC signing key.
pub const ENV_SIGNING_KEY: &str = "QRT_SIGNING_KEY";
/// Hex-encoded XChaCha20-Poly1305 key.
pub const ENV_ENCRYPTION_KEY: &str = "QRT_ENCRYPTION_KEY";
/// `true`/`false`/`1`/`0`.
pub const ENV_ENCRYPTION_ENABLED: &str = "QRT_ENCRYPTION_ENABLED";
/// Rate limit window in milliseconds.
pub const ENV_RATE_LIMIT_WINDOW_MS: &str = "QRT_RATE_LIMIT_WINDOW_MS";
/// Generations per origin per window.
pub const ENV_RATE_LIMIT_MAX_REQUESTS: &str = "QRT_RATE_LIMIT_MAX_REQUESTS";

/// Load, override from the process environment, and validate.
pub fn load_config(path: Option<&Path>) -> Result<CodecConfig> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => CodecConfig::default(),
    };
    apply_env(&mut config, |name| std::env::var(name).ok());
    config.validate().context("invalid codec configuration")?;
    Ok(config)
}

/// Parse a JSON config file. Missing sections and fields take defaults.
pub fn read_config_file(path: &Path) -> Result<CodecConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parse config file {}", path.display()))?;
    info!(path = %path.display(), "Loaded configuration file");
    Ok(config)
}

/// Apply `QRT_*` overrides using `lookup` as the environment.
///
/// Unparseable numeric or boolean values are ignored with a warning; key
/// material is taken as-is and checked by validation.
pub fn apply_env<F>(config: &mut CodecConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_SIGNING_KEY) {
        config.security.signing_key_hex = Some(key);
        info!("Loaded signing key from environment");
    }
    if let Some(key) = lookup(ENV_ENCRYPTION_KEY) {
        config.security.encryption_key_hex = Some(key);
        info!("Loaded encryption key from environment");
    }

    if let Some(raw) = lookup(ENV_ENCRYPTION_ENABLED) {
        match parse_bool(&raw) {
            Some(enabled) => config.security.encryption_enabled = enabled,
            None => warn!("{ENV_ENCRYPTION_ENABLED} must be true or false"),
        }
    }

    if let Some(raw) = lookup(ENV_RATE_LIMIT_WINDOW_MS) {
        match raw.trim().parse() {
            Ok(ms) => config.rate_limit.window_ms = ms,
            Err(_) => warn!("{ENV_RATE_LIMIT_WINDOW_MS} must be an integer"),
        }
    }
    if let Some(raw) = lookup(ENV_RATE_LIMIT_MAX_REQUESTS) {
        match raw.trim().parse() {
            Ok(max) => config.rate_limit.max_requests = max,
            Err(_) => warn!("{ENV_RATE_LIMIT_MAX_REQUESTS} must be an integer"),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
