//! # Codec Configuration
//!
//! Unified configuration for key material, issuance rate limiting and size
//! limits. Every section deserializes with defaults, so a partial JSON file
//! (or none at all) is valid input.
//!
//! ## Security Requirements
//!
//! - A signing key MUST be provided; there is no built-in default key
//! - All-zero keys are rejected
//! - Key material never appears in `Debug` output or serialized config

use crate::domain::canonical::MAX_NESTING_DEPTH;
use crate::domain::keys::CodecKeys;
use serde::{Deserialize, Serialize};
use shared_crypto::{CryptoError, EncryptionKey, MacKey};
use std::fmt;
use thiserror::Error;

/// Complete codec configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Keys and the encryption switch.
    pub security: SecurityConfig,
    /// Issuance rate limiting.
    pub rate_limit: RateLimitConfig,
    /// Token size and payload shape limits.
    pub limits: LimitsConfig,
}

impl CodecConfig {
    /// Check the configuration before building a codec from it.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the rate limit window or request budget is zero
    /// - the signing key is missing, malformed, short or all-zero
    /// - encryption is enabled without a valid 32-byte encryption key
    /// - a size limit is zero
    /// - `max_depth` is above [`MAX_NESTING_DEPTH`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rate_limit.validate()?;
        self.limits.validate()?;
        self.keys().map(drop)
    }

    /// Parse the configured key material.
    ///
    /// The encryption key is parsed whenever it is present, even with
    /// encryption disabled, so encrypted tokens can still be opened.
    pub fn keys(&self) -> Result<CodecKeys, ConfigError> {
        let signing_hex = self
            .security
            .signing_key_hex
            .as_deref()
            .ok_or(ConfigError::MissingSigningKey)?;
        let signing = MacKey::from_hex(signing_hex).map_err(ConfigError::InvalidSigningKey)?;

        let encryption = self
            .security
            .encryption_key_hex
            .as_deref()
            .map(EncryptionKey::from_hex)
            .transpose()
            .map_err(ConfigError::InvalidEncryptionKey)?;

        if self.security.encryption_enabled && encryption.is_none() {
            return Err(ConfigError::MissingEncryptionKey);
        }

        Ok(CodecKeys {
            signing,
            encryption,
        })
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No signing key configured.
    #[error("Signing key is not set. Set QRT_SIGNING_KEY or security.signing_key_hex")]
    MissingSigningKey,

    /// Signing key could not be used.
    #[error("Invalid signing key: {0}")]
    InvalidSigningKey(CryptoError),

    /// Encryption enabled but no key configured.
    #[error("Encryption is enabled but no encryption key is set. Set QRT_ENCRYPTION_KEY")]
    MissingEncryptionKey,

    /// Encryption key could not be used.
    #[error("Invalid encryption key: {0}")]
    InvalidEncryptionKey(CryptoError),

    /// Rate limit window is zero.
    #[error("Rate limit window must be greater than zero")]
    ZeroWindow,

    /// Rate limit budget is zero.
    #[error("Rate limit max_requests must be greater than zero")]
    ZeroMaxRequests,

    /// A size limit is zero.
    #[error("Limit {0} must be greater than zero")]
    ZeroLimit(&'static str),

    /// Tokens this deep could be issued but never decoded.
    #[error("Limit max_depth is {max_depth}, decodable maximum is {supported}")]
    DepthTooLarge { max_depth: usize, supported: usize },
}

/// Security configuration.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Encrypt token bodies on generate.
    pub encryption_enabled: bool,
    /// Hex-encoded HMAC key, at least 32 bytes.
    #[serde(skip_serializing)]
    pub signing_key_hex: Option<String>,
    /// Hex-encoded 32-byte XChaCha20-Poly1305 key.
    #[serde(skip_serializing)]
    pub encryption_key_hex: Option<String>,
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("SecurityConfig")
            .field("encryption_enabled", &self.encryption_enabled)
            .field("signing_key_hex", &redact(&self.signing_key_hex))
            .field("encryption_key_hex", &redact(&self.encryption_key_hex))
            .finish()
    }
}

/// Issuance rate limit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Window length in milliseconds.
    pub window_ms: u64,
    /// Generations allowed per origin per window.
    pub max_requests: u32,
    /// Buckets idle for this many windows are evicted.
    pub idle_eviction_factor: u32,
    /// Run an eviction sweep every this many limiter calls.
    pub sweep_interval: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            max_requests: 30,
            idle_eviction_factor: 10,
            sweep_interval: 1024,
        }
    }
}

impl RateLimitConfig {
    /// Fixed window of `window_ms` admitting `max_requests`, other knobs
    /// at their defaults.
    pub fn new(window_ms: u64, max_requests: u32) -> Self {
        Self {
            window_ms,
            max_requests,
            ..Self::default()
        }
    }

    /// Idle time after which a bucket is evicted.
    pub fn idle_ttl_ms(&self) -> u64 {
        self.window_ms
            .saturating_mul(u64::from(self.idle_eviction_factor.max(1)))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.window_ms == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.max_requests == 0 {
            return Err(ConfigError::ZeroMaxRequests);
        }
        Ok(())
    }
}

/// Token size and payload shape limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Longest accepted token text, in characters.
    pub max_token_length: usize,
    /// Deepest accepted payload nesting.
    pub max_depth: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_token_length: 2953, // QR version 40-L, byte mode
            max_depth: 32,
        }
    }
}

impl LimitsConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.max_token_length == 0 {
            return Err(ConfigError::ZeroLimit("max_token_length"));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroLimit("max_depth"));
        }
        if self.max_depth > MAX_NESTING_DEPTH {
            return Err(ConfigError::DepthTooLarge {
                max_depth: self.max_depth,
                supported: MAX_NESTING_DEPTH,
            });
        }
        Ok(())
    }
}
