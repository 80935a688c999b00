//! # Token Codec Service
//!
//! Application service layer that implements the `TokenCodecApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`TokenCodecApi`)
//! - Uses the outbound ports (`IssuanceLimiter`, `Clock`) for budget and time
//! - Delegates encoding and cryptography to the domain layer and `shared-crypto`
//!
//! ## Check Order
//!
//! Decoding rejects as early as possible: length, then framing, then
//! decryption, then the tag, then the envelope structure, then expiry. An
//! expired token is therefore always an authentic one.

use crate::adapters::clock::SystemClock;
use crate::adapters::rate_limiter::InMemoryRateLimiter;
use crate::domain::canonical::{canonicalize, parse_canonical};
use crate::domain::config::{CodecConfig, ConfigError, LimitsConfig};
use crate::domain::entities::{GenerateRequest, VerificationStatus};
use crate::domain::envelope::TokenEnvelope;
use crate::domain::errors::TokenError;
use crate::domain::expiry::check_expiry;
use crate::domain::keys::CodecKeys;
use crate::domain::validation::{validate_metadata, validate_payload};
use crate::domain::wire::TokenFrame;
use crate::ports::inbound::TokenCodecApi;
use crate::ports::outbound::{Clock, IssuanceLimiter, RateDecision};
use shared_crypto::{mac, symmetric, CryptoError};
use shared_types::Map;
use std::sync::Arc;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Token Codec Service.
///
/// Holds key material for its whole lifetime. `Send + Sync`; share it
/// behind an `Arc`.
pub struct TokenCodecService {
    keys: CodecKeys,
    encryption_enabled: bool,
    limits: LimitsConfig,
    limiter: Arc<dyn IssuanceLimiter>,
    clock: Arc<dyn Clock>,
}

impl TokenCodecService {
    /// Create a codec from a configuration and injected dependencies.
    ///
    /// # Errors
    ///
    /// Any `ConfigError` from [`CodecConfig::validate`].
    pub fn new(
        config: &CodecConfig,
        limiter: Arc<dyn IssuanceLimiter>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::with_keys(
            config.keys()?,
            config.security.encryption_enabled,
            config.limits.clone(),
            limiter,
            clock,
        )
    }

    /// Create a codec with an in-memory limiter and the system clock.
    pub fn from_config(config: &CodecConfig) -> Result<Self, ConfigError> {
        let limiter = Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone()));
        Self::new(config, limiter, Arc::new(SystemClock))
    }

    /// Create a codec from already parsed keys.
    ///
    /// # Errors
    ///
    /// `ConfigError::MissingEncryptionKey` if encryption is enabled and
    /// `keys` has no encryption key, or any limit error from
    /// [`CodecConfig::validate`].
    pub fn with_keys(
        keys: CodecKeys,
        encryption_enabled: bool,
        limits: LimitsConfig,
        limiter: Arc<dyn IssuanceLimiter>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        if encryption_enabled && keys.encryption.is_none() {
            return Err(ConfigError::MissingEncryptionKey);
        }
        limits.validate()?;
        Ok(Self {
            keys,
            encryption_enabled,
            limits,
            limiter,
            clock,
        })
    }

    /// Whether generated tokens are encrypted.
    pub fn encryption_enabled(&self) -> bool {
        self.encryption_enabled
    }

    /// Size limits in effect.
    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// Decode pipeline shared by every read operation.
    fn open(&self, token: &str, require_verification: bool) -> Result<TokenEnvelope, TokenError> {
        if token.len() > self.limits.max_token_length {
            return Err(TokenError::malformed(format!(
                "token is {} characters, limit is {}",
                token.len(),
                self.limits.max_token_length
            )));
        }

        let frame = TokenFrame::decode(token)?;

        // Decryption always runs when flagged: without it there is nothing
        // to parse, verified or not.
        let plaintext = match &frame.nonce {
            Some(nonce) => {
                let key = self
                    .keys
                    .encryption
                    .as_ref()
                    .ok_or(TokenError::DecryptionFailure)?;
                Zeroizing::new(
                    symmetric::decrypt(key, &frame.body, nonce)
                        .map_err(|_| TokenError::DecryptionFailure)?,
                )
            }
            None => Zeroizing::new(frame.body.clone()),
        };

        if require_verification && !mac::verify(&self.keys.signing, &plaintext, &frame.tag) {
            return Err(TokenError::InvalidSignature);
        }

        let envelope = parse_canonical(&plaintext)?;
        if envelope.version != frame.version {
            return Err(TokenError::malformed("envelope version does not match header"));
        }

        if require_verification {
            check_expiry(&envelope, self.clock.now_millis())?;
        }

        debug!(
            encrypted = frame.is_encrypted(),
            verified = require_verification,
            token_len = token.len(),
            "Token decoded"
        );
        Ok(envelope)
    }

    fn log_rejection(err: &TokenError) {
        match err {
            TokenError::InvalidSignature | TokenError::DecryptionFailure => {
                warn!(error = %err, "Rejected tampered token");
            }
            _ => debug!(error = %err, "Rejected token"),
        }
    }
}

fn internal(err: CryptoError) -> TokenError {
    TokenError::Internal(err.to_string())
}

impl TokenCodecApi for TokenCodecService {
    fn generate(&self, request: &GenerateRequest) -> Result<String, TokenError> {
        let now = self.clock.now_millis();

        // Budget first. A rejected request does no further work.
        if let RateDecision::Limited { retry_after_ms } =
            self.limiter.allow(&request.origin, now)
        {
            return Err(TokenError::RateLimitExceeded { retry_after_ms });
        }

        validate_payload(&request.payload, self.limits.max_depth)?;
        validate_metadata(request.metadata.as_ref(), self.limits.max_depth)?;

        let envelope = TokenEnvelope::new(
            now,
            request.expires_at,
            request.payload.clone(),
            request.metadata.clone(),
        );
        let canonical = Zeroizing::new(canonicalize(&envelope));
        let tag = mac::sign(&self.keys.signing, &canonical).map_err(internal)?;

        let (nonce, body) = if self.encryption_enabled {
            let key = self
                .keys
                .encryption
                .as_ref()
                .ok_or_else(|| TokenError::Internal("encryption key missing".into()))?;
            let (ciphertext, nonce) = symmetric::encrypt(key, &canonical).map_err(internal)?;
            (Some(nonce), ciphertext)
        } else {
            (None, canonical.to_vec())
        };

        let token = TokenFrame {
            version: envelope.version,
            nonce,
            body,
            tag,
        }
        .encode();

        if token.len() > self.limits.max_token_length {
            return Err(TokenError::malformed(format!(
                "token is {} characters, limit is {}",
                token.len(),
                self.limits.max_token_length
            )));
        }

        debug!(
            origin = %request.origin,
            canonical_len = canonical.len(),
            token_len = token.len(),
            encrypted = self.encryption_enabled,
            "Token generated"
        );
        Ok(token)
    }

    fn decode(&self, token: &str, require_verification: bool) -> Result<Map, TokenError> {
        self.decode_envelope(token, require_verification)
            .map(|envelope| envelope.payload)
    }

    fn decode_envelope(
        &self,
        token: &str,
        require_verification: bool,
    ) -> Result<TokenEnvelope, TokenError> {
        self.open(token, require_verification)
            .inspect_err(Self::log_rejection)
    }

    fn verify(&self, token: &str) -> VerificationStatus {
        match self.open(token, true) {
            Ok(_) => VerificationStatus::Valid,
            Err(err) => {
                Self::log_rejection(&err);
                VerificationStatus::from(&err)
            }
        }
    }
}
