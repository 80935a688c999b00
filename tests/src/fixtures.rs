//! Shared builders for tests and benchmarks.

use serde_json::json;
use shared_types::{Map, Value};
use std::sync::Arc;
use token_codec::{
    CodecConfig, GenerateRequest, InMemoryRateLimiter, ManualClock, RateLimitConfig,
    TokenCodecService,
};

/// 2023-11-14T22:13:20Z
pub const T0: u64 = 1_700_000_000_000;

/// Hex signing key used across the suite.
pub const SIGNING_KEY_HEX: &str =
    "4242424242424242424242424242424242424242424242424242424242424242";

/// Hex encryption key used across the suite.
pub const ENCRYPTION_KEY_HEX: &str =
    "1717171717171717171717171717171717171717171717171717171717171717";

/// A codec plus the clock driving it.
pub struct Harness {
    pub codec: Arc<TokenCodecService>,
    pub clock: Arc<ManualClock>,
}

/// Config with both keys set.
pub fn config(encrypt: bool, rate_limit: RateLimitConfig) -> CodecConfig {
    let mut config = CodecConfig {
        rate_limit,
        ..CodecConfig::default()
    };
    config.security.signing_key_hex = Some(SIGNING_KEY_HEX.into());
    config.security.encryption_key_hex = Some(ENCRYPTION_KEY_HEX.into());
    config.security.encryption_enabled = encrypt;
    config
}

/// Codec with a generous budget, clock at [`T0`].
pub fn harness(encrypt: bool) -> Harness {
    harness_with(&config(encrypt, RateLimitConfig::new(60_000, 10_000)))
}

/// Codec for an explicit config, clock at [`T0`].
pub fn harness_with(config: &CodecConfig) -> Harness {
    let clock = Arc::new(ManualClock::new(T0));
    let limiter = Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone()));
    let codec = TokenCodecService::new(config, limiter, clock.clone())
        .unwrap_or_else(|e| panic!("fixture config rejected: {e}"));
    Harness {
        codec: Arc::new(codec),
        clock,
    }
}

/// Typical product-identity payload.
pub fn product_payload() -> Map {
    object(json!({
        "sku": "COF-ETH-250",
        "batch": 20231114,
        "weight_kg": 0.25,
        "origin": {"country": "ET", "region": "Yirgacheffe"},
        "certifications": ["organic", "fair-trade"],
        "recalled": false,
        "notes": null
    }))
}

/// `json!` object literal to a [`Map`].
pub fn object(json: serde_json::Value) -> Map {
    Value::object_from_json(json).unwrap_or_else(|e| panic!("fixture is not an object: {e}"))
}

/// Request for [`product_payload`] from `origin`.
pub fn product_request(origin: &str) -> GenerateRequest {
    GenerateRequest::new(origin, product_payload())
}
