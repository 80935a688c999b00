//! # Integration Test Flows
//!
//! Issue-then-scan flows across `shared-types`, `shared-crypto` and
//! `token-codec`:
//!
//! 1. **Round trip**: payloads survive generate → decode, with and without
//!    encryption
//! 2. **Expiry**: tokens expire strictly after `expires_at`; tokens without
//!    expiry never do
//! 3. **Issuance limits**: per-origin fixed windows, shared across threads
//! 4. **Key rotation**: separately configured codecs interoperate only when
//!    their keys match

#[cfg(test)]
mod tests {
    use crate::fixtures::{
        config, harness, harness_with, object, product_payload, product_request, T0,
    };
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;
    use token_codec::{
        validate_generate_request, GenerateRequest, RateLimitConfig, TokenCodecApi, TokenError,
        VerificationStatus,
    };

    const DAY_MS: u64 = 24 * 60 * 60 * 1000;

    // =============================================================================
    // ROUND TRIP
    // =============================================================================

    #[test]
    fn test_round_trip_plain_and_encrypted() {
        for encrypt in [false, true] {
            let h = harness(encrypt);
            let token = h.codec.generate(&product_request("roastery-1")).unwrap();
            assert_eq!(h.codec.decode(&token, true).unwrap(), product_payload());
        }
    }

    #[test]
    fn test_round_trip_preserves_number_kinds() {
        let h = harness(false);
        let payload = object(json!({
            "int": 1,
            "float": 1.0,
            "neg": -42,
            "big": u64::MAX,
            "tiny": 5e-324,
            "text": "line\nbreak \u{1F600}"
        }));
        let token = h
            .codec
            .generate(&GenerateRequest::new("lab", payload.clone()))
            .unwrap();
        let decoded = h.codec.decode(&token, true).unwrap();
        assert_eq!(decoded, payload);
        assert!(!decoded["int"].as_number().unwrap().is_f64());
        assert!(decoded["float"].as_number().unwrap().is_f64());
    }

    #[test]
    fn test_metadata_only_through_envelope() {
        let h = harness(true);
        let metadata = object(json!({"purpose": "retail-shelf", "printer": "zebra-04"}));
        let token = h
            .codec
            .generate(&product_request("roastery-1").with_metadata(metadata.clone()))
            .unwrap();

        assert_eq!(h.codec.decode(&token, true).unwrap(), product_payload());
        let envelope = h.codec.decode_envelope(&token, true).unwrap();
        assert_eq!(envelope.metadata, Some(metadata));
        assert_eq!(envelope.issued_at, T0);
    }

    #[test]
    fn test_same_payload_gives_same_plain_token() {
        let h = harness(false);
        let a = h.codec.generate(&product_request("roastery-1")).unwrap();
        let b = h.codec.generate(&product_request("roastery-1")).unwrap();
        assert_eq!(a, b);

        // Encrypted tokens differ by their random nonce.
        let h = harness(true);
        let a = h.codec.generate(&product_request("roastery-1")).unwrap();
        let b = h.codec.generate(&product_request("roastery-1")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_typical_token_fits_a_qr_code() {
        let h = harness(true);
        let token = h.codec.generate(&product_request("roastery-1")).unwrap();
        assert!(token.len() < 600, "token is {} chars", token.len());
    }

    // =============================================================================
    // EXPIRY
    // =============================================================================

    #[test]
    fn test_expired_one_millisecond_ago() {
        for encrypt in [false, true] {
            let h = harness(encrypt);
            let token = h
                .codec
                .generate(&product_request("roastery-1").expires_at(T0 - 1))
                .unwrap();

            assert_eq!(
                h.codec.decode(&token, true),
                Err(TokenError::Expired {
                    expires_at: T0 - 1,
                    now: T0
                })
            );
            // Authentic: signature and decryption both passed.
            assert_eq!(h.codec.verify(&token), VerificationStatus::Expired);
            assert!(!h.codec.verify_signature_only(&token));
        }
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let h = harness(false);
        let token = h
            .codec
            .generate(&product_request("roastery-1").expires_at(T0 + DAY_MS))
            .unwrap();

        h.clock.set(T0 + DAY_MS);
        assert!(h.codec.decode(&token, true).is_ok());
        h.clock.advance(1);
        assert!(matches!(
            h.codec.decode(&token, true),
            Err(TokenError::Expired { .. })
        ));
    }

    #[test]
    fn test_no_expiry_decodes_far_in_future() {
        let h = harness(true);
        let token = h.codec.generate(&product_request("roastery-1")).unwrap();
        h.clock.advance(50 * 365 * DAY_MS);
        assert_eq!(h.codec.decode(&token, true).unwrap(), product_payload());
    }

    #[test]
    fn test_request_validation_rejects_past_expiry() {
        let request = product_request("roastery-1").expires_at(T0 - 1);
        assert!(matches!(
            validate_generate_request(&request, T0, 32),
            Err(TokenError::MalformedInput(_))
        ));
    }

    // =============================================================================
    // ISSUANCE LIMITS
    // =============================================================================

    #[test]
    fn test_three_per_second() {
        let h = harness_with(&config(false, RateLimitConfig::new(1000, 3)));

        for _ in 0..3 {
            assert!(h.codec.generate(&product_request("press-a")).is_ok());
        }
        assert!(matches!(
            h.codec.generate(&product_request("press-a")),
            Err(TokenError::RateLimitExceeded { .. })
        ));

        // Other origins are unaffected.
        assert!(h.codec.generate(&product_request("press-b")).is_ok());

        // Budget returns after the window.
        h.clock.advance(1000);
        assert!(h.codec.generate(&product_request("press-a")).is_ok());
    }

    #[test]
    fn test_limit_error_is_retryable() {
        let h = harness_with(&config(false, RateLimitConfig::new(1000, 1)));
        h.codec.generate(&product_request("press-a")).unwrap();
        h.clock.advance(250);

        let err = h.codec.generate(&product_request("press-a")).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err, TokenError::RateLimitExceeded { retry_after_ms: 750 });
    }

    #[test]
    fn test_decode_never_limited() {
        let h = harness_with(&config(false, RateLimitConfig::new(1000, 1)));
        let token = h.codec.generate(&product_request("press-a")).unwrap();
        for _ in 0..50 {
            assert!(h.codec.verify_signature_only(&token));
        }
    }

    #[test]
    fn test_concurrent_issuance_respects_budget() {
        let h = harness_with(&config(false, RateLimitConfig::new(60_000, 40)));
        let codec = Arc::clone(&h.codec);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let codec = Arc::clone(&codec);
                thread::spawn(move || {
                    let mut issued = Vec::new();
                    for _ in 0..10 {
                        if let Ok(token) = codec.generate(&product_request("shared-press")) {
                            issued.push(token);
                        }
                        // Private origins never hit the budget.
                        assert!(codec
                            .generate(&product_request(&format!("press-{i}")))
                            .is_ok());
                    }
                    issued
                })
            })
            .collect();

        let tokens: Vec<String> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        assert_eq!(tokens.len(), 40);
        assert!(tokens.iter().all(|t| codec.verify_signature_only(t)));
    }

    // =============================================================================
    // KEY MANAGEMENT
    // =============================================================================

    #[test]
    fn test_independent_codecs_with_same_keys_interoperate() {
        let issuer = harness(true);
        let scanner = harness(false);
        let token = issuer.codec.generate(&product_request("roastery-1")).unwrap();
        assert_eq!(scanner.codec.decode(&token, true).unwrap(), product_payload());
    }

    #[test]
    fn test_rotated_signing_key_rejects_old_tokens() {
        let issuer = harness(false);
        let token = issuer.codec.generate(&product_request("roastery-1")).unwrap();

        let mut rotated = config(false, RateLimitConfig::default());
        rotated.security.signing_key_hex = Some("5a".repeat(32));
        let scanner = harness_with(&rotated);

        assert_eq!(scanner.codec.decode(&token, true), Err(TokenError::InvalidSignature));
        assert_eq!(scanner.codec.verify(&token), VerificationStatus::InvalidSignature);
    }
}
