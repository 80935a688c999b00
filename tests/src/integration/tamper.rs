//! # Tamper Simulations
//!
//! Attacks a scanner-side codec may see:
//!
//! 1. **Bit flips** anywhere in the frame (header, nonce, body, tag)
//! 2. **Truncation and extension** of the token text
//! 3. **Forgery**: re-signing with a guessed key, splicing the tag of one
//!    token onto the body of another
//! 4. **Leak checks**: rejections never surface payload content

#[cfg(test)]
mod tests {
    use crate::fixtures::{harness, object, product_request};
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;
    use proptest::prelude::*;
    use serde_json::json;
    use shared_crypto::{mac, MacKey};
    use token_codec::{
        canonicalize, GenerateRequest, TokenCodecApi, TokenEnvelope, TokenError, TokenFrame,
        VerificationStatus,
    };

    fn frame_bytes(token: &str) -> Vec<u8> {
        URL_SAFE_NO_PAD.decode(token).unwrap()
    }

    fn to_token(bytes: &[u8]) -> String {
        URL_SAFE_NO_PAD.encode(bytes)
    }

    // =============================================================================
    // BIT FLIPS
    // =============================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_bit_flip_never_decodes(encrypt in any::<bool>(), pos in any::<prop::sample::Index>(), bit in 0u8..8) {
            let h = harness(encrypt);
            let token = h.codec.generate(&product_request("roastery-1")).unwrap();
            let mut bytes = frame_bytes(&token);
            let idx = pos.index(bytes.len());
            bytes[idx] ^= 1 << bit;
            let tampered = to_token(&bytes);

            let err = h.codec.decode(&tampered, true).unwrap_err();
            if idx >= 2 {
                // Authenticated region: nonce, body, tag.
                prop_assert!(err.is_tamper(), "byte {}: {:?}", idx, err);
            } else {
                prop_assert!(
                    err.is_tamper() || matches!(err, TokenError::MalformedInput(_)),
                    "header byte {}: {:?}", idx, err
                );
            }
            prop_assert!(!h.codec.verify_signature_only(&tampered));
        }
    }

    #[test]
    fn test_encrypted_body_flip_is_decryption_failure() {
        let h = harness(true);
        let token = h.codec.generate(&product_request("roastery-1")).unwrap();
        let mut bytes = frame_bytes(&token);
        // First ciphertext byte, after header and nonce.
        bytes[2 + 24] ^= 0x80;
        assert_eq!(
            h.codec.decode(&to_token(&bytes), true),
            Err(TokenError::DecryptionFailure)
        );
    }

    #[test]
    fn test_plain_body_flip_is_invalid_signature() {
        let h = harness(false);
        let token = h.codec.generate(&product_request("roastery-1")).unwrap();
        let mut bytes = frame_bytes(&token);
        bytes[10] ^= 0x01;
        assert_eq!(
            h.codec.decode(&to_token(&bytes), true),
            Err(TokenError::InvalidSignature)
        );
    }

    // =============================================================================
    // TRUNCATION AND EXTENSION
    // =============================================================================

    #[test]
    fn test_truncated_tokens_rejected() {
        let h = harness(true);
        let token = h.codec.generate(&product_request("roastery-1")).unwrap();
        for cut in [1, 2, 10, 43, token.len() / 2, token.len() - 1] {
            let short = &token[..token.len() - cut];
            assert_ne!(h.codec.verify(short), VerificationStatus::Valid, "cut {cut}");
        }
    }

    #[test]
    fn test_appended_bytes_rejected() {
        let h = harness(false);
        let token = h.codec.generate(&product_request("roastery-1")).unwrap();
        let mut bytes = frame_bytes(&token);
        bytes.push(0);
        assert!(h.codec.decode(&to_token(&bytes), true).is_err());
    }

    // =============================================================================
    // FORGERY
    // =============================================================================

    #[test]
    fn test_forged_with_guessed_key() {
        let h = harness(false);
        let envelope = TokenEnvelope::new(
            0,
            None,
            object(json!({"sku": "FAKE-1"})),
            None,
        );
        let body = canonicalize(&envelope);
        let tag = mac::sign(&MacKey::generate(), &body).unwrap();
        let forged = TokenFrame {
            version: TokenEnvelope::CURRENT_VERSION,
            nonce: None,
            body,
            tag,
        }
        .encode();

        assert_eq!(h.codec.decode(&forged, true), Err(TokenError::InvalidSignature));
        // Structure is fine, so an unverified read still works.
        assert!(h.codec.decode(&forged, false).is_ok());
    }

    #[test]
    fn test_spliced_tag_rejected() {
        let h = harness(false);
        let genuine = TokenFrame::decode(
            &h.codec.generate(&product_request("roastery-1")).unwrap(),
        )
        .unwrap();
        let other = TokenFrame::decode(
            &h.codec
                .generate(&GenerateRequest::new("roastery-1", object(json!({"sku": "X"}))))
                .unwrap(),
        )
        .unwrap();

        let spliced = TokenFrame {
            tag: genuine.tag,
            ..other
        }
        .encode();
        assert_eq!(h.codec.decode(&spliced, true), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_encryption_flag_stripped() {
        let h = harness(true);
        let token = h.codec.generate(&product_request("roastery-1")).unwrap();
        let mut bytes = frame_bytes(&token);
        bytes[1] = 0;
        assert_eq!(
            h.codec.decode(&to_token(&bytes), true),
            Err(TokenError::InvalidSignature)
        );
    }

    // =============================================================================
    // LEAK CHECKS
    // =============================================================================

    #[test]
    fn test_rejections_do_not_expose_payload() {
        let h = harness(false);
        let token = h
            .codec
            .generate(&GenerateRequest::new(
                "roastery-1",
                object(json!({"secret": "hunter2-lot-778"})),
            ))
            .unwrap();
        let mut bytes = frame_bytes(&token);
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = to_token(&bytes);

        let err = h.codec.decode(&tampered, true).unwrap_err();
        assert!(!err.to_string().contains("hunter2"));
        assert!(!format!("{err:?}").contains("hunter2"));
        assert_eq!(h.codec.verify(&tampered), VerificationStatus::InvalidSignature);
    }

    #[test]
    fn test_garbage_inputs() {
        let h = harness(true);
        let oversized = "A".repeat(5000);
        for input in ["", " ", "====", "not/base64+", "AAAA", oversized.as_str()] {
            assert!(!h.codec.verify_signature_only(input), "{input:?}");
            assert!(matches!(
                h.codec.decode(input, false),
                Err(TokenError::MalformedInput(_))
            ));
        }
    }
}
