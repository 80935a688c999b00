//! # QR-Token Codec Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | canonicalize (typical payload) | < 10µs |
//! | generate, authenticated | < 50µs |
//! | generate, encrypted | < 50µs |
//! | decode + verify | < 50µs |
//! | rate limiter check | < 1µs |

use codec_tests::fixtures::{
    config, harness_with, object, product_payload, product_request, Harness, T0,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;
use shared_types::{Map, Value};
use std::time::Duration;
use token_codec::{
    canonicalize, GenerateRequest, InMemoryRateLimiter, IssuanceLimiter, RateLimitConfig,
    TokenCodecApi, TokenEnvelope,
};

// ============================================================================
// Canonical encoding
// ============================================================================

fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonical");

    let envelope = TokenEnvelope::new(T0, Some(T0 + 60_000), product_payload(), None);
    group.bench_function("typical_payload", |b| {
        b.iter(|| black_box(canonicalize(black_box(&envelope))))
    });

    for fields in [8usize, 64, 256] {
        let payload: Map = (0..fields)
            .map(|i| (format!("field_{i:04}"), Value::from(i as u64)))
            .collect();
        let envelope = TokenEnvelope::new(T0, None, payload, None);
        group.throughput(Throughput::Elements(fields as u64));
        group.bench_with_input(BenchmarkId::new("flat_fields", fields), &envelope, |b, env| {
            b.iter(|| black_box(canonicalize(env)))
        });
    }

    group.finish();
}

// ============================================================================
// Generate / decode
// ============================================================================

/// Codec whose limiter never rejects a single hot origin.
fn unlimited(encrypt: bool) -> Harness {
    harness_with(&config(encrypt, RateLimitConfig::new(60_000, u32::MAX)))
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.measurement_time(Duration::from_secs(5));

    for encrypt in [false, true] {
        let label = if encrypt { "encrypted" } else { "authenticated" };
        let h = unlimited(encrypt);
        let request = product_request("bench-press");
        let token = h.codec.generate(&request).unwrap();

        group.bench_function(BenchmarkId::new("generate", label), |b| {
            b.iter(|| black_box(h.codec.generate(black_box(&request)).unwrap()))
        });

        group.bench_function(BenchmarkId::new("decode_verified", label), |b| {
            b.iter(|| black_box(h.codec.decode(black_box(&token), true).unwrap()))
        });

        group.bench_function(BenchmarkId::new("verify_only", label), |b| {
            b.iter(|| black_box(h.codec.verify_signature_only(black_box(&token))))
        });
    }

    let h = unlimited(false);
    let mut tampered = h.codec.generate(&product_request("bench-press")).unwrap();
    let swap = if &tampered[40..41] == "A" { "B" } else { "A" };
    tampered.replace_range(40..41, swap);
    group.bench_function("reject_tampered", |b| {
        b.iter(|| black_box(h.codec.verify_signature_only(black_box(&tampered))))
    });

    let nested = object(json!({"a": {"b": {"c": {"d": [1, 2, {"e": "f"}]}}}}));
    let h = unlimited(true);
    let request = GenerateRequest::new("bench-press", nested);
    group.bench_function("generate_nested", |b| {
        b.iter(|| black_box(h.codec.generate(black_box(&request)).unwrap()))
    });

    group.finish();
}

// ============================================================================
// Rate limiter
// ============================================================================

fn bench_rate_limiter(c: &mut Criterion) {
    let mut group = c.benchmark_group("rate_limiter");

    let limiter = InMemoryRateLimiter::new(RateLimitConfig::new(60_000, u32::MAX));
    group.bench_function("allow_hot_origin", |b| {
        b.iter(|| black_box(limiter.allow(black_box("press-1"), T0)))
    });

    let origins: Vec<String> = (0..10_000).map(|i| format!("press-{i}")).collect();
    let mut i = 0usize;
    group.bench_function("allow_10k_origins", |b| {
        b.iter(|| {
            i = (i + 1) % origins.len();
            black_box(limiter.allow(&origins[i], T0))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_canonicalize, bench_codec, bench_rate_limiter);
criterion_main!(benches);
