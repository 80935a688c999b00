//! # Canonicalizer
//!
//! Deterministic byte encoding of a [`TokenEnvelope`]: compact JSON with
//! every object's keys in byte-wise lexicographic order.
//!
//! ```text
//! {"expires_at":<int|null>,"issued_at":<int>,"metadata":<object|null>,"payload":<object>,"version":<int>}
//! ```
//!
//! ## Invariants
//!
//! - `canonicalize` is a pure function of the envelope: equal envelopes give
//!   equal bytes whatever order their maps were filled in.
//! - Numbers have one textual form (see [`shared_types::Number`]'s `Display`).
//! - Strings use minimal escaping: `"`, `\`, `\b \f \n \r \t`, and
//!   `\u00XX` for the remaining control characters. Everything else is raw
//!   UTF-8.
//! - `parse_canonical(canonicalize(e)) == e`, and `parse_canonical` only
//!   accepts byte strings that `canonicalize` could have produced.

use crate::domain::envelope::TokenEnvelope;
use crate::domain::errors::TokenError;
use serde::Deserialize;
use shared_types::{EpochMillis, Map, Value};

/// Deepest payload or metadata mapping `parse_canonical` can read back.
/// The JSON reader accepts at most 127 nested containers and the envelope
/// object is one of them.
pub const MAX_NESTING_DEPTH: usize = 126;

/// Encode an envelope to its canonical bytes. Infallible.
///
/// Recurses once per nesting level; maps are expected to have passed the
/// depth check in `validation`.
pub fn canonicalize(envelope: &TokenEnvelope) -> Vec<u8> {
    let mut out = Vec::with_capacity(128);

    // Header fields are emitted in sorted key order.
    out.extend_from_slice(b"{\"expires_at\":");
    match envelope.expires_at {
        Some(ts) => write_display(&mut out, ts),
        None => out.extend_from_slice(b"null"),
    }
    out.extend_from_slice(b",\"issued_at\":");
    write_display(&mut out, envelope.issued_at);
    out.extend_from_slice(b",\"metadata\":");
    match &envelope.metadata {
        Some(map) => write_map(&mut out, map),
        None => out.extend_from_slice(b"null"),
    }
    out.extend_from_slice(b",\"payload\":");
    write_map(&mut out, &envelope.payload);
    out.extend_from_slice(b",\"version\":");
    write_display(&mut out, envelope.version);
    out.push(b'}');

    out
}

/// Canonical document shape. Field names and order mirror `canonicalize`.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CanonicalEnvelope {
    expires_at: Option<EpochMillis>,
    issued_at: EpochMillis,
    metadata: Option<Map>,
    payload: Map,
    version: u8,
}

/// Parse canonical bytes back into an envelope.
///
/// # Errors
///
/// `TokenError::MalformedInput` if the bytes are not JSON, do not have the
/// envelope shape, or are not in canonical form.
pub fn parse_canonical(bytes: &[u8]) -> Result<TokenEnvelope, TokenError> {
    let parsed: CanonicalEnvelope = serde_json::from_slice(bytes)
        .map_err(|e| TokenError::malformed(format!("envelope is not valid: {}", describe(&e))))?;

    let envelope = TokenEnvelope {
        version: parsed.version,
        issued_at: parsed.issued_at,
        expires_at: parsed.expires_at,
        payload: parsed.payload,
        metadata: parsed.metadata,
    };

    // Rejects whitespace, duplicate keys, unsorted keys and alternate number
    // spellings, so one envelope has exactly one accepted encoding.
    if canonicalize(&envelope) != bytes {
        return Err(TokenError::malformed("envelope is not in canonical form"));
    }

    Ok(envelope)
}

/// Position and category of a parse failure. serde's own messages can
/// quote input fragments, so they are never surfaced.
fn describe(e: &serde_json::Error) -> String {
    let kind = match e.classify() {
        serde_json::error::Category::Io => "io",
        serde_json::error::Category::Syntax => "syntax",
        serde_json::error::Category::Data => "shape",
        serde_json::error::Category::Eof => "truncated",
    };
    format!("{kind} error at line {} column {}", e.line(), e.column())
}

fn write_display(out: &mut Vec<u8>, value: impl std::fmt::Display) {
    out.extend_from_slice(value.to_string().as_bytes());
}

fn write_map(out: &mut Vec<u8>, map: &Map) {
    out.push(b'{');
    // BTreeMap<String, _> iterates in byte-wise key order.
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        write_str(out, key);
        out.push(b':');
        write_value(out, value);
    }
    out.push(b'}');
}

fn write_value(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => write_display(out, n),
        Value::String(s) => write_str(out, s),
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(out, item);
            }
            out.push(b']');
        }
        Value::Object(map) => write_map(out, map),
    }
}

fn write_str(out: &mut Vec<u8>, s: &str) {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    out.push(b'"');
    for &byte in s.as_bytes() {
        match byte {
            b'"' => out.extend_from_slice(b"\\\""),
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            0x08 => out.extend_from_slice(b"\\b"),
            0x0c => out.extend_from_slice(b"\\f"),
            0x00..=0x1f => {
                out.extend_from_slice(b"\\u00");
                out.push(HEX[usize::from(byte >> 4)]);
                out.push(HEX[usize::from(byte & 0x0f)]);
            }
            // Multi-byte UTF-8 sequences never contain bytes below 0x80.
            _ => out.push(byte),
        }
    }
    out.push(b'"');
}
