//! JSON and token I/O for the subcommands.

use anyhow::{Context, Result};
use serde_json::Value as Json;
use shared_types::{Map, Value};
use std::io::Read;

/// Parse a JSON object argument into a payload/metadata map.
pub fn parse_map(text: &str, what: &str) -> Result<Map> {
    let json: Json = serde_json::from_str(text).with_context(|| format!("parse {what} JSON"))?;
    Value::object_from_json(json).with_context(|| format!("{what} must be a JSON object"))
}

/// Token from the argument, or from `reader` when the argument is `-`.
pub fn read_token(arg: &str, reader: impl Read) -> Result<String> {
    if arg != "-" {
        return Ok(arg.trim().to_owned());
    }
    let text = std::io::read_to_string(reader).context("read token from stdin")?;
    Ok(text.trim().to_owned())
}

/// Pretty JSON for terminal output.
pub fn render_json(value: &impl serde::Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).context("render JSON")
}
