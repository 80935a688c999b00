//! # Value Model
//!
//! A closed, recursive model of JSON-compatible data:
//! `null | bool | number | string | sequence | mapping`.
//!
//! ## Invariants
//!
//! - Mappings are [`BTreeMap`]s, so iteration order is always the byte-wise
//!   lexicographic order of the keys, independent of insertion order.
//! - Numbers are never NaN or infinite; [`Number::from_f64`] refuses them.
//! - Integers have exactly one representation: non-negative integers are
//!   stored unsigned, negative ones signed. `-0.0` is stored as `0.0`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ValueError;

/// Mapping from string keys to values, ordered by key bytes.
pub type Map = BTreeMap<String, Value>;

/// A JSON-compatible value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// JSON `null`.
    #[default]
    Null,
    /// JSON `true` / `false`.
    Bool(bool),
    /// A finite number.
    Number(Number),
    /// A UTF-8 string.
    String(String),
    /// An ordered sequence.
    Array(Vec<Value>),
    /// A key-ordered mapping.
    Object(Map),
}

/// A finite JSON number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number(N);

#[derive(Debug, Clone, Copy, PartialEq)]
enum N {
    PosInt(u64),
    /// Always negative.
    NegInt(i64),
    /// Always finite.
    Float(f64),
}

// =============================================================================
// NUMBER
// =============================================================================

impl Number {
    /// Build a float number. Returns `None` for NaN and infinities.
    pub fn from_f64(f: f64) -> Option<Self> {
        if !f.is_finite() {
            return None;
        }
        // Collapse -0.0 so that equal values have one encoding.
        let f = if f == 0.0 { 0.0 } else { f };
        Some(Self(N::Float(f)))
    }

    /// The value as `u64`, if it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self.0 {
            N::PosInt(u) => Some(u),
            N::NegInt(_) | N::Float(_) => None,
        }
    }

    /// The value as `i64`, if it is an integer in range.
    pub fn as_i64(&self) -> Option<i64> {
        match self.0 {
            N::PosInt(u) => i64::try_from(u).ok(),
            N::NegInt(i) => Some(i),
            N::Float(_) => None,
        }
    }

    /// The value as `f64` (integers may lose precision).
    pub fn as_f64(&self) -> f64 {
        match self.0 {
            N::PosInt(u) => u as f64,
            N::NegInt(i) => i as f64,
            N::Float(f) => f,
        }
    }

    /// True if this number was built from a float.
    pub fn is_f64(&self) -> bool {
        matches!(self.0, N::Float(_))
    }
}

impl From<u64> for Number {
    fn from(u: u64) -> Self {
        Self(N::PosInt(u))
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        match u64::try_from(i) {
            Ok(u) => Self(N::PosInt(u)),
            Err(_) => Self(N::NegInt(i)),
        }
    }
}

impl From<u32> for Number {
    fn from(u: u32) -> Self {
        Self::from(u64::from(u))
    }
}

impl From<i32> for Number {
    fn from(i: i32) -> Self {
        Self::from(i64::from(i))
    }
}

/// Integers print in plain decimal; floats print in the shortest form that
/// round-trips and always contain a `.` or an exponent.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            N::PosInt(u) => write!(f, "{u}"),
            N::NegInt(i) => write!(f, "{i}"),
            N::Float(x) => match serde_json::Number::from_f64(x) {
                Some(n) => write!(f, "{n}"),
                None => f.write_str("null"),
            },
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            N::PosInt(u) => serializer.serialize_u64(u),
            N::NegInt(i) => serializer.serialize_i64(i),
            N::Float(f) => serializer.serialize_f64(f),
        }
    }
}

impl TryFrom<f64> for Number {
    type Error = ValueError;

    fn try_from(f: f64) -> Result<Self, Self::Error> {
        Self::from_f64(f).ok_or(ValueError::NonFiniteNumber)
    }
}

impl TryFrom<&serde_json::Number> for Number {
    type Error = ValueError;

    fn try_from(n: &serde_json::Number) -> Result<Self, Self::Error> {
        if let Some(u) = n.as_u64() {
            return Ok(Self::from(u));
        }
        if let Some(i) = n.as_i64() {
            return Ok(Self::from(i));
        }
        n.as_f64()
            .and_then(Self::from_f64)
            .ok_or(ValueError::NonFiniteNumber)
    }
}

// =============================================================================
// VALUE
// =============================================================================

impl Value {
    /// Short name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Returns true for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the inner string, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the inner number, if any.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Borrow the inner mapping, if any.
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Nesting depth: scalars are 0, a container is one more than its
    /// deepest child (an empty container is 1).
    pub fn depth(&self) -> usize {
        self.walk_depth(usize::MAX)
    }

    /// True if [`depth`](Self::depth) is greater than `max`. Stops walking
    /// as soon as the limit is passed.
    pub fn depth_exceeds(&self, max: usize) -> bool {
        self.walk_depth(max) > max
    }

    /// Iterative so that arbitrarily deep values cannot exhaust the stack.
    /// Returns early with the first depth above `stop_above`.
    fn walk_depth(&self, stop_above: usize) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0usize)];
        while let Some((value, level)) = pending.pop() {
            let level = level + 1;
            match value {
                Value::Array(items) => pending.extend(items.iter().map(|child| (child, level))),
                Value::Object(map) => pending.extend(map.values().map(|child| (child, level))),
                _ => continue,
            }
            deepest = deepest.max(level);
            if deepest > stop_above {
                break;
            }
        }
        deepest
    }

    /// Convert a `serde_json::Value` that must be an object into a [`Map`].
    pub fn object_from_json(json: serde_json::Value) -> Result<Map, ValueError> {
        match Value::try_from(json)? {
            Value::Object(map) => Ok(map),
            other => Err(ValueError::NotAnObject {
                found: other.type_name(),
            }),
        }
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = ValueError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(Number::try_from(&n)?),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| Value::try_from(v).map(|v| (k, v)))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => match n.0 {
                N::PosInt(u) => serde_json::Value::from(u),
                N::NegInt(i) => serde_json::Value::from(i),
                N::Float(f) => serde_json::Value::from(f),
            },
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Object(map) => serializer.collect_map(map),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Value::try_from(json).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// CONVENIENCE CONVERSIONS
// =============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Number(u.into())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(i.into())
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::Number(u.into())
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Number(i.into())
    }
}

impl TryFrom<f64> for Value {
    type Error = ValueError;

    /// Fails with [`ValueError::NonFiniteNumber`] for NaN and infinities.
    fn try_from(f: f64) -> Result<Self, Self::Error> {
        Number::try_from(f).map(Value::Number)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}
