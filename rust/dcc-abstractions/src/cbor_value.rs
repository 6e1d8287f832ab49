// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Owned CBOR data model.
//!
//! `CborValue` covers every CBOR major type. Maps keep their entries in wire
//! order so a decoded value can be re-encoded byte-for-byte when the source
//! used preferred serialization. Map keys are restricted to integers and text,
//! which is all COSE headers and CWT claims use.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CborKey {
    /// Integer label (major type 0 or 1).
    Int(i128),
    /// Text label.
    Text(String),
}

impl fmt::Display for CborKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CborKey::Int(i) => write!(f, "{i}"),
            CborKey::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for CborKey {
    fn from(value: i64) -> Self {
        CborKey::Int(i128::from(value))
    }
}

impl From<i32> for CborKey {
    fn from(value: i32) -> Self {
        CborKey::Int(i128::from(value))
    }
}

impl From<&str> for CborKey {
    fn from(value: &str) -> Self {
        CborKey::Text(value.to_string())
    }
}

impl From<String> for CborKey {
    fn from(value: String) -> Self {
        CborKey::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CborValue {
    /// Major types 0 and 1. `i128` holds the full `-2^64 ..= 2^64 - 1` range.
    Integer(i128),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<CborValue>),
    /// Entries in wire order; keys are unique.
    Map(Vec<(CborKey, CborValue)>),
    Tagged(u64, Box<CborValue>),
    Float(f64),
    Bool(bool),
    Null,
    Undefined,
    /// Unassigned simple values (major type 7, other than false/true/null/undefined).
    Simple(u8),
}

impl CborValue {
    /// Short name of the item kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            CborValue::Integer(_) => "integer",
            CborValue::Bytes(_) => "byte string",
            CborValue::Text(_) => "text string",
            CborValue::Array(_) => "array",
            CborValue::Map(_) => "map",
            CborValue::Tagged(_, _) => "tagged item",
            CborValue::Float(_) => "float",
            CborValue::Bool(_) => "bool",
            CborValue::Null => "null",
            CborValue::Undefined => "undefined",
            CborValue::Simple(_) => "simple value",
        }
    }

    pub fn as_integer(&self) -> Option<i128> {
        match self {
            CborValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_integer().and_then(|i| i64::try_from(i).ok())
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            CborValue::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CborValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[CborValue]> {
        match self {
            CborValue::Array(a) => Some(a.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(CborKey, CborValue)]> {
        match self {
            CborValue::Map(m) => Some(m.as_slice()),
            _ => None,
        }
    }

    /// Strip any number of enclosing tags.
    pub fn untagged(&self) -> &CborValue {
        let mut value = self;
        while let CborValue::Tagged(_, inner) = value {
            value = inner;
        }
        value
    }

    /// Look up a map entry. Returns `None` for non-map values.
    pub fn get(&self, key: impl Into<CborKey>) -> Option<&CborValue> {
        let key = key.into();
        self.as_map()
            .and_then(|entries| entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v))
    }
}

impl From<&str> for CborValue {
    fn from(value: &str) -> Self {
        CborValue::Text(value.to_string())
    }
}

impl From<i64> for CborValue {
    fn from(value: i64) -> Self {
        CborValue::Integer(i128::from(value))
    }
}

impl From<Vec<u8>> for CborValue {
    fn from(value: Vec<u8>) -> Self {
        CborValue::Bytes(value)
    }
}

impl From<CborKey> for CborValue {
    fn from(value: CborKey) -> Self {
        match value {
            CborKey::Int(i) => CborValue::Integer(i),
            CborKey::Text(s) => CborValue::Text(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> CborValue {
        CborValue::Map(vec![
            (CborKey::Int(1), CborValue::from("DE")),
            (CborKey::Int(-260), CborValue::Map(vec![])),
            (CborKey::from("ver"), CborValue::from("1.0.0")),
        ])
    }

    #[test]
    fn get_finds_int_and_text_keys() {
        let map = sample_map();
        assert_eq!(map.get(1).and_then(CborValue::as_text), Some("DE"));
        assert!(map.get(-260).and_then(CborValue::as_map).is_some());
        assert_eq!(map.get("ver").and_then(CborValue::as_text), Some("1.0.0"));
        assert!(map.get(4).is_none());
    }

    #[test]
    fn get_on_non_map_is_none() {
        assert!(CborValue::from("x").get(1).is_none());
    }

    #[test]
    fn untagged_strips_nested_tags() {
        let v = CborValue::Tagged(61, Box::new(CborValue::Tagged(18, Box::new(CborValue::Null))));
        assert_eq!(v.untagged(), &CborValue::Null);
    }

    #[test]
    fn as_i64_rejects_out_of_range() {
        assert_eq!(CborValue::Integer(-7).as_i64(), Some(-7));
        assert_eq!(CborValue::Integer(-(1i128 << 64)).as_i64(), None);
    }

    #[test]
    fn key_display_matches_json_rendering() {
        assert_eq!(CborKey::Int(-260).to_string(), "-260");
        assert_eq!(CborKey::from("nam").to_string(), "nam");
    }
}
