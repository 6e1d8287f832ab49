// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! CWT claim mapping for HC1 payloads.
//!
//! Known claims are lifted into typed fields when their shape matches. Anything
//! else, including known claims with an unexpected shape, is kept verbatim in
//! an `extra` list so nothing from the payload is lost. [`CwtClaims::to_json`]
//! rebuilds the full claim set as JSON with string keys.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use dcc_abstractions::{CborKey, CborValue};
use dcc_common::cbor;
use dcc_common::CborError;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::trace;

pub const CLAIM_ISSUER: i64 = 1;
pub const CLAIM_EXPIRATION: i64 = 4;
pub const CLAIM_ISSUED_AT: i64 = 6;
pub const CLAIM_HEALTH_CERTIFICATE: i64 = -260;
/// Key of the EU DCC v1 schema inside the `-260` claim.
pub const HCERT_SCHEMA_V1: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimsError {
    #[error("payload: {0}")]
    Cbor(#[from] CborError),
    #[error("malformed claims: {0}")]
    Malformed(String),
}

/// A single record of a `v`, `t` or `r` array, kept as its CBOR map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CertificateEntry {
    pub fields: Vec<(CborKey, CborValue)>,
}

impl CertificateEntry {
    pub fn get(&self, key: &str) -> Option<&CborValue> {
        self.fields
            .iter()
            .find(|(k, _)| matches!(k, CborKey::Text(t) if t == key))
            .map(|(_, v)| v)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.untagged().as_text())
    }

    /// Unique certificate identifier (`ci`).
    pub fn certificate_id(&self) -> Option<&str> {
        self.text("ci")
    }

    /// Member state or third country (`co`).
    pub fn country(&self) -> Option<&str> {
        self.text("co")
    }

    /// Certificate issuer (`is`).
    pub fn issuer(&self) -> Option<&str> {
        self.text("is")
    }
}

/// `nam`: surname and forename, plus their ICAO 9303 transliterations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersonName {
    pub family_name: Option<String>,
    pub given_name: Option<String>,
    pub family_name_standardised: Option<String>,
    pub given_name_standardised: Option<String>,
    pub extra: Vec<(CborKey, CborValue)>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HealthCertificate {
    /// `ver`
    pub version: Option<String>,
    /// `nam`
    pub name: Option<PersonName>,
    /// `dob`, as issued (`YYYY-MM-DD`, possibly truncated).
    pub date_of_birth: Option<String>,
    /// `v`
    pub vaccinations: Vec<CertificateEntry>,
    /// `t`
    pub tests: Vec<CertificateEntry>,
    /// `r`
    pub recoveries: Vec<CertificateEntry>,
    pub extra: Vec<(CborKey, CborValue)>,
    /// Entries of the `-260` map other than schema `1`.
    pub other_schemas: Vec<(CborKey, CborValue)>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CwtClaims {
    /// `1`: issuing country.
    pub issuer: Option<String>,
    /// `4`: expiration, seconds since the epoch.
    pub expiration: Option<i64>,
    /// `6`: issued at, seconds since the epoch.
    pub issued_at: Option<i64>,
    /// `-260`
    pub health_certificate: Option<HealthCertificate>,
    pub extra: Vec<(CborKey, CborValue)>,
}

/// Decode a COSE payload and map it into [`CwtClaims`].
///
/// Bytes after the first CBOR item are covered by the signature but carry no
/// claims; they are ignored.
pub fn map_claims(payload: &[u8], max_depth: usize) -> Result<CwtClaims, ClaimsError> {
    let (mut value, consumed) = cbor::decode(payload, max_depth)?;
    let trailing = payload.len() - consumed;
    if trailing > 0 {
        trace!(trailing, "ignoring bytes after the claims map");
    }
    while let CborValue::Tagged(_, inner) = value {
        value = *inner;
    }

    let entries = match value {
        CborValue::Map(entries) => entries,
        other => {
            return Err(ClaimsError::Malformed(format!(
                "payload is a {}, not a map",
                other.kind()
            )))
        }
    };

    let mut claims = CwtClaims::default();
    for (key, value) in entries {
        let label = match &key {
            CborKey::Int(i) => i64::try_from(*i).ok(),
            CborKey::Text(_) => None,
        };
        match (label, value) {
            (Some(CLAIM_ISSUER), CborValue::Text(s)) if claims.issuer.is_none() => claims.issuer = Some(s),
            (Some(CLAIM_EXPIRATION), v) if claims.expiration.is_none() && v.as_i64().is_some() => {
                claims.expiration = v.as_i64();
            }
            (Some(CLAIM_ISSUED_AT), v) if claims.issued_at.is_none() && v.as_i64().is_some() => {
                claims.issued_at = v.as_i64();
            }
            (Some(CLAIM_HEALTH_CERTIFICATE), CborValue::Map(hcert)) if claims.health_certificate.is_none() => {
                match map_health_certificate(hcert) {
                    Ok(hc) => claims.health_certificate = Some(hc),
                    Err(original) => claims.extra.push((key, CborValue::Map(original))),
                }
            }
            (_, v) => claims.extra.push((key, v)),
        }
    }
    Ok(claims)
}

/// Map the `-260` claim. Returns the entries unchanged when schema `1` is absent or not a map.
fn map_health_certificate(
    entries: Vec<(CborKey, CborValue)>,
) -> Result<HealthCertificate, Vec<(CborKey, CborValue)>> {
    let schema_key = CborKey::from(HCERT_SCHEMA_V1);
    let Some(pos) = entries
        .iter()
        .position(|(k, v)| *k == schema_key && matches!(v, CborValue::Map(_)))
    else {
        return Err(entries);
    };

    let mut other_schemas = entries;
    let (_, schema) = other_schemas.remove(pos);
    let CborValue::Map(fields) = schema else {
        return Err(other_schemas);
    };

    let mut hc = HealthCertificate {
        other_schemas,
        ..Default::default()
    };
    for (key, value) in fields {
        let name = field_name(&key);
        match (name.as_str(), value) {
            ("ver", CborValue::Text(s)) if hc.version.is_none() => hc.version = Some(s),
            ("dob", CborValue::Text(s)) if hc.date_of_birth.is_none() => hc.date_of_birth = Some(s),
            ("nam", CborValue::Map(m)) if hc.name.is_none() => hc.name = Some(map_person_name(m)),
            ("v", CborValue::Array(items)) if hc.vaccinations.is_empty() => {
                store_entries(&mut hc.vaccinations, &mut hc.extra, key, items)
            }
            ("t", CborValue::Array(items)) if hc.tests.is_empty() => {
                store_entries(&mut hc.tests, &mut hc.extra, key, items)
            }
            ("r", CborValue::Array(items)) if hc.recoveries.is_empty() => {
                store_entries(&mut hc.recoveries, &mut hc.extra, key, items)
            }
            (_, v) => hc.extra.push((key, v)),
        }
    }
    Ok(hc)
}

/// Text key of a schema field; integer keys never name a known field.
fn field_name(key: &CborKey) -> String {
    match key {
        CborKey::Text(t) => t.clone(),
        CborKey::Int(_) => String::new(),
    }
}

/// Record arrays are typed only when every element is a map.
fn store_entries(
    target: &mut Vec<CertificateEntry>,
    extra: &mut Vec<(CborKey, CborValue)>,
    key: CborKey,
    items: Vec<CborValue>,
) {
    if items.is_empty() || !items.iter().all(|i| matches!(i, CborValue::Map(_))) {
        extra.push((key, CborValue::Array(items)));
        return;
    }
    target.extend(items.into_iter().filter_map(|item| match item {
        CborValue::Map(fields) => Some(CertificateEntry { fields }),
        _ => None,
    }));
}

fn map_person_name(fields: Vec<(CborKey, CborValue)>) -> PersonName {
    let mut name = PersonName::default();
    for (key, value) in fields {
        let slot = match field_name(&key).as_str() {
            "fn" => &mut name.family_name,
            "gn" => &mut name.given_name,
            "fnt" => &mut name.family_name_standardised,
            "gnt" => &mut name.given_name_standardised,
            _ => {
                name.extra.push((key, value));
                continue;
            }
        };
        match value {
            CborValue::Text(s) if slot.is_none() => *slot = Some(s),
            other => name.extra.push((key, other)),
        }
    }
    name
}

/// JSON rendering of a CBOR value: string keys, base64 byte strings, tags dropped.
///
/// Integers outside the JSON number range and non-finite floats become strings
/// and `null` respectively.
pub(crate) fn cbor_to_json(value: &CborValue) -> Value {
    match value {
        CborValue::Integer(i) => {
            if let Ok(n) = i64::try_from(*i) {
                Value::from(n)
            } else if let Ok(n) = u64::try_from(*i) {
                Value::from(n)
            } else {
                Value::String(i.to_string())
            }
        }
        CborValue::Bytes(b) => Value::String(STANDARD.encode(b)),
        CborValue::Text(s) => Value::String(s.clone()),
        CborValue::Array(items) => Value::Array(items.iter().map(cbor_to_json).collect()),
        CborValue::Map(entries) => Value::Object(entries_to_json(entries)),
        CborValue::Tagged(_, inner) => cbor_to_json(inner),
        CborValue::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
        CborValue::Bool(b) => Value::Bool(*b),
        CborValue::Null | CborValue::Undefined => Value::Null,
        CborValue::Simple(s) => Value::from(*s),
    }
}

fn entries_to_json(entries: &[(CborKey, CborValue)]) -> Map<String, Value> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), cbor_to_json(v)))
        .collect()
}

fn put(map: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value);
    }
}

impl CertificateEntry {
    pub fn to_json(&self) -> Value {
        Value::Object(entries_to_json(&self.fields))
    }
}

impl PersonName {
    pub fn to_json(&self) -> Value {
        let mut map = entries_to_json(&self.extra);
        put(&mut map, "fn", self.family_name.clone().map(Value::String));
        put(&mut map, "gn", self.given_name.clone().map(Value::String));
        put(&mut map, "fnt", self.family_name_standardised.clone().map(Value::String));
        put(&mut map, "gnt", self.given_name_standardised.clone().map(Value::String));
        Value::Object(map)
    }
}

impl HealthCertificate {
    /// The `-260` claim value, including schemas other than `1`.
    pub fn to_json(&self) -> Value {
        let records = |entries: &[CertificateEntry]| {
            (!entries.is_empty()).then(|| Value::Array(entries.iter().map(CertificateEntry::to_json).collect()))
        };

        let mut schema = entries_to_json(&self.extra);
        put(&mut schema, "ver", self.version.clone().map(Value::String));
        put(&mut schema, "nam", self.name.as_ref().map(PersonName::to_json));
        put(&mut schema, "dob", self.date_of_birth.clone().map(Value::String));
        put(&mut schema, "v", records(&self.vaccinations));
        put(&mut schema, "t", records(&self.tests));
        put(&mut schema, "r", records(&self.recoveries));

        let mut map = entries_to_json(&self.other_schemas);
        map.insert(HCERT_SCHEMA_V1.to_string(), Value::Object(schema));
        Value::Object(map)
    }
}

impl CwtClaims {
    /// Presentation view of the whole claim set, e.g. `json["-260"]["1"]["nam"]["fn"]`.
    pub fn to_json(&self) -> Value {
        let mut map = entries_to_json(&self.extra);
        put(&mut map, &CLAIM_ISSUER.to_string(), self.issuer.clone().map(Value::String));
        put(&mut map, &CLAIM_EXPIRATION.to_string(), self.expiration.map(Value::from));
        put(&mut map, &CLAIM_ISSUED_AT.to_string(), self.issued_at.map(Value::from));
        put(
            &mut map,
            &CLAIM_HEALTH_CERTIFICATE.to_string(),
            self.health_certificate.as_ref().map(HealthCertificate::to_json),
        );
        Value::Object(map)
    }
}

impl Serialize for CwtClaims {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
