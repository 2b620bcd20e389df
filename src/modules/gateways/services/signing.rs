//! Parameter canonicalization and digest helpers shared by the adapters
//!
//! Every gateway signs a flat parameter set. Parameters are held in a
//! [`BTreeMap`], so iteration is always in ascending key order no matter how
//! the set was built.

use serde_json::{Number, Value};
use std::collections::{BTreeMap, HashMap};

// 2^53: beyond this an f64 no longer holds every integer
const MAX_EXACT_WHOLE_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Flat, key-sorted parameter set
pub type Params = BTreeMap<String, Value>;

/// Name of the signature field on outbound requests and inbound callbacks
pub const SIGN_FIELD: &str = "sign";

/// Text form of a parameter value as it enters a signature
///
/// Booleans follow the gateways' scripting backends: `true` is `"1"` and
/// `false` is empty. Whole-valued floats lose their fraction (`100.00` is
/// `"100"`).
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_EXACT_WHOLE_FLOAT => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Empty-ish values some gateways leave out of the signature
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty() || s == "0",
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(true) => false,
    }
}

/// `key=value` pairs joined with `&`, unescaped
///
/// This is what a form-encoded query string reads like after URL-decoding it.
pub fn joined_pairs(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value_text(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// `application/x-www-form-urlencoded` query string, nulls omitted
pub fn form_encoded(params: &Params) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.iter().filter(|(_, v)| !v.is_null()) {
        serializer.append_pair(key, &value_text(value));
    }
    serializer.finish()
}

/// Values only, concatenated in key order with no separators
pub fn concatenated_values(params: &Params) -> String {
    params.values().map(value_text).collect()
}

/// Copy of `params` without `field`
pub fn without(params: &Params, field: &str) -> Params {
    let mut params = params.clone();
    params.remove(field);
    params
}

/// Converts a flat callback map into a sorted parameter set
pub fn from_callback(params: &HashMap<String, String>) -> Params {
    params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

/// Converts a decoded JSON object into a sorted parameter set
pub fn from_json_object(body: &serde_json::Map<String, Value>) -> Params {
    body.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

/// Lowercase hex MD5 digest
pub fn md5_hex(input: &str) -> String {
    hex::encode(md5::compute(input.as_bytes()).0)
}

/// Uppercase hex MD5 digest
pub fn md5_hex_upper(input: &str) -> String {
    hex::encode_upper(md5::compute(input.as_bytes()).0)
}

/// Hex digest comparison ignoring letter case
pub fn digest_matches(expected: &str, provided: &str) -> bool {
    !provided.is_empty() && expected.eq_ignore_ascii_case(provided)
}
