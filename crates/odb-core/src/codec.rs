//! Composite-value codec.
//!
//! Scalars are stored verbatim. Lists and maps are stored as a tagged,
//! length-prefixed JSON envelope:
//!
//! ```text
//! j:<payload byte length>:<json array or object>;
//! ```
//!
//! Text that already starts with the tag is wrapped as a JSON string
//! envelope (`j:<len>:"...";`) so it reads back as the same text.
//!
//! Detection requires the tag, a decimal length that matches the payload
//! exactly, a payload that opens with `[`, `{` or `"`, the `;` terminator, and
//! a payload that parses as JSON of the announced shape. Any string failing
//! one of those checks is returned untouched.

use crate::error::{Error, Result};
use crate::value::Value;

const TAG: &str = "j:";
const TERMINATOR: char = ';';

/// Turn a value into its storable form.
///
/// Composite values become a [`Value::Text`] envelope, as does text that
/// begins with the envelope tag. Everything else is returned unchanged.
///
/// # Errors
///
/// Returns [`Error::Codec`] when a composite holds a NaN or infinite float,
/// which JSON cannot represent.
pub fn serialize(value: Value) -> Result<Value> {
    match value {
        Value::Text(text) if text.starts_with(TAG) => {
            let payload = serde_json::to_string(&text)?;
            Ok(Value::Text(envelope(&payload)))
        }
        value if value.is_composite() => {
            check_finite(&value)?;
            let payload = serde_json::to_string(&value)?;
            Ok(Value::Text(envelope(&payload)))
        }
        other => Ok(other),
    }
}

/// Decode a stored value if it is an envelope, otherwise return it unchanged.
///
/// A string that looks like an envelope but fails to decode is returned as-is.
pub fn deserialize(value: Value) -> Value {
    match value {
        Value::Text(text) => match decode_envelope(&text) {
            Some(decoded) => decoded,
            None => Value::Text(text),
        },
        other => other,
    }
}

/// Check whether `text` is an envelope produced by [`serialize`].
pub fn is_encoded(text: &str) -> bool {
    envelope_payload(text).is_some()
}

/// Like [`deserialize`] but for typed decoding: a text value that is not an
/// envelope is passed through, a malformed envelope is an error.
pub(crate) fn decode_text(value: Value) -> Result<Value> {
    match value {
        Value::Text(text) => match envelope_payload(&text) {
            Some(payload) => Ok(serde_json::from_str(payload)?),
            None => Ok(Value::Text(text)),
        },
        other => Ok(other),
    }
}

/// Unwrap a string envelope. List and map envelopes stay as raw text.
pub(crate) fn decode_string(text: String) -> String {
    let decoded = envelope_payload(&text)
        .filter(|payload| payload.starts_with('"'))
        .and_then(|payload| serde_json::from_str::<String>(payload).ok());
    decoded.unwrap_or(text)
}

fn envelope(payload: &str) -> String {
    format!("{TAG}{}:{payload}{TERMINATOR}", payload.len())
}

fn check_finite(value: &Value) -> Result<()> {
    match value {
        Value::Float(v) if !v.is_finite() => Err(Error::Codec(format!(
            "cannot encode non-finite float {v}"
        ))),
        Value::List(items) => items.iter().try_for_each(check_finite),
        Value::Map(entries) => entries.values().try_for_each(check_finite),
        _ => Ok(()),
    }
}

fn decode_envelope(text: &str) -> Option<Value> {
    let payload = envelope_payload(text)?;
    match serde_json::from_str::<Value>(payload) {
        Ok(value @ (Value::List(_) | Value::Map(_) | Value::Text(_))) => Some(value),
        Ok(_) => None,
        Err(err) => {
            tracing::trace!(error = %err, "Envelope-shaped text is not valid JSON; kept as text");
            None
        }
    }
}

/// Structural checks only; returns the JSON payload slice on success.
fn envelope_payload(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(TAG)?;
    let body = rest.strip_suffix(TERMINATOR)?;
    let (len, payload) = body.split_once(':')?;
    if len.is_empty() || len.len() > 20 || !len.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let len: usize = len.parse().ok()?;
    if payload.len() != len || payload.len() < 2 {
        return None;
    }
    match payload.as_bytes().first() {
        Some(b'[') if payload.ends_with(']') => Some(payload),
        Some(b'{') if payload.ends_with('}') => Some(payload),
        Some(b'"') if payload.ends_with('"') => Some(payload),
        _ => None,
    }
}
