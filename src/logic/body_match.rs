use itertools::Itertools;
use serde_json::Value;

use crate::error::SandboxResult;
use crate::model::{ExampleSchema, Id};
use crate::store::traits::Store;

/// Serialize a JSON value with object keys in sorted order at every depth.
///
/// Two values that differ only in key order, or in how an integral number is
/// spelled, produce the same text.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            out.push('{');
            for (index, (key, nested)) in map.iter().sorted_by_key(|(key, _)| *key).enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(nested, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Number(number) => out.push_str(&canonical_number(number)),
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Integral floats are written as integers so `1.0`, `1e0` and `1` compare equal
fn canonical_number(number: &serde_json::Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }

    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            (f as i64).to_string()
        }
        Some(f) if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 => (f as u64).to_string(),
        _ => number.to_string(),
    }
}

pub struct BodyMatcher;

impl BodyMatcher {
    /// Find the first live example whose recorded request body equals `body`.
    ///
    /// Candidates are tried in numeric status order, newest first within a status.
    /// A candidate whose `req_json` does not parse is skipped.
    pub async fn find_match<S: Store>(
        store: &S,
        endpoint_id: Id,
        body: &Value,
    ) -> SandboxResult<Option<ExampleSchema>> {
        let expected = canonical_json(body);
        let candidates = store.list_candidate_schemas(endpoint_id).await?;

        for candidate in candidates {
            let recorded: Value = match serde_json::from_str(&candidate.req_json) {
                Ok(recorded) => recorded,
                Err(e) => {
                    log::warn!(
                        "Skipping example {} of endpoint {}: unparseable req_json: {}",
                        candidate.id,
                        endpoint_id,
                        e
                    );
                    continue;
                }
            };

            if canonical_json(&recorded) == expected {
                return Ok(Some(candidate));
            }
        }

        Ok(None)
    }
}
