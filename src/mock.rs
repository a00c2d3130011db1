//! Deterministic mock data generation.
//!
//! Every schema yields the same mock on every call: fixed, recognizable
//! sample values instead of random ones, so generated fixtures diff cleanly
//! and tests that embed them stay stable. A schema's own `example` always
//! wins, then `default`, then a sample derived from the shape.

use crate::schema::{
    extract_schema_name, CompositionOp, Constraints, Format, PrimitiveKind, SchemaDictionary,
    SchemaKind, SchemaNode,
};
use serde_json::{Map, Number, Value};
use std::collections::HashSet;

const SAMPLE_STRING: &str = "example";
const SAMPLE_INTEGER: i64 = 42;
const SAMPLE_NUMBER: f64 = 3.14;
const SAMPLE_EMAIL: &str = "user@example.com";
const SAMPLE_UUID: &str = "00000000-0000-4000-8000-000000000000";
const SAMPLE_DATE: &str = "2024-01-15";
const SAMPLE_DATE_TIME: &str = "2024-01-15T09:30:00Z";
const SAMPLE_TIME: &str = "09:30:00";
const SAMPLE_URL: &str = "https://example.com";
const SAMPLE_HOSTNAME: &str = "example.com";
const SAMPLE_IPV4: &str = "192.0.2.1";
const SAMPLE_IPV6: &str = "2001:db8::1";
const SAMPLE_PASSWORD: &str = "secret123";
const SAMPLE_BASE64: &str = "ZXhhbXBsZQ==";
const SAMPLE_COLOR: &str = "#336699";

/// Mocked arrays repeat their item up to this many times.
const MAX_MOCK_ITEMS: u64 = 3;

/// Generate a deterministic mock value for a schema.
///
/// References are followed through the dictionary with a per-branch visited
/// set; a reference that would re-enter a schema already being mocked closes
/// the cycle with `null` instead of recursing.
#[must_use]
pub fn mock_value(node: &SchemaNode, dict: &SchemaDictionary) -> Value {
    mock_inner(node, dict, &HashSet::new())
}

/// Pretty-printed JSON text of [`mock_value`], for embedding in generated
/// fixtures.
#[must_use]
pub fn mock_json(node: &SchemaNode, dict: &SchemaDictionary) -> String {
    serde_json::to_string_pretty(&mock_value(node, dict)).unwrap_or_else(|_| "null".to_string())
}

fn mock_inner(node: &SchemaNode, dict: &SchemaDictionary, visited: &HashSet<String>) -> Value {
    if let Some(example) = &node.example {
        return example.clone();
    }
    if let Some(default) = &node.default_value {
        return default.clone();
    }
    match &node.kind {
        SchemaKind::Reference(raw) => mock_reference(raw, dict, visited),
        SchemaKind::Enum(values) => values.first().cloned().unwrap_or(Value::Null),
        SchemaKind::Primitive { kind, constraints } => {
            primitive_sample(*kind, constraints, node.format.as_ref())
        }
        SchemaKind::Array {
            items, min_items, ..
        } => {
            let Some(items) = items else {
                return Value::Array(Vec::new());
            };
            let count = min_items.unwrap_or(1).clamp(1, MAX_MOCK_ITEMS);
            let sample = mock_inner(items, dict, visited);
            Value::Array((0..count).map(|_| sample.clone()).collect())
        }
        SchemaKind::Object { properties, .. } => {
            let mut map = Map::new();
            for (name, prop) in properties {
                map.insert(name.clone(), mock_inner(prop, dict, visited));
            }
            Value::Object(map)
        }
        SchemaKind::Composition { op, members } => {
            composition_sample(*op, members, dict, visited)
        }
        SchemaKind::Untyped => Value::Object(Map::new()),
        SchemaKind::Unknown => Value::Null,
    }
}

fn mock_reference(raw: &str, dict: &SchemaDictionary, visited: &HashSet<String>) -> Value {
    let Some(name) = extract_schema_name(raw) else {
        return Value::Null;
    };
    if visited.contains(&name) {
        return Value::Null;
    }
    let Some(target) = dict.get(&name) else {
        return Value::Null;
    };
    let mut branch = visited.clone();
    branch.insert(name);
    mock_inner(target, dict, &branch)
}

fn primitive_sample(
    kind: PrimitiveKind,
    constraints: &Constraints,
    format: Option<&Format>,
) -> Value {
    match kind {
        PrimitiveKind::String => string_sample(format),
        PrimitiveKind::Integer => integer_sample(constraints),
        PrimitiveKind::Number => number_sample(constraints),
        PrimitiveKind::Boolean => Value::Bool(true),
        PrimitiveKind::Null => Value::Null,
    }
}

fn string_sample(format: Option<&Format>) -> Value {
    let text = match format {
        Some(Format::Email) => SAMPLE_EMAIL,
        Some(Format::Uuid) => SAMPLE_UUID,
        Some(Format::Date) => SAMPLE_DATE,
        Some(Format::DateTime) => SAMPLE_DATE_TIME,
        Some(Format::Time) => SAMPLE_TIME,
        Some(Format::Uri | Format::Url) => SAMPLE_URL,
        Some(Format::Hostname) => SAMPLE_HOSTNAME,
        Some(Format::Ipv4) => SAMPLE_IPV4,
        Some(Format::Ipv6) => SAMPLE_IPV6,
        Some(Format::Password) => SAMPLE_PASSWORD,
        Some(Format::Byte | Format::Binary) => SAMPLE_BASE64,
        Some(Format::Color) => SAMPLE_COLOR,
        _ => SAMPLE_STRING,
    };
    Value::String(text.to_string())
}

/// The stock integer, clamped into the declared bounds.
fn integer_sample(constraints: &Constraints) -> Value {
    let mut sample = SAMPLE_INTEGER;
    if let Some(min) = constraints.minimum.as_ref().and_then(Number::as_f64) {
        if (sample as f64) < min {
            sample = min.ceil() as i64;
        }
    }
    if let Some(max) = constraints.maximum.as_ref().and_then(Number::as_f64) {
        if (sample as f64) > max {
            sample = max.floor() as i64;
        }
    }
    Value::Number(Number::from(sample))
}

fn number_sample(constraints: &Constraints) -> Value {
    let mut sample = SAMPLE_NUMBER;
    if let Some(min) = constraints.minimum.as_ref().and_then(Number::as_f64) {
        if sample < min {
            sample = min;
        }
    }
    if let Some(max) = constraints.maximum.as_ref().and_then(Number::as_f64) {
        if sample > max {
            sample = max;
        }
    }
    Number::from_f64(sample)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn composition_sample(
    op: CompositionOp,
    members: &[SchemaNode],
    dict: &SchemaDictionary,
    visited: &HashSet<String>,
) -> Value {
    match op {
        CompositionOp::AllOf => {
            let mocks: Vec<Value> = members
                .iter()
                .map(|member| mock_inner(member, dict, visited))
                .collect();
            if !mocks.is_empty() && mocks.iter().all(Value::is_object) {
                // Later members override earlier ones, matching how allOf
                // refinements are usually written.
                let mut merged = Map::new();
                for mock in mocks {
                    if let Value::Object(fields) = mock {
                        merged.extend(fields);
                    }
                }
                return Value::Object(merged);
            }
            mocks.into_iter().next().unwrap_or(Value::Null)
        }
        CompositionOp::OneOf | CompositionOp::AnyOf => members
            .first()
            .map(|member| mock_inner(member, dict, visited))
            .unwrap_or(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mock(value: serde_json::Value) -> Value {
        mock_value(&SchemaNode::from_value(&value), &SchemaDictionary::default())
    }

    #[test]
    fn example_beats_default_beats_shape() {
        assert_eq!(
            mock(json!({ "type": "integer", "example": 7, "default": 9 })),
            json!(7)
        );
        assert_eq!(mock(json!({ "type": "integer", "default": 9 })), json!(9));
        assert_eq!(mock(json!({ "type": "integer" })), json!(42));
    }

    #[test]
    fn samples_respect_numeric_bounds() {
        assert_eq!(mock(json!({ "type": "integer", "minimum": 100 })), json!(100));
        assert_eq!(mock(json!({ "type": "integer", "maximum": 10 })), json!(10));
        assert_eq!(mock(json!({ "type": "number", "maximum": 1.5 })), json!(1.5));
    }

    #[test]
    fn format_samples_are_recognizable() {
        assert_eq!(
            mock(json!({ "type": "string", "format": "email" })),
            json!("user@example.com")
        );
        assert_eq!(
            mock(json!({ "type": "string", "format": "date" })),
            json!("2024-01-15")
        );
    }

    #[test]
    fn arrays_repeat_their_item_within_bounds() {
        assert_eq!(
            mock(json!({ "type": "array", "items": { "type": "integer" } })),
            json!([42])
        );
        assert_eq!(
            mock(json!({ "type": "array", "items": { "type": "integer" }, "minItems": 5 })),
            json!([42, 42, 42])
        );
    }

    #[test]
    fn untyped_and_unknown_differ() {
        assert_eq!(mock(json!({})), json!({}));
        assert_eq!(mock(json!(null)), Value::Null);
    }
}
