//! Integration tests for TypeScript type emission.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use schemaforge::{render_type_module, ts_declaration, ts_type, SchemaDictionary, SchemaNode};
use serde_json::json;

fn node(value: serde_json::Value) -> SchemaNode {
    SchemaNode::from_value(&value)
}

fn ts(value: serde_json::Value) -> String {
    ts_type(&node(value), &SchemaDictionary::default())
}

#[test]
fn primitives_map_to_their_typescript_spellings() {
    assert_eq!(ts(json!({ "type": "string" })), "string");
    assert_eq!(ts(json!({ "type": "integer" })), "number");
    assert_eq!(ts(json!({ "type": "number" })), "number");
    assert_eq!(ts(json!({ "type": "boolean" })), "boolean");
    assert_eq!(ts(json!({ "type": "null" })), "null");
}

#[test]
fn formats_override_the_base_primitive() {
    assert_eq!(ts(json!({ "type": "integer", "format": "int64" })), "bigint");
    assert_eq!(ts(json!({ "type": "integer", "format": "int32" })), "number");
    assert_eq!(ts(json!({ "type": "string", "format": "binary" })), "Blob");
    assert_eq!(ts(json!({ "type": "string", "format": "byte" })), "Blob");
    assert_eq!(ts(json!({ "type": "string", "format": "date-time" })), "string");
    assert_eq!(ts(json!({ "type": "string", "format": "uuid" })), "string");
}

#[test]
fn objects_mark_optional_properties() {
    let expr = ts(json!({
        "type": "object",
        "required": ["id"],
        "properties": {
            "id": { "type": "string" },
            "name": { "type": "string" }
        }
    }));
    assert_eq!(expr, "{ id: string; name?: string; }");
}

#[test]
fn awkward_property_names_are_quoted() {
    let expr = ts(json!({
        "type": "object",
        "properties": {
            "content-type": { "type": "string" }
        }
    }));
    assert_eq!(expr, "{ 'content-type'?: string; }");
}

#[test]
fn additional_properties_become_index_signatures() {
    assert_eq!(
        ts(json!({ "type": "object", "additionalProperties": { "type": "number" } })),
        "{ [key: string]: number; }"
    );
    assert_eq!(
        ts(json!({
            "type": "object",
            "required": ["id"],
            "properties": { "id": { "type": "string" } },
            "additionalProperties": { "type": "number" }
        })),
        "{ id: string; [key: string]: number; }"
    );
    assert_eq!(ts(json!({ "type": "object" })), "Record<string, any>");
}

#[test]
fn enums_become_literal_unions_in_declared_order() {
    assert_eq!(
        ts(json!({ "enum": ["pending", "active", "closed"] })),
        "'pending' | 'active' | 'closed'"
    );
    assert_eq!(ts(json!({ "enum": [1, 2, 3] })), "1 | 2 | 3");
    assert_eq!(ts(json!({ "enum": ["yes", 1, null] })), "'yes' | 1 | null");
    assert_eq!(ts(json!({ "enum": [] })), "any");
}

#[test]
fn compositions_join_with_the_right_operator() {
    let intersection = ts(json!({
        "allOf": [
            { "type": "object", "properties": { "a": { "type": "string" } } },
            { "type": "object", "properties": { "b": { "type": "number" } } }
        ]
    }));
    assert_eq!(intersection, "{ a?: string; } & { b?: number; }");
    let union = ts(json!({
        "oneOf": [
            { "type": "string" },
            { "type": "number" },
            { "type": "boolean" }
        ]
    }));
    assert_eq!(union, "string | number | boolean");
}

#[test]
fn union_array_items_are_parenthesized() {
    assert_eq!(
        ts(json!({ "type": "array", "items": { "enum": ["a", "b"] } })),
        "('a' | 'b')[]"
    );
    assert_eq!(
        ts(json!({ "type": "array", "items": { "type": "string" } })),
        "string[]"
    );
    assert_eq!(ts(json!({ "type": "array" })), "any[]");
}

#[test]
fn union_members_of_intersections_are_parenthesized() {
    let expr = ts(json!({
        "allOf": [
            { "oneOf": [{ "type": "string" }, { "type": "number" }] },
            { "type": "object", "properties": { "x": { "type": "boolean" } } }
        ]
    }));
    assert_eq!(expr, "(string | number) & { x?: boolean; }");
}

#[test]
fn nullable_appends_exactly_once() {
    assert_eq!(ts(json!({ "type": "string", "nullable": true })), "string | null");
    assert_eq!(ts(json!({ "type": ["string", "null"] })), "string | null");
    // A union that already ends in null is not suffixed again.
    let already = ts(json!({
        "nullable": true,
        "oneOf": [
            { "type": "string" },
            { "type": "number" },
            { "type": "null" }
        ]
    }));
    assert_eq!(already, "string | number | null");
}

#[test]
fn nullable_objects_make_property_values_nullable() {
    let expr = ts(json!({
        "type": "object",
        "nullable": true,
        "required": ["id"],
        "properties": {
            "id": { "type": "string" }
        }
    }));
    assert_eq!(expr, "{ id: string | null; } | null");
}

#[test]
fn references_emit_pascal_names_even_when_unresolved() {
    let dict = SchemaDictionary::default();
    let reference = node(json!({ "$ref": "#/components/schemas/user_profile" }));
    assert_eq!(ts_type(&reference, &dict), "UserProfile");
    let external = node(json!({ "$ref": "http://example.com/schema.json" }));
    assert_eq!(ts_type(&external, &dict), "any");
}

#[test]
fn untyped_and_unknown_degrade_differently() {
    assert_eq!(ts(json!({})), "Record<string, any>");
    assert_eq!(ts(json!(17)), "any");
}

#[test]
fn modules_render_in_declared_order_with_descriptions() {
    let dict = SchemaDictionary::from_yaml(
        r#"
components:
  schemas:
    Pet:
      description: A pet in the store.
      type: object
      required: [name]
      properties:
        name: { type: string }
    Status:
      type: string
      enum: [available, sold]
"#,
    )
    .unwrap();
    assert_eq!(
        ts_declaration("Pet", dict.get("Pet").unwrap(), &dict),
        "export type Pet = { name: string; };"
    );
    let module = render_type_module(&dict);
    let pet_at = module.find("export type Pet").unwrap();
    let status_at = module.find("export type Status").unwrap();
    assert!(pet_at < status_at);
    assert!(module.contains("/** A pet in the store. */"));
    assert!(module.starts_with("// Generated TypeScript definitions."));
}

#[test]
fn emission_is_pure() {
    let dict = SchemaDictionary::from_yaml(
        r#"
components:
  schemas:
    Node:
      type: object
      properties:
        next: { $ref: '#/components/schemas/Node' }
"#,
    )
    .unwrap();
    let first = render_type_module(&dict);
    let second = render_type_module(&dict);
    assert_eq!(first, second);
    assert!(first.contains("export type Node = { next?: Node; };"));
}
