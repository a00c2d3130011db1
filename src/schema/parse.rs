//! Schema ingestion.
//!
//! Raw JSON Schema objects are sniffed exactly once, here, and committed to a
//! single [`SchemaKind`]. Shape-bearing fields are checked in a fixed
//! precedence order (`$ref`, array, object, enum, `allOf`, `oneOf`, `anyOf`,
//! declared primitive type) so documents that mix hints, such as an `enum`
//! beside `type: string`, ingest deterministically. Everything downstream
//! matches on the committed kind and never re-inspects raw JSON.

use anyhow::Context;
use oas3::OpenApiV3Spec;
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use super::types::{
    AdditionalProperties, CompositionOp, Constraints, Format, PrimitiveKind, SchemaDictionary,
    SchemaKind, SchemaNode,
};
use indexmap::IndexMap;

impl SchemaNode {
    /// Ingest a raw schema value into a typed node.
    ///
    /// Never fails: malformed input degrades to [`SchemaKind::Unknown`] and an
    /// explicitly empty `{}` schema becomes [`SchemaKind::Untyped`]. OpenAPI
    /// 3.1 null spellings (`type: [T, "null"]`, or a two-member `oneOf` /
    /// `anyOf` with a `type: "null"` member) collapse to the inner shape with
    /// the `nullable` flag set.
    #[must_use]
    pub fn from_value(value: &Value) -> SchemaNode {
        let Some(obj) = value.as_object() else {
            return SchemaNode::unknown();
        };

        let (types, null_in_type_list) = declared_types(obj);

        if let Some(raw) = str_entry(obj, "$ref") {
            let mut node = SchemaNode::new(SchemaKind::Reference(raw.to_string()));
            // Sibling metadata beside a $ref is legal in 3.1; keep it so a
            // referencing property can override the target's description.
            apply_metadata(&mut node, obj);
            node.nullable = bool_entry(obj, "nullable");
            return node;
        }

        let kind = if types.contains(&"array") || obj.contains_key("items") {
            ingest_array(obj)
        } else if obj.contains_key("properties")
            || types.contains(&"object")
            || obj.contains_key("additionalProperties")
        {
            ingest_object(obj)
        } else if let Some(values) = obj.get("enum").and_then(Value::as_array) {
            SchemaKind::Enum(values.clone())
        } else if let Some(members) = obj.get("allOf").and_then(Value::as_array) {
            SchemaKind::Composition {
                op: CompositionOp::AllOf,
                members: ingest_members(members),
            }
        } else if let Some(members) = obj.get("oneOf").and_then(Value::as_array) {
            if let Some(node) = nullable_union(obj, members) {
                return node;
            }
            SchemaKind::Composition {
                op: CompositionOp::OneOf,
                members: ingest_members(members),
            }
        } else if let Some(members) = obj.get("anyOf").and_then(Value::as_array) {
            if let Some(node) = nullable_union(obj, members) {
                return node;
            }
            SchemaKind::Composition {
                op: CompositionOp::AnyOf,
                members: ingest_members(members),
            }
        } else {
            declared_kind(obj, &types, null_in_type_list)
        };

        let mut node = SchemaNode::new(kind);
        apply_metadata(&mut node, obj);
        node.nullable = null_in_type_list || bool_entry(obj, "nullable");
        node
    }
}

/// Non-null entries of the `type` field, plus whether `"null"` appeared in a
/// type list.
fn declared_types(obj: &Map<String, Value>) -> (Vec<&str>, bool) {
    match obj.get("type") {
        Some(Value::String(single)) => (vec![single.as_str()], false),
        Some(Value::Array(list)) => {
            let mut types = Vec::new();
            let mut saw_null = false;
            for entry in list {
                match entry.as_str() {
                    Some("null") => saw_null = true,
                    Some(token) => types.push(token),
                    None => {}
                }
            }
            (types, saw_null)
        }
        _ => (Vec::new(), false),
    }
}

fn ingest_array(obj: &Map<String, Value>) -> SchemaKind {
    SchemaKind::Array {
        items: obj
            .get("items")
            .map(|items| Box::new(SchemaNode::from_value(items))),
        min_items: u64_entry(obj, "minItems"),
        max_items: u64_entry(obj, "maxItems"),
        unique_items: bool_entry(obj, "uniqueItems"),
    }
}

fn ingest_object(obj: &Map<String, Value>) -> SchemaKind {
    let properties: IndexMap<String, SchemaNode> = obj
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, prop)| (name.clone(), SchemaNode::from_value(prop)))
                .collect()
        })
        .unwrap_or_default();
    let required: Vec<String> = obj
        .get("required")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    SchemaKind::Object {
        properties,
        required,
        additional: ingest_additional(obj.get("additionalProperties")),
    }
}

fn ingest_additional(raw: Option<&Value>) -> AdditionalProperties {
    match raw {
        None => AdditionalProperties::Unspecified,
        Some(Value::Bool(true)) => AdditionalProperties::Allowed,
        Some(Value::Bool(false)) => AdditionalProperties::Denied,
        // An empty schema constrains nothing; treat it like `true`.
        Some(Value::Object(map)) if map.is_empty() => AdditionalProperties::Allowed,
        Some(value @ Value::Object(_)) => {
            AdditionalProperties::Schema(Box::new(SchemaNode::from_value(value)))
        }
        Some(_) => AdditionalProperties::Unspecified,
    }
}

fn ingest_members(members: &[Value]) -> Vec<SchemaNode> {
    members.iter().map(SchemaNode::from_value).collect()
}

/// Collapse a two-member union whose other arm is `type: "null"` into the
/// non-null member with `nullable` set. Metadata on the outer wrapper wins
/// over the inner member's.
fn nullable_union(obj: &Map<String, Value>, members: &[Value]) -> Option<SchemaNode> {
    if members.len() != 2 {
        return None;
    }
    let inner = match (is_null_schema(&members[0]), is_null_schema(&members[1])) {
        (true, false) => &members[1],
        (false, true) => &members[0],
        _ => return None,
    };
    let mut node = SchemaNode::from_value(inner);
    node.nullable = true;
    apply_metadata(&mut node, obj);
    Some(node)
}

fn is_null_schema(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some("null")
}

fn declared_kind(obj: &Map<String, Value>, types: &[&str], null_in_type_list: bool) -> SchemaKind {
    match types {
        [] if null_in_type_list => SchemaKind::Primitive {
            kind: PrimitiveKind::Null,
            constraints: Constraints::default(),
        },
        [] if obj.contains_key("type") => SchemaKind::Unknown,
        [] => SchemaKind::Untyped,
        [single] => match primitive_kind(single) {
            Some(kind) => SchemaKind::Primitive {
                kind,
                constraints: parse_constraints(obj),
            },
            None => {
                debug!(declared = %single, "unrecognized type, degrading to unknown");
                SchemaKind::Unknown
            }
        },
        many => SchemaKind::Composition {
            op: CompositionOp::OneOf,
            members: many
                .iter()
                .map(|token| match primitive_kind(token) {
                    Some(kind) => SchemaNode::new(SchemaKind::Primitive {
                        kind,
                        constraints: parse_constraints(obj),
                    }),
                    None => SchemaNode::unknown(),
                })
                .collect(),
        },
    }
}

fn primitive_kind(token: &str) -> Option<PrimitiveKind> {
    match token {
        "string" => Some(PrimitiveKind::String),
        "number" => Some(PrimitiveKind::Number),
        "integer" => Some(PrimitiveKind::Integer),
        "boolean" => Some(PrimitiveKind::Boolean),
        "null" => Some(PrimitiveKind::Null),
        _ => None,
    }
}

fn parse_constraints(obj: &Map<String, Value>) -> Constraints {
    Constraints {
        minimum: number_entry(obj, "minimum"),
        maximum: number_entry(obj, "maximum"),
        multiple_of: number_entry(obj, "multipleOf"),
        min_length: u64_entry(obj, "minLength"),
        max_length: u64_entry(obj, "maxLength"),
        pattern: str_entry(obj, "pattern").map(String::from),
    }
}

/// Fill in metadata fields present on `obj`. Fields absent from `obj` are left
/// untouched, so this doubles as the overlay step for collapsed unions.
fn apply_metadata(node: &mut SchemaNode, obj: &Map<String, Value>) {
    if let Some(format) = str_entry(obj, "format") {
        node.format = Some(Format::parse(format));
    }
    if let Some(title) = str_entry(obj, "title") {
        node.title = Some(title.to_string());
    }
    if let Some(description) = str_entry(obj, "description") {
        node.description = Some(description.to_string());
    }
    if let Some(example) = example_entry(obj) {
        node.example = Some(example);
    }
    if let Some(default) = obj.get("default") {
        node.default_value = Some(default.clone());
    }
    if let Some(hint) = str_entry(obj, "x-input-type") {
        node.input_hint = Some(hint.to_string());
    }
}

fn str_entry<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

fn bool_entry(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn u64_entry(obj: &Map<String, Value>, key: &str) -> Option<u64> {
    obj.get(key).and_then(Value::as_u64)
}

fn number_entry(obj: &Map<String, Value>, key: &str) -> Option<Number> {
    match obj.get(key) {
        Some(Value::Number(number)) => Some(number.clone()),
        _ => None,
    }
}

/// `example` (3.0) wins over the first entry of `examples` (3.1).
fn example_entry(obj: &Map<String, Value>) -> Option<Value> {
    obj.get("example").cloned().or_else(|| {
        obj.get("examples")
            .and_then(Value::as_array)
            .and_then(|list| list.first().cloned())
    })
}

impl SchemaDictionary {
    /// Build a dictionary from a parsed document.
    ///
    /// Named schemas are read from `components.schemas` (OpenAPI 3.x) and then
    /// `definitions` (Swagger 2 and bare JSON Schema), keeping the first entry
    /// when a name appears in both. Insertion order follows the document, so
    /// generated modules come out in declared order.
    #[must_use]
    pub fn from_document(document: Value) -> SchemaDictionary {
        let mut schemas: IndexMap<String, SchemaNode> = IndexMap::new();
        for source in ["/components/schemas", "/definitions"] {
            let Some(Value::Object(entries)) = document.pointer(source) else {
                continue;
            };
            for (name, raw) in entries {
                if !raw.is_object() {
                    warn!(schema = %name, "skipping non-object schema entry");
                    continue;
                }
                schemas
                    .entry(name.clone())
                    .or_insert_with(|| SchemaNode::from_value(raw));
            }
        }
        debug!(schemas = schemas.len(), "schema dictionary built");
        SchemaDictionary { schemas, document }
    }

    /// Parse a JSON document and build its dictionary.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid JSON. A valid document with
    /// no named schemas is not an error; it yields an empty dictionary.
    pub fn from_json(raw: &str) -> anyhow::Result<SchemaDictionary> {
        let document: Value = serde_json::from_str(raw).context("failed to parse JSON document")?;
        Ok(SchemaDictionary::from_document(document))
    }

    /// Parse a YAML document and build its dictionary.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid YAML.
    pub fn from_yaml(raw: &str) -> anyhow::Result<SchemaDictionary> {
        let document: Value = serde_yaml::from_str(raw).context("failed to parse YAML document")?;
        Ok(SchemaDictionary::from_document(document))
    }

    /// Build a dictionary from an already-parsed OpenAPI specification.
    ///
    /// The spec model stores components in sorted maps, so declared order is
    /// not preserved on this path; schemas come out alphabetically. Use
    /// [`SchemaDictionary::from_yaml`] or [`SchemaDictionary::from_json`] when
    /// declaration order matters.
    ///
    /// # Errors
    ///
    /// Returns an error if the spec cannot be re-serialized to JSON.
    pub fn from_spec(spec: &OpenApiV3Spec) -> anyhow::Result<SchemaDictionary> {
        let document =
            serde_json::to_value(spec).context("failed to serialize OpenAPI document")?;
        Ok(SchemaDictionary::from_document(document))
    }

    /// Assemble a dictionary from loose named schemas, in iteration order.
    /// The retained document is [`Value::Null`].
    #[must_use]
    pub fn from_named_schemas<I, N>(schemas: I) -> SchemaDictionary
    where
        I: IntoIterator<Item = (N, SchemaNode)>,
        N: Into<String>,
    {
        SchemaDictionary {
            schemas: schemas
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
            document: Value::Null,
        }
    }
}
