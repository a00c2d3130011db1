//! TypeScript type-expression emission.
//!
//! Converts [`SchemaNode`] trees into TypeScript source text. References are
//! emitted as bare PascalCase identifiers rather than expanded inline, which
//! is what keeps recursive schemas finite: the expression for a node only ever
//! descends into schemas it structurally contains.
//!
//! Emission is pure string assembly over an immutable dictionary, so calling
//! any function here twice yields identical output.

use crate::schema::{
    extract_schema_name, AdditionalProperties, CompositionOp, Format, PrimitiveKind,
    SchemaDictionary, SchemaKind, SchemaNode,
};
use serde_json::Value;
use tracing::debug;

/// Prefix applied to sanitized names that would otherwise start with a digit
/// or come out empty.
const NAME_PREFIX: &str = "Schema";

const MODULE_HEADER: &str = "// Generated TypeScript definitions.\n\
                             // Regenerate from the source document instead of editing by hand.\n";

/// Convert a schema node to a TypeScript type expression.
///
/// Unresolvable shapes degrade to `any` rather than failing; a reference whose
/// target is missing from the dictionary still emits the PascalCase name, so
/// the gap surfaces as a compile error in the generated module instead of
/// silently widening the type.
///
/// # Arguments
///
/// * `node` - The schema to translate
/// * `dict` - Dictionary used to check reference targets
///
/// # Returns
///
/// A TypeScript type expression, e.g. `{ name: string; tag?: string; }`.
#[must_use]
pub fn ts_type(node: &SchemaNode, dict: &SchemaDictionary) -> String {
    let base = match &node.kind {
        SchemaKind::Unknown => "any".to_string(),
        SchemaKind::Untyped => "Record<string, any>".to_string(),
        SchemaKind::Reference(raw) => reference_type(raw, dict),
        SchemaKind::Array { items, .. } => {
            let item = items
                .as_ref()
                .map(|items| ts_type(items, dict))
                .unwrap_or_else(|| "any".to_string());
            format!("{}[]", parenthesized(&item))
        }
        SchemaKind::Object {
            properties,
            required,
            additional,
        } => object_type(node.nullable, properties, required, additional, dict),
        SchemaKind::Enum(values) => enum_type(values),
        SchemaKind::Composition { op, members } => composition_type(*op, members, dict),
        SchemaKind::Primitive { kind, .. } => primitive_type(*kind, node.format.as_ref()),
    };
    apply_nullable(base, node.nullable)
}

/// Append `| null` unless the expression already admits null.
fn apply_nullable(expr: String, nullable: bool) -> String {
    if !nullable || expr == "null" || expr.ends_with("| null") {
        return expr;
    }
    format!("{expr} | null")
}

fn reference_type(raw: &str, dict: &SchemaDictionary) -> String {
    match extract_schema_name(raw) {
        Some(name) => {
            if !dict.contains(&name) {
                debug!(reference = %raw, "reference target missing from dictionary");
            }
            pascal_type_name(&name)
        }
        None => {
            debug!(reference = %raw, "unsupported reference form, emitting any");
            "any".to_string()
        }
    }
}

fn object_type(
    nullable: bool,
    properties: &indexmap::IndexMap<String, SchemaNode>,
    required: &[String],
    additional: &AdditionalProperties,
    dict: &SchemaDictionary,
) -> String {
    if properties.is_empty() {
        if let AdditionalProperties::Schema(extra) = additional {
            return format!("{{ [key: string]: {}; }}", ts_type(extra, dict));
        }
        return "Record<string, any>".to_string();
    }
    let mut parts: Vec<String> = Vec::with_capacity(properties.len() + 1);
    for (name, prop) in properties {
        let marker = if required.iter().any(|r| r == name) {
            ""
        } else {
            "?"
        };
        let mut ty = ts_type(prop, dict);
        // A nullable object admits null for each of its members' values.
        if nullable {
            ty = apply_nullable(ty, true);
        }
        parts.push(format!("{}{marker}: {ty};", property_key(name)));
    }
    if let AdditionalProperties::Schema(extra) = additional {
        parts.push(format!("[key: string]: {};", ts_type(extra, dict)));
    }
    format!("{{ {} }}", parts.join(" "))
}

fn enum_type(values: &[Value]) -> String {
    if values.is_empty() {
        return "any".to_string();
    }
    values
        .iter()
        .map(literal_token)
        .collect::<Vec<_>>()
        .join(" | ")
}

fn composition_type(op: CompositionOp, members: &[SchemaNode], dict: &SchemaDictionary) -> String {
    if members.is_empty() {
        return "any".to_string();
    }
    let rendered: Vec<String> = members.iter().map(|member| ts_type(member, dict)).collect();
    match op {
        CompositionOp::AllOf => rendered
            .iter()
            .map(|expr| parenthesized(expr))
            .collect::<Vec<_>>()
            .join(" & "),
        CompositionOp::OneOf | CompositionOp::AnyOf => rendered.join(" | "),
    }
}

fn primitive_type(kind: PrimitiveKind, format: Option<&Format>) -> String {
    if let Some(mapped) = format.and_then(format_type) {
        return mapped.to_string();
    }
    match kind {
        PrimitiveKind::String => "string",
        PrimitiveKind::Number | PrimitiveKind::Integer => "number",
        PrimitiveKind::Boolean => "boolean",
        PrimitiveKind::Null => "null",
    }
    .to_string()
}

fn format_type(format: &Format) -> Option<&'static str> {
    match format {
        Format::Date
        | Format::DateTime
        | Format::Time
        | Format::Email
        | Format::Uuid
        | Format::Uri
        | Format::Url
        | Format::Hostname
        | Format::Ipv4
        | Format::Ipv6
        | Format::Password => Some("string"),
        Format::Binary | Format::Byte => Some("Blob"),
        Format::Int64 => Some("bigint"),
        Format::Int32 | Format::Float | Format::Double => Some("number"),
        Format::Color | Format::Other(_) => None,
    }
}

/// Wrap a subexpression in parentheses when it contains a union or
/// intersection, so `[]` suffixes and `&` joins bind to the whole expression.
fn parenthesized(expr: &str) -> String {
    if expr.contains(" | ") || expr.contains(" & ") {
        format!("({expr})")
    } else {
        expr.to_string()
    }
}

/// Render an enum value as a TypeScript literal token.
pub(crate) fn literal_token(value: &Value) -> String {
    match value {
        Value::String(text) => format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'")),
        other => other.to_string(),
    }
}

/// Quote a property name unless it is already a valid identifier.
pub(crate) fn property_key(name: &str) -> String {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_' || first == '$')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        None => false,
    };
    if valid {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "\\'"))
    }
}

/// Normalize a schema name into a PascalCase TypeScript identifier.
///
/// Words are split on non-alphanumeric characters and capitalized; all-caps
/// acronym runs are kept as-is (`API_Response` becomes `APIResponse`). Names
/// that sanitize to nothing become `Schema`, and names that would start with
/// a digit get the same prefix, since TypeScript identifiers cannot start
/// with a digit.
#[must_use]
pub fn pascal_type_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in name.split(|c: char| !c.is_ascii_alphanumeric()) {
        if word.is_empty() {
            continue;
        }
        if is_acronym(word) {
            out.push_str(word);
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    if out.is_empty() {
        return NAME_PREFIX.to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("{NAME_PREFIX}{out}");
    }
    out
}

fn is_acronym(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_alphabetic())
        && word
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .all(|c| c.is_ascii_uppercase())
}

/// Render one `export type` declaration for a named schema.
#[must_use]
pub fn ts_declaration(name: &str, node: &SchemaNode, dict: &SchemaDictionary) -> String {
    format!(
        "export type {} = {};",
        pascal_type_name(name),
        ts_type(node, dict)
    )
}

/// Render the complete type module for a dictionary, one declaration per
/// named schema in declared order. Schema descriptions become doc comments.
#[must_use]
pub fn render_type_module(dict: &SchemaDictionary) -> String {
    let mut out = String::from(MODULE_HEADER);
    for (name, node) in dict.iter() {
        out.push('\n');
        if let Some(description) = &node.description {
            out.push_str(&format!("/** {} */\n", description.replace("*/", "*\\/")));
        }
        out.push_str(&ts_declaration(name, node, dict));
        out.push('\n');
    }
    out
}
