//! Runtime validation-expression emission, in the Zod dialect.
//!
//! Mirrors the structure of [`crate::typescript`]: the same closed set of
//! shapes, the same degradations, the same reference-by-name policy. The one
//! structural addition is cycle handling, because unlike a type alias a
//! validator is a runtime value; cyclic declarations must be wrapped in
//! `z.lazy` and carry an explicit type annotation to break the inference
//! cycle.

use crate::graph::{detect_circular_references, topological_order};
use crate::schema::{
    extract_schema_name, AdditionalProperties, CompositionOp, Constraints, Format, PrimitiveKind,
    SchemaDictionary, SchemaKind, SchemaNode,
};
use crate::typescript::{literal_token, pascal_type_name, property_key};
use serde_json::Value;
use tracing::debug;

const MODULE_HEADER: &str = "// Generated Zod validators.\n\
                             // Regenerate from the source document instead of editing by hand.\n\
                             \nimport { z } from 'zod';\n";

/// Options controlling validator emission.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    /// Emit `.strict()` for objects that declare `additionalProperties:
    /// false`, rejecting unknown keys at parse time.
    pub strict: bool,
}

/// Convert a schema node to a Zod validation expression.
///
/// Constraint chains are emitted in a fixed order (`.min`, `.max`, then
/// `.regex` or `.multipleOf`) so output is reproducible. A recognized string
/// format replaces the length and pattern chain entirely; the format is the
/// stronger statement about the value's shape.
///
/// # Arguments
///
/// * `node` - The schema to translate
/// * `dict` - Dictionary used to check reference targets
/// * `options` - Emission options
///
/// # Returns
///
/// A Zod expression, e.g. `z.object({ name: z.string() }).strict()`.
#[must_use]
pub fn zod_schema(node: &SchemaNode, dict: &SchemaDictionary, options: &ValidationOptions) -> String {
    let base = match &node.kind {
        SchemaKind::Unknown => "z.any()".to_string(),
        SchemaKind::Untyped => "z.record(z.any())".to_string(),
        SchemaKind::Reference(raw) => reference_validator(raw, dict),
        SchemaKind::Array {
            items,
            min_items,
            max_items,
            ..
        } => {
            let item = items
                .as_ref()
                .map(|items| zod_schema(items, dict, options))
                .unwrap_or_else(|| "z.any()".to_string());
            let mut expr = format!("z.array({item})");
            if let Some(min) = min_items {
                expr.push_str(&format!(".min({min})"));
            }
            if let Some(max) = max_items {
                expr.push_str(&format!(".max({max})"));
            }
            expr
        }
        SchemaKind::Object {
            properties,
            required,
            additional,
        } => object_validator(properties, required, additional, dict, options),
        SchemaKind::Enum(values) => enum_validator(values),
        SchemaKind::Composition { op, members } => {
            composition_validator(*op, members, dict, options)
        }
        SchemaKind::Primitive { kind, constraints } => {
            primitive_validator(*kind, constraints, node.format.as_ref())
        }
    };
    if node.nullable && base != "z.null()" && !base.ends_with(".nullable()") {
        format!("{base}.nullable()")
    } else {
        base
    }
}

fn reference_validator(raw: &str, dict: &SchemaDictionary) -> String {
    match extract_schema_name(raw) {
        Some(name) => {
            if !dict.contains(&name) {
                debug!(reference = %raw, "reference target missing from dictionary");
            }
            format!("{}Schema", pascal_type_name(&name))
        }
        None => {
            debug!(reference = %raw, "unsupported reference form, emitting z.any()");
            "z.any()".to_string()
        }
    }
}

fn object_validator(
    properties: &indexmap::IndexMap<String, SchemaNode>,
    required: &[String],
    additional: &AdditionalProperties,
    dict: &SchemaDictionary,
    options: &ValidationOptions,
) -> String {
    if properties.is_empty() {
        if let AdditionalProperties::Schema(extra) = additional {
            return format!("z.record({})", zod_schema(extra, dict, options));
        }
        return "z.record(z.any())".to_string();
    }
    let entries: Vec<String> = properties
        .iter()
        .map(|(name, prop)| {
            let mut validator = zod_schema(prop, dict, options);
            if !required.iter().any(|r| r == name) {
                validator.push_str(".optional()");
            }
            format!("{}: {validator}", property_key(name))
        })
        .collect();
    let mut expr = format!("z.object({{ {} }})", entries.join(", "));
    match additional {
        AdditionalProperties::Schema(extra) => {
            expr.push_str(&format!(".catchall({})", zod_schema(extra, dict, options)));
        }
        AdditionalProperties::Denied if options.strict => expr.push_str(".strict()"),
        _ => {}
    }
    expr
}

fn enum_validator(values: &[Value]) -> String {
    if values.is_empty() {
        return "z.any()".to_string();
    }
    if values.iter().all(Value::is_string) {
        let members: Vec<String> = values.iter().map(literal_token).collect();
        return format!("z.enum([{}])", members.join(", "));
    }
    let literals: Vec<String> = values
        .iter()
        .map(|value| format!("z.literal({})", literal_token(value)))
        .collect();
    if let [only] = literals.as_slice() {
        return only.clone();
    }
    format!("z.union([{}])", literals.join(", "))
}

fn composition_validator(
    op: CompositionOp,
    members: &[SchemaNode],
    dict: &SchemaDictionary,
    options: &ValidationOptions,
) -> String {
    if members.is_empty() {
        return "z.any()".to_string();
    }
    let rendered: Vec<String> = members
        .iter()
        .map(|member| zod_schema(member, dict, options))
        .collect();
    if let [only] = rendered.as_slice() {
        return only.clone();
    }
    match op {
        CompositionOp::AllOf => {
            let mut parts = rendered.into_iter();
            let first = parts.next().unwrap_or_default();
            parts.fold(first, |acc, next| format!("{acc}.and({next})"))
        }
        CompositionOp::OneOf | CompositionOp::AnyOf => {
            format!("z.union([{}])", rendered.join(", "))
        }
    }
}

fn primitive_validator(
    kind: PrimitiveKind,
    constraints: &Constraints,
    format: Option<&Format>,
) -> String {
    match kind {
        PrimitiveKind::String => string_validator(constraints, format),
        PrimitiveKind::Integer => number_validator(constraints, true),
        PrimitiveKind::Number => number_validator(constraints, false),
        PrimitiveKind::Boolean => "z.boolean()".to_string(),
        PrimitiveKind::Null => "z.null()".to_string(),
    }
}

fn string_validator(constraints: &Constraints, format: Option<&Format>) -> String {
    if let Some(expr) = format.and_then(format_validator) {
        return expr.to_string();
    }
    let mut expr = String::from("z.string()");
    if let Some(min) = constraints.min_length {
        expr.push_str(&format!(".min({min})"));
    }
    if let Some(max) = constraints.max_length {
        expr.push_str(&format!(".max({max})"));
    }
    if let Some(pattern) = &constraints.pattern {
        expr.push_str(&format!(".regex(/{}/)", pattern.replace('/', "\\/")));
    }
    expr
}

fn format_validator(format: &Format) -> Option<&'static str> {
    match format {
        Format::Email => Some("z.string().email()"),
        Format::Uuid => Some("z.string().uuid()"),
        Format::Uri | Format::Url => Some("z.string().url()"),
        Format::DateTime => Some("z.string().datetime()"),
        Format::Date => Some("z.string().date()"),
        Format::Time => Some("z.string().time()"),
        Format::Byte => Some("z.string().base64()"),
        Format::Binary => Some("z.instanceof(Blob)"),
        _ => None,
    }
}

fn number_validator(constraints: &Constraints, integer: bool) -> String {
    let mut expr = String::from(if integer {
        "z.number().int()"
    } else {
        "z.number()"
    });
    if let Some(min) = &constraints.minimum {
        expr.push_str(&format!(".min({min})"));
    }
    if let Some(max) = &constraints.maximum {
        expr.push_str(&format!(".max({max})"));
    }
    if let Some(step) = &constraints.multiple_of {
        expr.push_str(&format!(".multipleOf({step})"));
    }
    expr
}

/// Render one `export const` validator declaration for a named schema.
///
/// Cyclic schemas are wrapped in `z.lazy` with an explicit `z.ZodType`
/// annotation, so the declaration parses regardless of where its dependencies
/// sit in the module.
#[must_use]
pub fn zod_declaration(
    name: &str,
    node: &SchemaNode,
    dict: &SchemaDictionary,
    options: &ValidationOptions,
) -> String {
    let cyclic = detect_circular_references(dict);
    declaration(name, node, dict, options, cyclic.contains(name))
}

fn declaration(
    name: &str,
    node: &SchemaNode,
    dict: &SchemaDictionary,
    options: &ValidationOptions,
    cyclic: bool,
) -> String {
    let type_name = pascal_type_name(name);
    let expr = zod_schema(node, dict, options);
    if cyclic {
        format!("export const {type_name}Schema: z.ZodType<{type_name}> = z.lazy(() => {expr});")
    } else {
        format!("export const {type_name}Schema = {expr};")
    }
}

/// Render the complete validator module for a dictionary.
///
/// Declarations come out in dependency order so each validator's dependencies
/// are declared above it; cycle members stay in declared order and are all
/// lazy, which makes the module parse and evaluate cleanly.
#[must_use]
pub fn render_validator_module(dict: &SchemaDictionary, options: &ValidationOptions) -> String {
    let cyclic = detect_circular_references(dict);
    let mut out = String::from(MODULE_HEADER);
    for name in topological_order(dict) {
        if let Some(node) = dict.get(&name) {
            out.push('\n');
            out.push_str(&declaration(&name, node, dict, options, cyclic.contains(&name)));
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> SchemaNode {
        SchemaNode::from_value(&value)
    }

    fn render(value: serde_json::Value) -> String {
        zod_schema(
            &node(value),
            &SchemaDictionary::default(),
            &ValidationOptions::default(),
        )
    }

    #[test]
    fn string_constraints_chain_in_fixed_order() {
        assert_eq!(
            render(json!({
                "type": "string",
                "minLength": 2,
                "maxLength": 50,
                "pattern": "^[a-z]+$"
            })),
            "z.string().min(2).max(50).regex(/^[a-z]+$/)"
        );
    }

    #[test]
    fn recognized_format_replaces_the_constraint_chain() {
        assert_eq!(
            render(json!({ "type": "string", "format": "email", "maxLength": 99 })),
            "z.string().email()"
        );
        assert_eq!(
            render(json!({ "type": "string", "format": "binary" })),
            "z.instanceof(Blob)"
        );
    }

    #[test]
    fn integer_bounds_render_without_decimal_points() {
        assert_eq!(
            render(json!({ "type": "integer", "minimum": 0, "maximum": 150 })),
            "z.number().int().min(0).max(150)"
        );
        assert_eq!(
            render(json!({ "type": "number", "multipleOf": 0.5 })),
            "z.number().multipleOf(0.5)"
        );
    }

    #[test]
    fn pattern_slashes_are_escaped_for_the_literal() {
        assert_eq!(
            render(json!({ "type": "string", "pattern": "a/b" })),
            r"z.string().regex(/a\/b/)"
        );
    }

    #[test]
    fn mixed_enums_fall_back_to_literal_unions() {
        assert_eq!(
            render(json!({ "enum": ["a", "b"] })),
            "z.enum(['a', 'b'])"
        );
        assert_eq!(
            render(json!({ "enum": ["a", 1] })),
            "z.union([z.literal('a'), z.literal(1)])"
        );
        assert_eq!(render(json!({ "enum": [true] })), "z.literal(true)");
    }

    #[test]
    fn strict_mode_only_fires_on_explicit_denial() {
        let denied = json!({
            "type": "object",
            "properties": { "id": { "type": "string" } },
            "required": ["id"],
            "additionalProperties": false
        });
        let strict = ValidationOptions { strict: true };
        let lax = ValidationOptions::default();
        let dict = SchemaDictionary::default();
        assert_eq!(
            zod_schema(&node(denied.clone()), &dict, &strict),
            "z.object({ id: z.string() }).strict()"
        );
        assert_eq!(
            zod_schema(&node(denied), &dict, &lax),
            "z.object({ id: z.string() })"
        );
        let open = json!({ "type": "object", "properties": { "id": { "type": "string" } } });
        assert_eq!(
            zod_schema(&node(open), &dict, &strict),
            "z.object({ id: z.string().optional() })"
        );
    }
}
