//! Form-field extraction and input-kind inference.
//!
//! Schemas carry enough signal to pick a sensible UI control for most fields:
//! formats, enum sizes, numeric bounds, and a few well-known property names.
//! [`determine_input_kind`] runs an ordered rule table over that signal, and
//! [`extract_form_fields`] lifts a whole object schema into renderable field
//! records with labels, options, and client-side validation rules attached.

use crate::schema::{
    Constraints, Format, PrimitiveKind, SchemaDictionary, SchemaKind, SchemaNode,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Property-name fragments that suggest long-form text regardless of type.
const MULTILINE_NAME_HINTS: [&str; 5] = ["description", "note", "comment", "content", "body"];

/// Enums up to this size render as radio groups; larger ones as dropdowns.
const RADIO_OPTION_LIMIT: usize = 3;

/// Strings allowed to grow past this length render as textareas.
const TEXTAREA_LENGTH_THRESHOLD: u64 = 255;

/// UI input control tags. Serialized names double as the `x-input-type`
/// vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputKind {
    File,
    Date,
    DateTime,
    Time,
    Email,
    Url,
    Password,
    Radio,
    Select,
    Checkbox,
    Textarea,
    Color,
    Range,
    Number,
    Text,
}

impl InputKind {
    /// Parse an explicit `x-input-type` hint. Unrecognized hints return
    /// `None` so the caller can fall through to inference.
    #[must_use]
    pub fn from_hint(hint: &str) -> Option<InputKind> {
        let kind = match hint {
            "file" => InputKind::File,
            "date" => InputKind::Date,
            "date-time" => InputKind::DateTime,
            "time" => InputKind::Time,
            "email" => InputKind::Email,
            "url" => InputKind::Url,
            "password" => InputKind::Password,
            "radio" => InputKind::Radio,
            "select" => InputKind::Select,
            "checkbox" => InputKind::Checkbox,
            "textarea" => InputKind::Textarea,
            "color" => InputKind::Color,
            "range" => InputKind::Range,
            "number" => InputKind::Number,
            "text" => InputKind::Text,
            _ => return None,
        };
        Some(kind)
    }

    /// The serialized tag name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            InputKind::File => "file",
            InputKind::Date => "date",
            InputKind::DateTime => "date-time",
            InputKind::Time => "time",
            InputKind::Email => "email",
            InputKind::Url => "url",
            InputKind::Password => "password",
            InputKind::Radio => "radio",
            InputKind::Select => "select",
            InputKind::Checkbox => "checkbox",
            InputKind::Textarea => "textarea",
            InputKind::Color => "color",
            InputKind::Range => "range",
            InputKind::Number => "number",
            InputKind::Text => "text",
        }
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decide which input control a field should render as.
///
/// Rules run in a fixed order and the first match wins:
///
/// 1. a recognized `x-input-type` hint on the schema
/// 2. `binary` / `byte` format → file
/// 3. `date`, `date-time`, `time` formats → the matching picker
/// 4. `email` format → email, `uri` / `url` format → url
/// 5. `password` format or a name containing "password" → password
/// 6. enums → radio up to three options, dropdown beyond
/// 7. booleans → checkbox
/// 8. long strings (maxLength over 255) or names suggesting prose → textarea
/// 9. `color` format or a name containing "color" → color picker
/// 10. numbers with both bounds → range slider, otherwise number
/// 11. everything else → text
///
/// Name matching is case-insensitive.
#[must_use]
pub fn determine_input_kind(node: &SchemaNode, field_name: &str) -> InputKind {
    if let Some(hint) = &node.input_hint {
        if let Some(kind) = InputKind::from_hint(hint) {
            return kind;
        }
        debug!(hint = %hint, field = %field_name, "unrecognized input hint, inferring instead");
    }
    let name = field_name.to_ascii_lowercase();
    match node.format.as_ref() {
        Some(Format::Binary | Format::Byte) => return InputKind::File,
        Some(Format::Date) => return InputKind::Date,
        Some(Format::DateTime) => return InputKind::DateTime,
        Some(Format::Time) => return InputKind::Time,
        Some(Format::Email) => return InputKind::Email,
        Some(Format::Uri | Format::Url) => return InputKind::Url,
        Some(Format::Password) => return InputKind::Password,
        _ => {}
    }
    if name.contains("password") {
        return InputKind::Password;
    }
    if let SchemaKind::Enum(values) = &node.kind {
        if !values.is_empty() {
            return if values.len() <= RADIO_OPTION_LIMIT {
                InputKind::Radio
            } else {
                InputKind::Select
            };
        }
    }
    if matches!(
        node.kind,
        SchemaKind::Primitive {
            kind: PrimitiveKind::Boolean,
            ..
        }
    ) {
        return InputKind::Checkbox;
    }
    if is_multiline(node, &name) {
        return InputKind::Textarea;
    }
    if matches!(node.format, Some(Format::Color)) || name.contains("color") {
        return InputKind::Color;
    }
    if let SchemaKind::Primitive {
        kind: PrimitiveKind::Number | PrimitiveKind::Integer,
        constraints,
    } = &node.kind
    {
        if constraints.minimum.is_some() && constraints.maximum.is_some() {
            return InputKind::Range;
        }
        return InputKind::Number;
    }
    InputKind::Text
}

fn is_multiline(node: &SchemaNode, lowercase_name: &str) -> bool {
    if MULTILINE_NAME_HINTS
        .iter()
        .any(|hint| lowercase_name.contains(hint))
    {
        return true;
    }
    matches!(
        &node.kind,
        SchemaKind::Primitive {
            kind: PrimitiveKind::String,
            constraints: Constraints {
                max_length: Some(max),
                ..
            },
        } if *max > TEXTAREA_LENGTH_THRESHOLD
    )
}

/// A selectable option derived from an enum value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOption {
    pub value: Value,
    pub label: String,
}

/// Client-side validation rules carried alongside a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<serde_json::Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<serde_json::Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<serde_json::Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
}

/// One renderable form field extracted from an object schema property.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Property name, verbatim.
    pub name: String,
    /// Human-readable label: the schema `title`, or the humanized name.
    pub label: String,
    pub kind: InputKind,
    pub required: bool,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    pub rules: FieldRules,
}

/// Extract form fields from an object schema, one per property in declared
/// order.
///
/// Reference properties are resolved through the dictionary so the field
/// reflects the target's shape; metadata declared at the referencing site
/// still wins over the target's. Non-object schemas yield no fields.
#[must_use]
pub fn extract_form_fields(node: &SchemaNode, dict: &SchemaDictionary) -> Vec<FormField> {
    let SchemaKind::Object {
        properties,
        required,
        ..
    } = &node.kind
    else {
        return Vec::new();
    };
    properties
        .iter()
        .map(|(name, prop)| {
            let resolved = match prop.ref_path() {
                Some(raw) => dict.resolve_deep(raw),
                None => None,
            };
            let schema = resolved.unwrap_or(prop);
            build_field(name, prop, schema, required.iter().any(|r| r == name))
        })
        .collect()
}

fn build_field(name: &str, prop: &SchemaNode, schema: &SchemaNode, required: bool) -> FormField {
    let kind = prop
        .input_hint
        .as_deref()
        .and_then(InputKind::from_hint)
        .unwrap_or_else(|| determine_input_kind(schema, name));
    FormField {
        name: name.to_string(),
        label: prop
            .title
            .clone()
            .or_else(|| schema.title.clone())
            .unwrap_or_else(|| humanize(name)),
        kind,
        required,
        nullable: prop.nullable || schema.nullable,
        help_text: prop
            .description
            .clone()
            .or_else(|| schema.description.clone()),
        placeholder: prop
            .example
            .as_ref()
            .or(schema.example.as_ref())
            .map(placeholder_text),
        options: enum_options(schema),
        rules: field_rules(schema),
    }
}

/// Turn a property name into a sentence-case label: `user_name` and
/// `userName` both become `User name`.
fn humanize(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for raw in name.split(|c: char| c == '_' || c == '-' || c == '.' || c == ' ') {
        if raw.is_empty() {
            continue;
        }
        let mut current = String::new();
        let mut prev_lower = false;
        for c in raw.chars() {
            if c.is_uppercase() && prev_lower {
                words.push(current.to_ascii_lowercase());
                current = String::new();
            }
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current.to_ascii_lowercase());
        }
    }
    if words.is_empty() {
        return name.to_string();
    }
    let label = words.join(" ");
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => label,
    }
}

fn placeholder_text(example: &Value) -> String {
    match example {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn enum_options(schema: &SchemaNode) -> Vec<FieldOption> {
    let SchemaKind::Enum(values) = &schema.kind else {
        return Vec::new();
    };
    values
        .iter()
        .map(|value| FieldOption {
            value: value.clone(),
            label: match value {
                Value::String(text) => humanize(text),
                other => other.to_string(),
            },
        })
        .collect()
}

fn field_rules(schema: &SchemaNode) -> FieldRules {
    let mut rules = FieldRules::default();
    match &schema.kind {
        SchemaKind::Primitive { constraints, .. } => {
            rules.min = constraints.minimum.clone();
            rules.max = constraints.maximum.clone();
            rules.min_length = constraints.min_length;
            rules.max_length = constraints.max_length;
            rules.pattern = constraints.pattern.clone();
            rules.multiple_of = constraints.multiple_of.clone();
        }
        SchemaKind::Array {
            min_items,
            max_items,
            ..
        } => {
            rules.min_items = *min_items;
            rules.max_items = *max_items;
        }
        _ => {}
    }
    rules
}
