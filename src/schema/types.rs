use indexmap::IndexMap;
use serde_json::{Number, Value};

/// Recognized primitive schema types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

/// Composition operators: `allOf` is an intersection, `oneOf` and `anyOf`
/// are unions of their member schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionOp {
    AllOf,
    OneOf,
    AnyOf,
}

impl CompositionOp {
    /// Document keyword for this operator.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            CompositionOp::AllOf => "allOf",
            CompositionOp::OneOf => "oneOf",
            CompositionOp::AnyOf => "anyOf",
        }
    }
}

impl std::fmt::Display for CompositionOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Recognized `format` values, with an [`Format::Other`] fallback so unknown
/// formats survive ingestion instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Format {
    Date,
    DateTime,
    Time,
    Email,
    Uuid,
    Uri,
    Url,
    Hostname,
    Ipv4,
    Ipv6,
    Password,
    Byte,
    Binary,
    Int32,
    Int64,
    Float,
    Double,
    Color,
    Other(String),
}

impl Format {
    /// Parse a raw `format` string into a typed value.
    #[must_use]
    pub fn parse(raw: &str) -> Format {
        match raw {
            "date" => Format::Date,
            "date-time" => Format::DateTime,
            "time" => Format::Time,
            "email" => Format::Email,
            "uuid" => Format::Uuid,
            "uri" => Format::Uri,
            "url" => Format::Url,
            "hostname" => Format::Hostname,
            "ipv4" => Format::Ipv4,
            "ipv6" => Format::Ipv6,
            "password" => Format::Password,
            "byte" => Format::Byte,
            "binary" => Format::Binary,
            "int32" => Format::Int32,
            "int64" => Format::Int64,
            "float" => Format::Float,
            "double" => Format::Double,
            "color" => Format::Color,
            other => Format::Other(other.to_string()),
        }
    }

    /// The document spelling of this format.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Format::Date => "date",
            Format::DateTime => "date-time",
            Format::Time => "time",
            Format::Email => "email",
            Format::Uuid => "uuid",
            Format::Uri => "uri",
            Format::Url => "url",
            Format::Hostname => "hostname",
            Format::Ipv4 => "ipv4",
            Format::Ipv6 => "ipv6",
            Format::Password => "password",
            Format::Byte => "byte",
            Format::Binary => "binary",
            Format::Int32 => "int32",
            Format::Int64 => "int64",
            Format::Float => "float",
            Format::Double => "double",
            Format::Color => "color",
            Format::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validation constraints attached to a primitive schema.
///
/// Numeric bounds keep the document's [`Number`] representation so integer
/// bounds render without a spurious decimal point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub multiple_of: Option<Number>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
}

impl Constraints {
    /// True when no constraint is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.minimum.is_none()
            && self.maximum.is_none()
            && self.multiple_of.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
    }
}

/// The `additionalProperties` field of an object schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AdditionalProperties {
    /// Field absent. Extra keys are tolerated but not typed.
    #[default]
    Unspecified,
    /// `true`, or an empty schema that constrains nothing.
    Allowed,
    /// `false`. Strict validators reject unknown keys.
    Denied,
    /// A schema every extra value must satisfy.
    Schema(Box<SchemaNode>),
}

/// The closed set of schema shapes, decided once at ingestion.
///
/// [`SchemaKind::Untyped`] and [`SchemaKind::Unknown`] are deliberately
/// distinct: an explicitly empty `{}` schema means "any shape" (an open map),
/// while absent or unrecognizable input means "no information at all".
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// A `$ref` pointer, stored raw. References are weak links by name; they
    /// never own their target.
    Reference(String),
    Primitive {
        kind: PrimitiveKind,
        constraints: Constraints,
    },
    /// Literal values in declaration order. Order is significant for the
    /// generated union type.
    Enum(Vec<Value>),
    Array {
        items: Option<Box<SchemaNode>>,
        min_items: Option<u64>,
        max_items: Option<u64>,
        unique_items: bool,
    },
    Object {
        /// Properties in document order.
        properties: IndexMap<String, SchemaNode>,
        required: Vec<String>,
        additional: AdditionalProperties,
    },
    Composition {
        op: CompositionOp,
        members: Vec<SchemaNode>,
    },
    /// An explicitly empty `{}` schema.
    Untyped,
    /// Absent, non-object, or unrecognizable input.
    Unknown,
}

/// A single node in the schema graph.
///
/// The shape lives in [`SchemaKind`]; everything else is an orthogonal
/// modifier. `format` sits on the node rather than inside the primitive
/// variant because input-kind inference consults it before it looks at the
/// shape (an enum of email addresses is still an email input).
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    /// The resolved type must admit a null value.
    pub nullable: bool,
    pub format: Option<Format>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub example: Option<Value>,
    pub default_value: Option<Value>,
    /// Explicit `x-input-type` override for form rendering.
    pub input_hint: Option<String>,
}

impl SchemaNode {
    /// Create a node of the given kind with no modifiers set.
    #[must_use]
    pub fn new(kind: SchemaKind) -> SchemaNode {
        SchemaNode {
            kind,
            nullable: false,
            format: None,
            title: None,
            description: None,
            example: None,
            default_value: None,
            input_hint: None,
        }
    }

    /// The degraded node used for absent or unrecognizable input.
    #[must_use]
    pub fn unknown() -> SchemaNode {
        SchemaNode::new(SchemaKind::Unknown)
    }

    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self.kind, SchemaKind::Reference(_))
    }

    /// The raw reference path, if this node is a reference.
    #[must_use]
    pub fn ref_path(&self) -> Option<&str> {
        match &self.kind {
            SchemaKind::Reference(raw) => Some(raw),
            _ => None,
        }
    }
}

impl Default for SchemaNode {
    fn default() -> SchemaNode {
        SchemaNode::unknown()
    }
}

/// The read-only name → schema map built once per generation run.
///
/// Iteration order is the document's declared order, which makes every
/// rendered module reproducible. The raw document is retained so callers can
/// walk arbitrary `#/...` paths through [`SchemaDictionary::pointer`].
#[derive(Debug, Clone, Default)]
pub struct SchemaDictionary {
    pub(crate) schemas: IndexMap<String, SchemaNode>,
    pub(crate) document: Value,
}

impl SchemaDictionary {
    /// Look up a schema by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Schema names in declared order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Name and schema pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.schemas.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Add a schema under a name, replacing any previous entry.
    ///
    /// Intended for hoisting inline schemas while the dictionary is being
    /// assembled; translation itself never mutates a dictionary.
    pub fn insert(&mut self, name: impl Into<String>, node: SchemaNode) {
        self.schemas.insert(name.into(), node);
    }

    /// The raw document this dictionary was built from. [`Value::Null`] for
    /// dictionaries assembled from loose schemas.
    #[must_use]
    pub fn document(&self) -> &Value {
        &self.document
    }
}
