//! Schema ingestion, the typed schema model, and reference resolution.
//!
//! A [`SchemaDictionary`] is built once from a document and treated as
//! read-only by every translation pass. Each named schema is a [`SchemaNode`]
//! whose shape was committed at ingestion; see [`SchemaKind`] for the closed
//! set of shapes.

mod parse;
mod resolve;
mod types;

pub use resolve::{extract_schema_name, resolve_pointer};
pub use types::{
    AdditionalProperties, CompositionOp, Constraints, Format, PrimitiveKind, SchemaDictionary,
    SchemaKind, SchemaNode,
};
