//! # schemaforge
//!
//! **schemaforge** is a schema translation engine for [OpenAPI 3.1.0](https://spec.openapis.org/oas/v3.1.0)
//! documents. It ingests the Schema Objects of a specification into a normalized in-memory
//! representation and renders them as TypeScript type expressions, Zod validation expressions,
//! form-field metadata for UI generation, and deterministic mock data.
//!
//! ## Overview
//!
//! Everything starts from a [`SchemaDictionary`]: a name-to-schema map built from the
//! `#/components/schemas` section of an OpenAPI document (or `#/definitions` for legacy
//! Swagger documents). Each schema is parsed once into a [`SchemaNode`] sum type, and every
//! translation target walks that shared representation. There is no file or network I/O
//! anywhere in the crate; callers hand in parsed or textual documents and get strings and
//! plain data structures back.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`schema`]** - Schema ingestion, `$ref` resolution, and the normalized schema model
//! - **[`typescript`]** - TypeScript type expression and type declaration rendering
//! - **[`validation`]** - Zod validation expression and schema declaration rendering
//! - **[`forms`]** - Input-kind inference and form-field record extraction
//! - **[`mock`]** - Deterministic mock data generation
//! - **[`graph`]** - Reference graphs, circular-reference detection, and topological ordering
//! - **[`diagnostics`]** - Dictionary audits and summary statistics
//!
//! ## Quick Start
//!
//! ```
//! use schemaforge::{ts_type, SchemaDictionary};
//!
//! let dict = SchemaDictionary::from_yaml(
//!     r#"
//! openapi: 3.1.0
//! info: { title: Pets, version: "1.0" }
//! paths: {}
//! components:
//!   schemas:
//!     Pet:
//!       type: object
//!       required: [name]
//!       properties:
//!         name: { type: string }
//!         tag: { type: string }
//! "#,
//! )?;
//!
//! let pet = dict.get("Pet").unwrap();
//! assert_eq!(ts_type(pet, &dict), "{ name: string; tag?: string; }");
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Features
//!
//! - **One ingestion pass**: every translation target reads the same normalized schema model
//! - **Declared order preserved**: schemas and properties render in document order
//! - **Cycle aware**: circular references are detected up front and each renderer degrades
//!   safely (`z.lazy` declarations, `null` mock leaves) instead of recursing forever
//! - **Deterministic output**: identical input documents produce byte-identical modules,
//!   suitable for committed generated code
//! - **Auditable**: [`audit_dictionary`] reports unresolved references, invalid patterns,
//!   and naming issues before any rendering happens

pub mod diagnostics;
pub mod forms;
pub mod graph;
pub mod mock;
pub mod schema;
pub mod typescript;
pub mod validation;

pub use diagnostics::{audit_dictionary, dictionary_stats, DictionaryStats, Finding, Severity};
pub use forms::{
    determine_input_kind, extract_form_fields, FieldOption, FieldRules, FormField, InputKind,
};
pub use graph::{
    collect_references, complexity_score, dependency_graph, detect_circular_references,
    find_circular_paths, topological_order, CircularPath, SchemaDependencies,
};
pub use mock::{mock_json, mock_value};
pub use schema::{
    extract_schema_name, resolve_pointer, AdditionalProperties, CompositionOp, Constraints,
    Format, PrimitiveKind, SchemaDictionary, SchemaKind, SchemaNode,
};
pub use typescript::{pascal_type_name, render_type_module, ts_declaration, ts_type};
pub use validation::{render_validator_module, zod_declaration, zod_schema, ValidationOptions};
