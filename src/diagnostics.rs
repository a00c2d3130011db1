//! # Dictionary Diagnostics
//!
//! Audits a schema dictionary for the problems that degrade generated output
//! and summarizes its overall shape. The audit never fails; it reports
//! findings and leaves acting on them to the caller.
//!
//! ## Checks performed
//!
//! - **Unresolved references** (error): a `$ref` under a canonical root whose
//!   target name is missing from the dictionary. The generated type still
//!   names the target, so the gap becomes a compile error downstream.
//! - **Unsupported references** (error): external or nested `$ref` forms the
//!   engine degrades to `any`.
//! - **Invalid patterns** (warning): `pattern` constraints that do not
//!   compile as regular expressions.
//! - **Empty enums** (warning): enums with no values degrade to `any`.
//! - **Name normalization** (info): schema names the emitters will rewrite
//!   into PascalCase identifiers.
//! - **Circular references** (info): schemas that get lazy validators.
//!
//! ## Usage
//!
//! ```
//! use schemaforge::{audit_dictionary, SchemaDictionary, Severity};
//!
//! let dict = SchemaDictionary::from_json(r##"{
//!     "components": { "schemas": {
//!         "Order": {
//!             "type": "object",
//!             "properties": {
//!                 "customer": { "$ref": "#/components/schemas/Customer" }
//!             }
//!         }
//!     } }
//! }"##)?;
//!
//! let findings = audit_dictionary(&dict);
//! assert!(findings.iter().any(|f| f.severity == Severity::Error));
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::graph::{self, detect_circular_references};
use crate::schema::{
    extract_schema_name, AdditionalProperties, SchemaDictionary, SchemaKind, SchemaNode,
};
use crate::typescript::pascal_type_name;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;


/// Severity level of an audit finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Will produce broken generated code.
    Error,
    /// Degrades generated output without breaking it.
    Warning,
    /// Worth knowing; no action required.
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "{label}")
    }
}

/// A single audit finding.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// Where the problem sits, e.g. `schema:User.properties.address`.
    pub location: String,
    pub severity: Severity,
    /// Stable machine-readable kind, e.g. `unresolved_reference`.
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Finding {
    #[must_use]
    pub fn new(
        location: impl Into<String>,
        severity: Severity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Finding {
        Finding {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Attach a suggested fix.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Finding {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} at {}: {}",
            self.severity, self.kind, self.location, self.message
        )?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

/// Identifier shape the emitters keep without renaming.
static CLEAN_TYPE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").expect("type name regex should be valid"));

/// Audit a dictionary and report everything that would degrade its generated
/// output. Findings are ordered by schema, then by position within each
/// schema, with cycle reports last.
#[must_use]
pub fn audit_dictionary(dict: &SchemaDictionary) -> Vec<Finding> {
    let mut findings = Vec::new();
    if dict.is_empty() {
        findings.push(Finding::new(
            "dictionary",
            Severity::Warning,
            "empty_dictionary",
            "No named schemas found; nothing to generate",
        ));
        return findings;
    }
    for (name, node) in dict.iter() {
        if !CLEAN_TYPE_NAME.is_match(name) {
            findings.push(
                Finding::new(
                    format!("schema:{name}"),
                    Severity::Info,
                    "name_normalized",
                    format!("Schema name '{name}' is not a PascalCase identifier"),
                )
                .with_suggestion(format!("Generated code will call it '{}'", pascal_type_name(name))),
            );
        }
        audit_node(dict, &mut findings, &format!("schema:{name}"), node);
    }
    for name in detect_circular_references(dict) {
        findings.push(Finding::new(
            format!("schema:{name}"),
            Severity::Info,
            "circular_reference",
            "Schema participates in a reference cycle; its validator is emitted lazily",
        ));
    }
    findings
}

fn audit_node(dict: &SchemaDictionary, findings: &mut Vec<Finding>, location: &str, node: &SchemaNode) {
    match &node.kind {
        SchemaKind::Reference(raw) => match extract_schema_name(raw) {
            Some(name) => {
                if !dict.contains(&name) {
                    findings.push(
                        Finding::new(
                            location,
                            Severity::Error,
                            "unresolved_reference",
                            format!("Reference '{raw}' does not resolve to a known schema"),
                        )
                        .with_suggestion(format!(
                            "Add '{name}' to the document's schema components"
                        )),
                    );
                }
            }
            None => {
                findings.push(Finding::new(
                    location,
                    Severity::Error,
                    "unsupported_reference",
                    format!("Reference '{raw}' is not a document-internal schema reference"),
                ));
            }
        },
        SchemaKind::Enum(values) if values.is_empty() => {
            findings.push(Finding::new(
                location,
                Severity::Warning,
                "empty_enum",
                "Enum has no values; the generated type degrades to any",
            ));
        }
        SchemaKind::Primitive { constraints, .. } => {
            if let Some(pattern) = &constraints.pattern {
                if let Err(err) = Regex::new(pattern) {
                    findings.push(Finding::new(
                        location,
                        Severity::Warning,
                        "invalid_pattern",
                        format!("Pattern does not compile: {err}"),
                    ));
                }
            }
        }
        SchemaKind::Array {
            items: Some(items), ..
        } => {
            audit_node(dict, findings, &format!("{location}.items"), items);
        }
        SchemaKind::Object {
            properties,
            additional,
            ..
        } => {
            for (prop_name, prop) in properties {
                audit_node(
                    dict,
                    findings,
                    &format!("{location}.properties.{prop_name}"),
                    prop,
                );
            }
            if let AdditionalProperties::Schema(extra) = additional {
                audit_node(
                    dict,
                    findings,
                    &format!("{location}.additionalProperties"),
                    extra,
                );
            }
        }
        SchemaKind::Composition { op, members } => {
            for (idx, member) in members.iter().enumerate() {
                audit_node(
                    dict,
                    findings,
                    &format!("{location}.{}[{idx}]", op.key()),
                    member,
                );
            }
        }
        _ => {}
    }
}

/// Aggregate statistics over a dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DictionaryStats {
    pub schema_count: usize,
    /// Object properties across all schemas, nested ones included.
    pub property_count: usize,
    pub reference_count: usize,
    pub cyclic_schema_count: usize,
    /// Deepest structural nesting across all schemas, counting each named
    /// schema's root as depth one. References are not followed.
    pub max_nesting_depth: usize,
    /// Sum of per-schema complexity scores; see [`graph::complexity_score`].
    pub total_complexity: usize,
}

/// Compute summary statistics for a dictionary.
#[must_use]
pub fn dictionary_stats(dict: &SchemaDictionary) -> DictionaryStats {
    let mut stats = DictionaryStats {
        schema_count: dict.len(),
        cyclic_schema_count: detect_circular_references(dict).len(),
        ..DictionaryStats::default()
    };
    for (_, node) in dict.iter() {
        tally(node, 1, &mut stats);
        stats.total_complexity += graph::complexity_score(node);
    }
    stats
}

fn tally(node: &SchemaNode, depth: usize, stats: &mut DictionaryStats) {
    stats.max_nesting_depth = stats.max_nesting_depth.max(depth);
    match &node.kind {
        SchemaKind::Reference(_) => stats.reference_count += 1,
        SchemaKind::Array {
            items: Some(items), ..
        } => tally(items, depth + 1, stats),
        SchemaKind::Object {
            properties,
            additional,
            ..
        } => {
            stats.property_count += properties.len();
            for prop in properties.values() {
                tally(prop, depth + 1, stats);
            }
            if let AdditionalProperties::Schema(extra) = additional {
                tally(extra, depth + 1, stats);
            }
        }
        SchemaKind::Composition { members, .. } => {
            for member in members {
                tally(member, depth + 1, stats);
            }
        }
        _ => {}
    }
}
