//! Reference resolution.
//!
//! Only document-internal references are supported. The two canonical roots,
//! `#/components/schemas/` and `#/definitions/`, resolve by name against the
//! dictionary; anything else (external files, URLs, deeper pointers) is
//! reported as unsupported by the callers rather than failing the whole run.

use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use super::types::{SchemaDictionary, SchemaKind, SchemaNode};

const COMPONENT_SCHEMAS: &str = "#/components/schemas/";
const DEFINITIONS: &str = "#/definitions/";

/// Walk a document-internal reference path down a raw document.
///
/// The leading `#` is stripped and the remainder is treated as a JSON pointer,
/// so `~1` and `~0` escapes in path segments are honored.
///
/// # Arguments
///
/// * `document` - The raw document to walk
/// * `ref_path` - A `#/`-rooted reference path
///
/// # Returns
///
/// The value at the path, or `None` if the path is not `#/`-rooted or any
/// segment is missing.
#[must_use]
pub fn resolve_pointer<'a>(document: &'a Value, ref_path: &str) -> Option<&'a Value> {
    let pointer = ref_path.strip_prefix('#')?;
    if !pointer.starts_with('/') {
        return None;
    }
    document.pointer(pointer)
}

/// Extract the schema name from a reference under one of the two canonical
/// roots, unescaping `~1` and `~0`.
///
/// Returns `None` for references outside those roots and for paths that
/// descend past the name segment, such as
/// `#/components/schemas/User/properties/id`.
#[must_use]
pub fn extract_schema_name(ref_path: &str) -> Option<String> {
    let name = ref_path
        .strip_prefix(COMPONENT_SCHEMAS)
        .or_else(|| ref_path.strip_prefix(DEFINITIONS))?;
    if name.is_empty() || name.contains('/') {
        return None;
    }
    Some(name.replace("~1", "/").replace("~0", "~"))
}

impl SchemaDictionary {
    /// Resolve a reference path to the named schema it points at.
    #[must_use]
    pub fn resolve(&self, ref_path: &str) -> Option<&SchemaNode> {
        self.get(&extract_schema_name(ref_path)?)
    }

    /// Resolve a reference, following reference-to-reference chains until a
    /// concrete schema is reached.
    ///
    /// Returns `None` when any link is missing, unsupported, or the chain
    /// loops back on itself.
    #[must_use]
    pub fn resolve_deep(&self, ref_path: &str) -> Option<&SchemaNode> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut name = extract_schema_name(ref_path)?;
        loop {
            if !seen.insert(name.clone()) {
                debug!(reference = %ref_path, "reference chain loops back on itself");
                return None;
            }
            let node = self.get(&name)?;
            match &node.kind {
                SchemaKind::Reference(next) => name = extract_schema_name(next)?,
                _ => return Some(node),
            }
        }
    }

    /// Walk the retained raw document with a `#/`-rooted reference path.
    /// See [`resolve_pointer`].
    #[must_use]
    pub fn pointer(&self, ref_path: &str) -> Option<&Value> {
        resolve_pointer(self.document(), ref_path)
    }
}
