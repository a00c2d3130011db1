//! Dependency and cycle analysis over a schema dictionary.
//!
//! Two different questions are answered here and they intentionally have
//! different shapes:
//!
//! - [`detect_circular_references`] asks, per dictionary, "which named schemas
//!   are tangled up in a cycle?" It is a single three-state depth-first
//!   traversal in O(V + E). When a back-edge is found, every name on the
//!   active stack is marked, so a chain that merely leads into a cycle is
//!   reported along with the cycle itself. That coarseness is wanted: every
//!   marked schema needs a lazy validator.
//! - [`find_circular_paths`] asks, per schema, "along which concrete paths
//!   does this schema re-enter a named schema?" Its visited set is cloned at
//!   each reference follow, so sibling branches that legitimately reuse the
//!   same named schema are not mistaken for cycles.

use crate::schema::{
    extract_schema_name, AdditionalProperties, SchemaDictionary, SchemaKind, SchemaNode,
};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Direct dependencies of one named schema.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaDependencies {
    /// Names this schema references, in first-encounter order.
    pub depends_on: IndexSet<String>,
    /// Structural size score; see [`complexity_score`].
    pub complexity: usize,
}

/// A concrete point where a schema tree re-enters a named schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircularPath {
    /// Dotted path from the examined root, e.g. `$.manager.manager`.
    pub location: String,
    /// Name of the schema the path loops back to.
    pub schema: String,
}

/// Collect the named schemas a node refers to, in first-encounter order.
///
/// Only the node's own tree is walked; references are recorded, not followed.
/// Unsupported reference forms are skipped.
#[must_use]
pub fn collect_references(node: &SchemaNode) -> IndexSet<String> {
    let mut refs = IndexSet::new();
    collect_into(node, &mut refs);
    refs
}

fn collect_into(node: &SchemaNode, refs: &mut IndexSet<String>) {
    match &node.kind {
        SchemaKind::Reference(raw) => {
            if let Some(name) = extract_schema_name(raw) {
                refs.insert(name);
            }
        }
        SchemaKind::Array { items, .. } => {
            if let Some(items) = items {
                collect_into(items, refs);
            }
        }
        SchemaKind::Object {
            properties,
            additional,
            ..
        } => {
            for prop in properties.values() {
                collect_into(prop, refs);
            }
            if let AdditionalProperties::Schema(extra) = additional {
                collect_into(extra, refs);
            }
        }
        SchemaKind::Composition { members, .. } => {
            for member in members {
                collect_into(member, refs);
            }
        }
        SchemaKind::Primitive { .. }
        | SchemaKind::Enum(_)
        | SchemaKind::Untyped
        | SchemaKind::Unknown => {}
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

/// Find every named schema that participates in or leads into a reference
/// cycle.
///
/// Roots are visited in declared order; done nodes are never re-entered, so
/// the whole pass is O(V + E) regardless of how densely schemas share
/// subgraphs. The result is sorted by name.
#[must_use]
pub fn detect_circular_references(dict: &SchemaDictionary) -> BTreeSet<String> {
    let adjacency = reference_adjacency(dict);
    let mut states: HashMap<&str, Visit> = HashMap::new();
    let mut stack: Vec<&str> = Vec::new();
    let mut cyclic = BTreeSet::new();
    for name in adjacency.keys() {
        if !states.contains_key(name) {
            mark_cycles(name, &adjacency, &mut states, &mut stack, &mut cyclic);
        }
    }
    cyclic
}

fn reference_adjacency(dict: &SchemaDictionary) -> IndexMap<&str, IndexSet<String>> {
    dict.iter()
        .map(|(name, node)| (name, collect_references(node)))
        .collect()
}

fn mark_cycles<'a>(
    name: &'a str,
    adjacency: &'a IndexMap<&'a str, IndexSet<String>>,
    states: &mut HashMap<&'a str, Visit>,
    stack: &mut Vec<&'a str>,
    cyclic: &mut BTreeSet<String>,
) {
    states.insert(name, Visit::InProgress);
    stack.push(name);
    if let Some(deps) = adjacency.get(name) {
        for dep in deps {
            match states.get(dep.as_str()) {
                Some(Visit::InProgress) => {
                    // Back-edge: everything on the active path can reach the
                    // cycle, so all of it gets a lazy validator.
                    for on_stack in stack.iter() {
                        cyclic.insert((*on_stack).to_string());
                    }
                }
                Some(Visit::Done) => {}
                None => {
                    // References to names outside the dictionary are leaves.
                    if let Some(key) = adjacency.get_key_value(dep.as_str()).map(|(k, _)| *k) {
                        mark_cycles(key, adjacency, states, stack, cyclic);
                    }
                }
            }
        }
    }
    stack.pop();
    states.insert(name, Visit::Done);
}

/// Report each concrete path along which `node` re-enters a named schema.
///
/// References are followed through the dictionary; the visited set is cloned
/// per branch, so two sibling properties referencing the same schema do not
/// shadow each other. Following a reference keeps the current location, and
/// structural descent appends segments, so the reported location is the point
/// in the expanded tree where the revisit happens.
#[must_use]
pub fn find_circular_paths(node: &SchemaNode, dict: &SchemaDictionary) -> Vec<CircularPath> {
    let mut found = Vec::new();
    walk_paths(node, dict, &HashSet::new(), "$", &mut found);
    found
}

fn walk_paths(
    node: &SchemaNode,
    dict: &SchemaDictionary,
    visited: &HashSet<String>,
    location: &str,
    found: &mut Vec<CircularPath>,
) {
    match &node.kind {
        SchemaKind::Reference(raw) => {
            let Some(name) = extract_schema_name(raw) else {
                return;
            };
            if visited.contains(&name) {
                found.push(CircularPath {
                    location: location.to_string(),
                    schema: name,
                });
                return;
            }
            if let Some(target) = dict.get(&name) {
                let mut branch = visited.clone();
                branch.insert(name);
                walk_paths(target, dict, &branch, location, found);
            }
        }
        SchemaKind::Array { items, .. } => {
            if let Some(items) = items {
                walk_paths(items, dict, visited, &format!("{location}.items"), found);
            }
        }
        SchemaKind::Object {
            properties,
            additional,
            ..
        } => {
            for (prop_name, prop) in properties {
                walk_paths(
                    prop,
                    dict,
                    visited,
                    &format!("{location}.{prop_name}"),
                    found,
                );
            }
            if let AdditionalProperties::Schema(extra) = additional {
                walk_paths(
                    extra,
                    dict,
                    visited,
                    &format!("{location}.additionalProperties"),
                    found,
                );
            }
        }
        SchemaKind::Composition { op, members } => {
            for (idx, member) in members.iter().enumerate() {
                walk_paths(
                    member,
                    dict,
                    visited,
                    &format!("{location}.{}[{idx}]", op.key()),
                    found,
                );
            }
        }
        SchemaKind::Primitive { .. }
        | SchemaKind::Enum(_)
        | SchemaKind::Untyped
        | SchemaKind::Unknown => {}
    }
}

/// Structural size score for a schema tree: one point per node, two per
/// reference. References cost more because each one drags in another schema's
/// whole subgraph at resolution time.
#[must_use]
pub fn complexity_score(node: &SchemaNode) -> usize {
    let own = match &node.kind {
        SchemaKind::Reference(_) => 2,
        _ => 1,
    };
    let children = match &node.kind {
        SchemaKind::Array { items, .. } => {
            items.as_ref().map(|items| complexity_score(items)).unwrap_or(0)
        }
        SchemaKind::Object {
            properties,
            additional,
            ..
        } => {
            let props: usize = properties.values().map(complexity_score).sum();
            let extra = match additional {
                AdditionalProperties::Schema(extra) => complexity_score(extra),
                _ => 0,
            };
            props + extra
        }
        SchemaKind::Composition { members, .. } => members.iter().map(complexity_score).sum(),
        _ => 0,
    };
    own + children
}

/// Build the name → dependencies map for the whole dictionary, in declared
/// order.
#[must_use]
pub fn dependency_graph(dict: &SchemaDictionary) -> IndexMap<String, SchemaDependencies> {
    dict.iter()
        .map(|(name, node)| {
            (
                name.to_string(),
                SchemaDependencies {
                    depends_on: collect_references(node),
                    complexity: complexity_score(node),
                },
            )
        })
        .collect()
}

/// Order schema names so that every non-cyclic dependency precedes its
/// dependents.
///
/// Edges between two cycle participants are ignored, which leaves cycle
/// members in declared order relative to each other. That is safe for module
/// emission because every cycle participant is declared lazily; the forward
/// references this ordering can produce all originate from lazy declarations.
#[must_use]
pub fn topological_order(dict: &SchemaDictionary) -> Vec<String> {
    let cyclic = detect_circular_references(dict);
    let adjacency = reference_adjacency(dict);
    let mut active: HashSet<&str> = HashSet::new();
    let mut done: HashSet<&str> = HashSet::new();
    let mut order: Vec<String> = Vec::with_capacity(adjacency.len());
    for name in adjacency.keys() {
        emit_after_deps(
            name,
            &adjacency,
            &cyclic,
            &mut active,
            &mut done,
            &mut order,
        );
    }
    order
}

fn emit_after_deps<'a>(
    name: &'a str,
    adjacency: &'a IndexMap<&'a str, IndexSet<String>>,
    cyclic: &BTreeSet<String>,
    active: &mut HashSet<&'a str>,
    done: &mut HashSet<&'a str>,
    order: &mut Vec<String>,
) {
    if done.contains(name) || !active.insert(name) {
        return;
    }
    if let Some(deps) = adjacency.get(name) {
        for dep in deps {
            if cyclic.contains(name) && cyclic.contains(dep.as_str()) {
                continue;
            }
            if let Some(key) = adjacency.get_key_value(dep.as_str()).map(|(k, _)| *k) {
                emit_after_deps(key, adjacency, cyclic, active, done, order);
            }
        }
    }
    active.remove(name);
    done.insert(name);
    order.push(name.to_string());
}
