//! Integration tests for dependency and cycle analysis.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use schemaforge::{
    collect_references, dependency_graph, detect_circular_references, find_circular_paths,
    topological_order, SchemaDictionary, SchemaNode,
};
use serde_json::json;

const TREE_YAML: &str = r#"
components:
  schemas:
    Employee:
      type: object
      required: [name]
      properties:
        name: { type: string }
        manager: { $ref: '#/components/schemas/Employee' }
        team: { $ref: '#/components/schemas/Team' }
    Team:
      type: object
      properties:
        lead: { $ref: '#/components/schemas/Employee' }
        tags:
          type: array
          items: { $ref: '#/components/schemas/Tag' }
    Tag:
      type: string
"#;

#[test]
fn detection_returns_every_tangled_schema() {
    let dict = SchemaDictionary::from_yaml(TREE_YAML).unwrap();
    let cyclic = detect_circular_references(&dict);
    // Employee is self-recursive and mutually recursive with Team; Tag is a
    // plain leaf.
    assert_eq!(cyclic.iter().collect::<Vec<_>>(), vec!["Employee", "Team"]);
}

#[test]
fn acyclic_dictionaries_come_back_empty() {
    let dict = SchemaDictionary::from_yaml(
        r#"
components:
  schemas:
    A: { type: object, properties: { b: { $ref: '#/components/schemas/B' } } }
    B: { type: string }
"#,
    )
    .unwrap();
    assert!(detect_circular_references(&dict).is_empty());
}

#[test]
fn references_are_collected_in_first_encounter_order() {
    let node = SchemaNode::from_value(&json!({
        "type": "object",
        "properties": {
            "team": { "$ref": "#/components/schemas/Team" },
            "backup": { "$ref": "#/components/schemas/Employee" },
            "again": { "$ref": "#/components/schemas/Team" }
        }
    }));
    let refs = collect_references(&node);
    assert_eq!(refs.iter().collect::<Vec<_>>(), vec!["Team", "Employee"]);
}

#[test]
fn unsupported_reference_forms_are_not_dependencies() {
    let node = SchemaNode::from_value(&json!({
        "type": "object",
        "properties": {
            "ok": { "$ref": "#/components/schemas/Known" },
            "外": { "$ref": "http://example.com/x.json" }
        }
    }));
    assert_eq!(collect_references(&node).len(), 1);
}

#[test]
fn circular_paths_are_scoped_to_real_loops() {
    let dict = SchemaDictionary::from_yaml(TREE_YAML).unwrap();
    let employee = dict.get("Employee").unwrap();
    let paths = find_circular_paths(employee, &dict);
    let locations: Vec<&str> = paths.iter().map(|p| p.location.as_str()).collect();
    assert!(locations.contains(&"$.manager.manager"));
    // The lead inside the team loops back to Employee as well.
    assert!(paths.iter().any(|p| p.schema == "Employee"));
    // Tag never loops.
    assert!(paths.iter().all(|p| p.schema != "Tag"));
}

#[test]
fn sibling_branches_do_not_inherit_visited_state() {
    let dict = SchemaDictionary::from_yaml(
        r#"
components:
  schemas:
    Doc:
      type: object
      properties:
        header: { $ref: '#/components/schemas/Block' }
        footer: { $ref: '#/components/schemas/Block' }
    Block:
      type: object
      properties:
        text: { type: string }
"#,
    )
    .unwrap();
    let doc = dict.get("Doc").unwrap();
    assert!(find_circular_paths(doc, &dict).is_empty());
}

#[test]
fn dependency_graph_reports_targets_and_complexity() {
    let dict = SchemaDictionary::from_yaml(TREE_YAML).unwrap();
    let graph = dependency_graph(&dict);
    assert_eq!(
        graph.keys().collect::<Vec<_>>(),
        vec!["Employee", "Team", "Tag"]
    );
    let employee = &graph["Employee"];
    assert_eq!(
        employee.depends_on.iter().collect::<Vec<_>>(),
        vec!["Employee", "Team"]
    );
    // Object root + one primitive + two references at double weight.
    assert_eq!(employee.complexity, 6);
    assert_eq!(graph["Tag"].complexity, 1);
    assert!(graph["Tag"].depends_on.is_empty());
}

#[test]
fn topological_order_is_total_and_dependency_first() {
    let dict = SchemaDictionary::from_yaml(
        r#"
components:
  schemas:
    Invoice:
      type: object
      properties:
        lines:
          type: array
          items: { $ref: '#/components/schemas/Line' }
        customer: { $ref: '#/components/schemas/Customer' }
    Line:
      type: object
      properties:
        product: { $ref: '#/components/schemas/Product' }
    Customer: { type: object, properties: { name: { type: string } } }
    Product: { type: object, properties: { sku: { type: string } } }
"#,
    )
    .unwrap();
    let order = topological_order(&dict);
    assert_eq!(order.len(), 4);
    let position = |name: &str| order.iter().position(|n| n == name).unwrap();
    assert!(position("Product") < position("Line"));
    assert!(position("Line") < position("Invoice"));
    assert!(position("Customer") < position("Invoice"));
}

#[test]
fn missing_reference_targets_are_treated_as_leaves() {
    let dict = SchemaDictionary::from_yaml(
        r#"
components:
  schemas:
    Lonely:
      type: object
      properties:
        ghost: { $ref: '#/components/schemas/Ghost' }
"#,
    )
    .unwrap();
    assert!(detect_circular_references(&dict).is_empty());
    assert_eq!(topological_order(&dict), vec!["Lonely"]);
    let lonely = dict.get("Lonely").unwrap();
    assert!(find_circular_paths(lonely, &dict).is_empty());
}
