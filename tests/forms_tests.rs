//! Integration tests for form-field extraction.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use schemaforge::{determine_input_kind, extract_form_fields, InputKind, SchemaDictionary, SchemaNode};
use serde_json::json;

const SIGNUP_YAML: &str = r#"
components:
  schemas:
    Signup:
      type: object
      required: [email, password, plan]
      properties:
        email:
          type: string
          format: email
        password:
          type: string
          minLength: 12
        display_name:
          type: string
          title: Display name
          example: Ada Lovelace
        bio:
          type: string
          maxLength: 2000
          description: Shown on your public profile.
        plan:
          $ref: '#/components/schemas/Plan'
        avatar:
          type: string
          format: binary
        age:
          type: [integer, "null"]
          minimum: 13
          maximum: 120
        newsletter:
          type: boolean
          default: true
    Plan:
      type: string
      title: Subscription plan
      enum: [free, pro, enterprise, on_prem]
"#;

fn signup_fields() -> Vec<schemaforge::FormField> {
    let dict = SchemaDictionary::from_yaml(SIGNUP_YAML).unwrap();
    extract_form_fields(dict.get("Signup").unwrap(), &dict)
}

#[test]
fn fields_come_out_in_declared_order() {
    let names: Vec<String> = signup_fields().into_iter().map(|f| f.name).collect();
    assert_eq!(
        names,
        vec![
            "email",
            "password",
            "display_name",
            "bio",
            "plan",
            "avatar",
            "age",
            "newsletter"
        ]
    );
}

#[test]
fn kinds_follow_the_inference_table() {
    let fields = signup_fields();
    let kind = |name: &str| fields.iter().find(|f| f.name == name).unwrap().kind;
    assert_eq!(kind("email"), InputKind::Email);
    assert_eq!(kind("password"), InputKind::Password);
    assert_eq!(kind("display_name"), InputKind::Text);
    assert_eq!(kind("bio"), InputKind::Textarea);
    assert_eq!(kind("plan"), InputKind::Select);
    assert_eq!(kind("avatar"), InputKind::File);
    assert_eq!(kind("age"), InputKind::Range);
    assert_eq!(kind("newsletter"), InputKind::Checkbox);
}

#[test]
fn labels_prefer_titles_then_humanize() {
    let fields = signup_fields();
    let label = |name: &str| fields.iter().find(|f| f.name == name).unwrap().label.clone();
    assert_eq!(label("display_name"), "Display name");
    assert_eq!(label("plan"), "Subscription plan");
    assert_eq!(label("bio"), "Bio");
    assert_eq!(label("age"), "Age");
}

#[test]
fn required_and_nullable_flags_are_independent() {
    let fields = signup_fields();
    let field = |name: &str| fields.iter().find(|f| f.name == name).unwrap();
    assert!(field("email").required);
    assert!(!field("email").nullable);
    assert!(!field("age").required);
    assert!(field("age").nullable);
}

#[test]
fn enum_targets_contribute_options_through_references() {
    let fields = signup_fields();
    let plan = fields.iter().find(|f| f.name == "plan").unwrap();
    let labels: Vec<&str> = plan.options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["Free", "Pro", "Enterprise", "On prem"]);
    assert_eq!(plan.options[0].value, json!("free"));
}

#[test]
fn rules_carry_the_schema_constraints() {
    let fields = signup_fields();
    let field = |name: &str| fields.iter().find(|f| f.name == name).unwrap();
    assert_eq!(field("password").rules.min_length, Some(12));
    assert_eq!(field("bio").rules.max_length, Some(2000));
    assert_eq!(
        field("age").rules.min.as_ref().and_then(|n| n.as_i64()),
        Some(13)
    );
    assert_eq!(
        field("age").rules.max.as_ref().and_then(|n| n.as_i64()),
        Some(120)
    );
}

#[test]
fn placeholder_and_help_text_come_from_metadata() {
    let fields = signup_fields();
    let field = |name: &str| fields.iter().find(|f| f.name == name).unwrap();
    assert_eq!(field("display_name").placeholder.as_deref(), Some("Ada Lovelace"));
    assert_eq!(
        field("bio").help_text.as_deref(),
        Some("Shown on your public profile.")
    );
    assert!(field("email").placeholder.is_none());
}

#[test]
fn non_object_schemas_yield_no_fields() {
    let dict = SchemaDictionary::default();
    let node = SchemaNode::from_value(&json!({ "type": "string" }));
    assert!(extract_form_fields(&node, &dict).is_empty());
}

#[test]
fn fields_serialize_with_camel_case_keys() {
    let fields = signup_fields();
    let bio = fields.iter().find(|f| f.name == "bio").unwrap();
    let value = serde_json::to_value(bio).unwrap();
    assert_eq!(value["helpText"], json!("Shown on your public profile."));
    assert_eq!(value["rules"]["maxLength"], json!(2000));
    assert_eq!(value["kind"], json!("textarea"));
    assert!(value.get("placeholder").is_none());
}

#[test]
fn array_fields_surface_item_bounds() {
    let node = SchemaNode::from_value(&json!({
        "type": "object",
        "properties": {
            "tags": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 1,
                "maxItems": 5
            }
        }
    }));
    let fields = extract_form_fields(&node, &SchemaDictionary::default());
    assert_eq!(fields[0].rules.min_items, Some(1));
    assert_eq!(fields[0].rules.max_items, Some(5));
}

#[test]
fn date_and_time_pickers_are_distinct() {
    let pick = |format: &str| {
        determine_input_kind(
            &SchemaNode::from_value(&json!({ "type": "string", "format": format })),
            "when",
        )
    };
    assert_eq!(pick("date"), InputKind::Date);
    assert_eq!(pick("date-time"), InputKind::DateTime);
    assert_eq!(pick("time"), InputKind::Time);
}
