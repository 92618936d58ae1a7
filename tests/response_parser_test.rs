use serde_json::{Value, json};

use tabulate::application::services::{ParseError, extract_json_span, parse_attributes};
use tabulate::domain::AttributeSpec;

fn attrs() -> Vec<AttributeSpec> {
    vec![
        AttributeSpec::text("total", "invoice total"),
        AttributeSpec::list("tags", "document tags"),
    ]
}

#[test]
fn given_fenced_json_block_in_prose_when_parsing_then_attributes_are_extracted() {
    let raw = "Sure, here is the result:\n```json\n{\"total\": 125.0, \"tags\": [\"finance\"]}\n```\nLet me know if you need anything else.";

    let parsed = parse_attributes(raw, &attrs()).unwrap();

    assert_eq!(parsed.get("total"), Some(&json!(125.0)));
    assert_eq!(parsed.get("tags"), Some(&json!(["finance"])));
}

#[test]
fn given_bare_object_in_prose_when_parsing_then_brace_span_is_used() {
    let raw = "The answer is {\"total\": \"125 EUR\", \"tags\": [\"finance\", \"q3\"]} as requested.";

    let parsed = parse_attributes(raw, &attrs()).unwrap();

    assert_eq!(parsed.get("total"), Some(&json!("125 EUR")));
    assert_eq!(parsed.get("tags"), Some(&json!(["finance", "q3"])));
}

#[test]
fn given_braces_inside_string_literals_when_locating_span_then_they_do_not_count() {
    let raw = r#"note {"total": "a } b { c", "tags": []} trailing"#;
    assert_eq!(extract_json_span(raw), r#"{"total": "a } b { c", "tags": []}"#);
}

#[test]
fn given_nested_objects_when_locating_span_then_outermost_is_returned() {
    let raw = r#"x {"a": {"b": 1}} y"#;
    assert_eq!(extract_json_span(raw), r#"{"a": {"b": 1}}"#);
}

#[test]
fn given_no_braces_when_locating_span_then_trimmed_text_is_returned_verbatim() {
    assert_eq!(extract_json_span("  plain text  "), "plain text");
}

#[test]
fn given_missing_attribute_when_parsing_then_it_is_filled_with_null() {
    let parsed = parse_attributes(r#"{"total": "125"}"#, &attrs()).unwrap();

    assert_eq!(parsed.get("total"), Some(&json!("125")));
    assert_eq!(parsed.get("tags"), Some(&Value::Null));
}

#[test]
fn given_scalar_for_list_attribute_when_parsing_then_it_is_wrapped() {
    let parsed = parse_attributes(r#"{"tags": "finance"}"#, &attrs()).unwrap();
    assert_eq!(parsed.get("tags"), Some(&json!(["finance"])));
}

#[test]
fn given_non_string_list_elements_when_parsing_then_they_are_stringified() {
    let parsed = parse_attributes(r#"{"tags": [1, true, "x"]}"#, &attrs()).unwrap();
    assert_eq!(parsed.get("tags"), Some(&json!(["1", "true", "x"])));
}

#[test]
fn given_list_for_text_attribute_when_parsing_then_elements_are_joined() {
    let parsed = parse_attributes(r#"{"total": ["125", "EUR"]}"#, &attrs()).unwrap();
    assert_eq!(parsed.get("total"), Some(&json!("125; EUR")));
}

#[test]
fn given_numeric_text_value_when_parsing_then_the_number_is_kept() {
    let parsed = parse_attributes(r#"{"total": 125.0}"#, &attrs()).unwrap();
    assert_eq!(parsed.get("total"), Some(&json!(125.0)));
}

#[test]
fn given_unrequested_keys_when_parsing_then_they_are_dropped() {
    let parsed =
        parse_attributes(r#"{"total": "125", "tags": [], "confidence": 0.9}"#, &attrs()).unwrap();

    assert_eq!(parsed.len(), 2);
    assert!(!parsed.contains_key("confidence"));
}

#[test]
fn given_parsed_object_when_normalizing_then_keys_follow_request_order() {
    let parsed = parse_attributes(r#"{"tags": ["a"], "total": "1"}"#, &attrs()).unwrap();
    let keys: Vec<&String> = parsed.keys().collect();
    assert_eq!(keys, vec!["total", "tags"]);
}

#[test]
fn given_invalid_json_when_parsing_then_raw_text_is_preserved() {
    let raw = "I could not find any attributes in this document.";

    let error = parse_attributes(raw, &attrs()).unwrap_err();

    match &error {
        ParseError::InvalidJson { raw_text, .. } => assert_eq!(raw_text, raw),
        other => panic!("expected InvalidJson, got {:?}", other),
    }
    assert_eq!(error.raw_text(), raw);
}

#[test]
fn given_json_array_output_when_parsing_then_not_an_object_error_is_returned() {
    let raw = r#"["total", "tags"]"#;

    let error = parse_attributes(raw, &attrs()).unwrap_err();

    assert!(matches!(error, ParseError::NotAnObject { .. }));
    assert_eq!(error.raw_text(), raw);
}

#[test]
fn given_null_values_when_parsing_then_they_pass_through_for_both_types() {
    let parsed = parse_attributes(r#"{"total": null, "tags": null}"#, &attrs()).unwrap();
    assert_eq!(parsed.get("total"), Some(&Value::Null));
    assert_eq!(parsed.get("tags"), Some(&Value::Null));
}
