use serde_json::json;

use tabulate::application::services::{PromptBuilder, SYSTEM_PROMPT, TRUNCATION_MARKER, VISION_INSTRUCTION};
use tabulate::domain::{
    AcquiredContent, AttributeSpec, DocumentRef, ExtractionRequest, FewShotExample, FileKind,
    ModelParams, ParsingMode,
};

fn request() -> ExtractionRequest {
    ExtractionRequest {
        document_ref: DocumentRef::new("invoice.pdf"),
        file_kind: FileKind::ImagePdf,
        parsing_mode: ParsingMode::OcrThenText,
        attributes: vec![
            AttributeSpec::text("total", "invoice total amount"),
            AttributeSpec::list("tags", "topical tags for the document"),
        ],
        instructions: Some("Amounts are in EUR unless stated otherwise.".to_string()),
        model_params: ModelParams::new("anthropic.claude-3-5-sonnet-20240620-v1:0"),
        few_shots: vec![FewShotExample {
            input: "Invoice total: 10 EUR".to_string(),
            output: {
                let serde_json::Value::Object(map) = json!({ "total": "10", "tags": ["finance"] })
                else {
                    unreachable!()
                };
                map
            },
        }],
    }
}

fn text_content(body: &str) -> AcquiredContent {
    AcquiredContent::Text {
        body: body.to_string(),
    }
}

#[test]
fn given_identical_inputs_when_building_twice_then_prompts_are_byte_identical() {
    let builder = PromptBuilder::new(48_000);
    let request = request();
    let content = text_content("Invoice total: 125 EUR");

    let first = builder.build(&request, &content);
    let second = builder.build(&request, &content);

    assert_eq!(first, second);
    assert_eq!(first.system, SYSTEM_PROMPT);
}

#[test]
fn given_full_request_when_building_then_sections_appear_in_fixed_order() {
    let builder = PromptBuilder::new(48_000);
    let prompt = builder.build(&request(), &text_content("Invoice total: 125 EUR"));

    let attributes_at = prompt.user.find("Extract the following attributes").unwrap();
    let instructions_at = prompt.user.find("Additional instructions:").unwrap();
    let examples_at = prompt.user.find("Examples:").unwrap();
    let document_at = prompt.user.find("Document:").unwrap();

    assert!(attributes_at < instructions_at);
    assert!(instructions_at < examples_at);
    assert!(examples_at < document_at);
    assert!(prompt.user.contains("- total: invoice total amount"));
    assert!(prompt.user.contains("- tags (list): topical tags for the document"));
    assert!(prompt.user.contains(r#"output: {"total":"10","tags":["finance"]}"#));
    assert!(prompt.images.is_empty());
}

#[test]
fn given_no_instructions_or_examples_when_building_then_their_headers_are_absent() {
    let builder = PromptBuilder::new(48_000);
    let mut request = request();
    request.instructions = None;
    request.few_shots = Vec::new();

    let prompt = builder.build(&request, &text_content("some text"));

    assert!(!prompt.user.contains("Additional instructions:"));
    assert!(!prompt.user.contains("Examples:"));
}

#[test]
fn given_oversized_document_when_building_then_only_the_document_is_truncated() {
    let builder = PromptBuilder::new(600);
    let request = request();
    let body = "x".repeat(10_000);

    let prompt = builder.build(&request, &text_content(&body));

    assert!(prompt.user.ends_with(TRUNCATION_MARKER));
    assert!(prompt.user.len() <= 600 + TRUNCATION_MARKER.len());
    // Attribute descriptions and instructions survive truncation untouched.
    assert!(prompt.user.contains("- total: invoice total amount"));
    assert!(prompt.user.contains("Amounts are in EUR unless stated otherwise."));
}

#[test]
fn given_document_within_budget_when_building_then_no_marker_is_added() {
    let builder = PromptBuilder::new(48_000);
    let prompt = builder.build(&request(), &text_content("short document"));

    assert!(!prompt.user.contains(TRUNCATION_MARKER));
    assert!(prompt.user.ends_with("short document"));
}

#[test]
fn given_multibyte_text_when_truncating_then_cut_lands_on_a_char_boundary() {
    let builder = PromptBuilder::new(400);
    let request = request();
    let body = "é".repeat(5_000);

    // Must not panic on a mid-codepoint slice.
    let prompt = builder.build(&request, &text_content(&body));
    assert!(prompt.user.contains(TRUNCATION_MARKER));
}

#[test]
fn given_image_content_when_building_then_vision_instruction_replaces_document_text() {
    let builder = PromptBuilder::new(48_000);
    let content = AcquiredContent::Images {
        refs: vec!["invoice.pdf".to_string()],
    };

    let prompt = builder.build(&request(), &content);

    assert!(prompt.user.contains(VISION_INSTRUCTION));
    assert!(!prompt.user.contains("Document:"));
    assert_eq!(prompt.images, vec!["invoice.pdf".to_string()]);
}
