use serde_json::Value;

use crate::domain::{AcquiredContent, ExtractionPrompt, ExtractionRequest};

pub const SYSTEM_PROMPT: &str = "You are a document analyst extracting structured attributes from documents. \
Respond with a single strict JSON object and nothing else. \
Every requested attribute must appear as a key; use null when an attribute \
cannot be found. Attributes described as lists must be rendered as JSON arrays. \
Do not invent attributes that were not requested.";

pub const TRUNCATION_MARKER: &str = "\n[... document truncated ...]";
pub const VISION_INSTRUCTION: &str = "Use the attached document images as the source material.";

/// Assembles the extraction prompt. Identical inputs yield byte-identical
/// prompts; only the document text is ever truncated, never the attribute
/// descriptions or instructions.
pub struct PromptBuilder {
    max_input_chars: usize,
}

impl PromptBuilder {
    pub fn new(max_input_chars: usize) -> Self {
        Self { max_input_chars }
    }

    pub fn build(&self, request: &ExtractionRequest, content: &AcquiredContent) -> ExtractionPrompt {
        let mut user = String::new();

        user.push_str("Extract the following attributes from the document:\n");
        for attribute in &request.attributes {
            user.push_str("- ");
            user.push_str(&attribute.name);
            match attribute.value_type {
                crate::domain::AttributeType::List => user.push_str(" (list)"),
                crate::domain::AttributeType::Text => {}
            }
            user.push_str(": ");
            user.push_str(&attribute.description);
            user.push('\n');
        }

        if let Some(instructions) = request.instructions.as_deref()
            && !instructions.is_empty()
        {
            user.push_str("\nAdditional instructions:\n");
            user.push_str(instructions);
            user.push('\n');
        }

        if !request.few_shots.is_empty() {
            user.push_str("\nExamples:\n");
            for example in &request.few_shots {
                user.push_str("input: ");
                user.push_str(&example.input);
                user.push('\n');
                user.push_str("output: ");
                user.push_str(&Value::Object(example.output.clone()).to_string());
                user.push('\n');
            }
        }

        let images = match content {
            AcquiredContent::Text { body } => {
                user.push_str("\nDocument:\n");
                let budget = self.document_budget(user.len());
                if body.len() > budget {
                    user.push_str(truncate_at_char_boundary(body, budget));
                    user.push_str(TRUNCATION_MARKER);
                    tracing::debug!(
                        document_chars = body.len(),
                        budget,
                        "Document text truncated to fit the model input budget"
                    );
                } else {
                    user.push_str(body);
                }
                Vec::new()
            }
            AcquiredContent::Images { refs } => {
                user.push('\n');
                user.push_str(VISION_INSTRUCTION);
                refs.clone()
            }
        };

        ExtractionPrompt {
            system: SYSTEM_PROMPT.to_string(),
            user,
            images,
        }
    }

    fn document_budget(&self, used: usize) -> usize {
        self.max_input_chars
            .saturating_sub(used)
            .saturating_sub(TRUNCATION_MARKER.len())
    }
}

fn truncate_at_char_boundary(text: &str, mut cut: usize) -> &str {
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    &text[..cut]
}
