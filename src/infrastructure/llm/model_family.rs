use serde_json::{Value, json};

use crate::domain::{ExtractionPrompt, ModelParams, TokenUsage};

/// Cross-region routing prefixes that may precede the provider segment of a
/// model id, e.g. `us.anthropic.claude-3-5-sonnet-20240620-v1:0`.
const REGION_PREFIXES: [&str; 3] = ["us.", "eu.", "global."];

pub fn strip_region_prefix(model_id: &str) -> &str {
    for prefix in REGION_PREFIXES {
        if let Some(base) = model_id.strip_prefix(prefix) {
            return base;
        }
    }
    model_id
}

/// Known request/response schemas, one per provider family, dispatched on
/// the model-id prefix. Each family is a pure data mapping; no dispatch
/// machinery beyond this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Anthropic,
    Nova,
    Titan,
    Meta,
    Mistral,
    Cohere,
    Ai21,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 7] = [
        ModelFamily::Anthropic,
        ModelFamily::Nova,
        ModelFamily::Titan,
        ModelFamily::Meta,
        ModelFamily::Mistral,
        ModelFamily::Cohere,
        ModelFamily::Ai21,
    ];

    pub fn id_prefix(&self) -> &'static str {
        match self {
            ModelFamily::Anthropic => "anthropic.",
            ModelFamily::Nova => "amazon.nova",
            ModelFamily::Titan => "amazon.titan",
            ModelFamily::Meta => "meta.",
            ModelFamily::Mistral => "mistral.",
            ModelFamily::Cohere => "cohere.",
            ModelFamily::Ai21 => "ai21.",
        }
    }

    pub fn resolve(model_id: &str) -> Option<Self> {
        let base = strip_region_prefix(model_id);
        if base.starts_with("anthropic.") {
            Some(ModelFamily::Anthropic)
        } else if base.starts_with("amazon.nova") {
            Some(ModelFamily::Nova)
        } else if base.starts_with("amazon.titan") {
            Some(ModelFamily::Titan)
        } else if base.starts_with("meta.") {
            Some(ModelFamily::Meta)
        } else if base.starts_with("mistral.") {
            Some(ModelFamily::Mistral)
        } else if base.starts_with("cohere.") {
            Some(ModelFamily::Cohere)
        } else if base.starts_with("ai21.") {
            Some(ModelFamily::Ai21)
        } else {
            None
        }
    }

    pub fn supports_vision(&self) -> bool {
        matches!(self, ModelFamily::Anthropic | ModelFamily::Nova)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFamily::Anthropic => "anthropic",
            ModelFamily::Nova => "nova",
            ModelFamily::Titan => "titan",
            ModelFamily::Meta => "meta",
            ModelFamily::Mistral => "mistral",
            ModelFamily::Cohere => "cohere",
            ModelFamily::Ai21 => "ai21",
        }
    }

    /// Build the family-specific request envelope. Image payloads are only
    /// produced for vision-capable families; callers reject the combination
    /// beforehand.
    ///
    /// The image `data`/`bytes` fields carry document page locators, not
    /// encoded bytes: the inference gateway owns document-store access and
    /// substitutes the encoded pages before forwarding the envelope
    /// upstream.
    pub fn build_request(&self, prompt: &ExtractionPrompt, params: &ModelParams) -> Value {
        match self {
            ModelFamily::Anthropic => {
                let mut content: Vec<Value> = prompt
                    .images
                    .iter()
                    .map(|image_ref| {
                        json!({
                            "type": "image",
                            "source": {
                                "type": "base64",
                                "media_type": "image/jpeg",
                                "data": image_ref,
                            }
                        })
                    })
                    .collect();
                content.push(json!({ "type": "text", "text": prompt.user }));
                json!({
                    "anthropic_version": "bedrock-2023-05-31",
                    "max_tokens": params.max_output_tokens,
                    "temperature": params.temperature,
                    "top_p": params.top_p,
                    "system": prompt.system,
                    "messages": [{ "role": "user", "content": content }],
                })
            }
            ModelFamily::Nova => {
                let mut content: Vec<Value> = prompt
                    .images
                    .iter()
                    .map(|image_ref| {
                        json!({
                            "image": {
                                "format": "jpeg",
                                "source": { "bytes": image_ref },
                            }
                        })
                    })
                    .collect();
                content.push(json!({ "text": prompt.user }));
                json!({
                    "system": [{ "text": prompt.system }],
                    "messages": [{ "role": "user", "content": content }],
                    "inferenceConfig": {
                        "maxTokens": params.max_output_tokens,
                        "temperature": params.temperature,
                        "topP": params.top_p,
                    },
                })
            }
            ModelFamily::Titan => json!({
                "inputText": format!("{}\n\n{}", prompt.system, prompt.user),
                "textGenerationConfig": {
                    "maxTokenCount": params.max_output_tokens,
                    "temperature": params.temperature,
                    "topP": params.top_p,
                },
            }),
            ModelFamily::Meta => json!({
                "prompt": format!(
                    "<|begin_of_text|><|start_header_id|>system<|end_header_id|>\n{}<|eot_id|><|start_header_id|>user<|end_header_id|>\n{}<|eot_id|><|start_header_id|>assistant<|end_header_id|>\n",
                    prompt.system, prompt.user
                ),
                "max_gen_len": params.max_output_tokens,
                "temperature": params.temperature,
                "top_p": params.top_p,
            }),
            ModelFamily::Mistral => json!({
                "prompt": format!("<s>[INST] {}\n\n{} [/INST]", prompt.system, prompt.user),
                "max_tokens": params.max_output_tokens,
                "temperature": params.temperature,
                "top_p": params.top_p,
            }),
            ModelFamily::Cohere => json!({
                "message": prompt.user,
                "preamble": prompt.system,
                "max_tokens": params.max_output_tokens,
                "temperature": params.temperature,
                "p": params.top_p,
            }),
            ModelFamily::Ai21 => json!({
                "messages": [
                    { "role": "system", "content": prompt.system },
                    { "role": "user", "content": prompt.user },
                ],
                "max_tokens": params.max_output_tokens,
                "temperature": params.temperature,
                "top_p": params.top_p,
            }),
        }
    }

    /// Pull the single generated-text field out of the family-specific
    /// response envelope.
    pub fn extract_generated_text(&self, envelope: &Value) -> Option<String> {
        let text = match self {
            ModelFamily::Anthropic => envelope
                .get("content")?
                .as_array()?
                .iter()
                .find_map(|block| block.get("text").and_then(Value::as_str))?,
            ModelFamily::Nova => envelope
                .pointer("/output/message/content")?
                .as_array()?
                .iter()
                .find_map(|block| block.get("text").and_then(Value::as_str))?,
            ModelFamily::Titan => envelope.pointer("/results/0/outputText")?.as_str()?,
            ModelFamily::Meta => envelope.get("generation")?.as_str()?,
            ModelFamily::Mistral => envelope.pointer("/outputs/0/text")?.as_str()?,
            ModelFamily::Cohere => envelope.get("text")?.as_str()?,
            ModelFamily::Ai21 => envelope.pointer("/choices/0/message/content")?.as_str()?,
        };
        Some(text.to_string())
    }

    /// Token accounting is best effort; envelopes use either snake_case or
    /// camelCase usage keys depending on the family.
    pub fn extract_token_usage(&self, envelope: &Value) -> Option<TokenUsage> {
        let usage = envelope.get("usage")?;
        let read = |snake: &str, camel: &str| {
            usage
                .get(snake)
                .or_else(|| usage.get(camel))
                .and_then(Value::as_u64)
        };
        Some(TokenUsage {
            input: read("input_tokens", "inputTokens")?,
            output: read("output_tokens", "outputTokens")?,
        })
    }
}
