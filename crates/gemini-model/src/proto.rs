use robodream_model::{ModelFinishReason, ModelMessage, ModelRequest};
use serde::{Deserialize, Serialize};

use crate::GeminiConfig;

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentChunk {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
    #[serde(default)]
    pub thought: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiError,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ApiError {
    pub message: String,
}

impl Candidate {
    /// Concatenates the visible text parts, skipping model thoughts.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .flat_map(|content| &content.parts)
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

pub fn parse_finish_reason(reason: &str) -> ModelFinishReason {
    match reason {
        "STOP" => ModelFinishReason::Stop,
        "MAX_TOKENS" => ModelFinishReason::MaxTokens,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT"
        | "SPII" | "IMAGE_SAFETY" => ModelFinishReason::ContentFiltered,
        _ => ModelFinishReason::Other,
    }
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Part {
    text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    parts: Vec<Part>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

// -----------
// Conversions
// -----------

pub fn create_request(
    req: &ModelRequest,
    config: &GeminiConfig,
) -> GenerateContentRequest {
    let mut contents = Vec::with_capacity(req.messages.len());
    let mut system_parts = Vec::new();
    for msg in &req.messages {
        match msg {
            ModelMessage::System(text) => {
                system_parts.push(Part { text: text.clone() });
            }
            ModelMessage::User(text) => {
                contents.push(create_content(Role::User, text));
            }
            ModelMessage::Assistant(text) => {
                contents.push(create_content(Role::Model, text));
            }
        }
    }

    let system_instruction = (!system_parts.is_empty()).then(|| Content {
        role: None,
        parts: system_parts,
    });
    let generation_config = (config.max_output_tokens.is_some()
        || config.temperature.is_some())
    .then(|| GenerationConfig {
        max_output_tokens: config.max_output_tokens,
        temperature: config.temperature,
    });

    GenerateContentRequest {
        contents,
        system_instruction,
        generation_config,
    }
}

#[inline]
fn create_content(role: Role, text: &str) -> Content {
    Content {
        role: Some(role),
        parts: vec![Part {
            text: text.to_owned(),
        }],
    }
}
