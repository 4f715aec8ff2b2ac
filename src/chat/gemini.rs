use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::interface::{ChatModel, ChatReply, ChatSession, ChatTurn};
use crate::error::ChatError;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` client. The system instruction is fixed at
/// construction and applied to every session.
pub struct GeminiChatModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    system_instruction: String,
}

impl GeminiChatModel {
    pub fn new(api_key: String, model: String, system_instruction: String) -> Self {
        info!("Initialized Gemini chat model: {model}");
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            system_instruction,
        }
    }
}

impl ChatModel for GeminiChatModel {
    fn start_session(&self, history: Vec<ChatTurn>) -> Box<dyn ChatSession> {
        let contents = history.into_iter().map(WireContent::from_turn).collect();
        Box::new(GeminiSession {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            system_instruction: self.system_instruction.clone(),
            contents,
        })
    }
}

struct GeminiSession {
    client: reqwest::Client,
    api_key: String,
    model: String,
    system_instruction: String,
    contents: Vec<WireContent>,
}

#[async_trait]
impl ChatSession for GeminiSession {
    async fn send(&mut self, text: &str) -> Result<ChatReply, ChatError> {
        self.contents.push(WireContent {
            role: "user".to_string(),
            parts: vec![WirePart {
                text: text.to_string(),
            }],
        });

        let url = format!("{GEMINI_API_BASE}/models/{}:generateContent", self.model);
        let request = GenerateContentRequest {
            contents: &self.contents,
            system_instruction: SystemInstruction {
                parts: vec![WirePart {
                    text: self.system_instruction.clone(),
                }],
            },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = snippet(&response.text().await.unwrap_or_default());
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let block_reason = parsed.prompt_feedback.and_then(|f| f.block_reason);
        let parts: Vec<String> = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if !parts.is_empty() {
            // Keep the session usable for further sends.
            self.contents.push(WireContent {
                role: "model".to_string(),
                parts: parts
                    .iter()
                    .map(|t| WirePart { text: t.clone() })
                    .collect(),
            });
        }

        Ok(ChatReply {
            parts,
            block_reason,
        })
    }
}

fn snippet(text: &str) -> String {
    text.chars().take(200).collect()
}

#[derive(Debug, Clone, Serialize)]
struct WireContent {
    role: String,
    parts: Vec<WirePart>,
}

impl WireContent {
    fn from_turn(turn: ChatTurn) -> Self {
        Self {
            role: turn.role.as_str().to_string(),
            parts: turn
                .parts
                .into_iter()
                .map(|p| WirePart { text: p.text })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct WirePart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: &'a [WireContent],
    system_instruction: SystemInstruction,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<WirePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}
