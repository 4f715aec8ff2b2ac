use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnPart {
    pub text: String,
}

/// One message in a conversation history, attributed to either the end user
/// or the model. The caller resends the full history each request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub parts: Vec<TurnPart>,
}

/// What one upstream call produced. Empty `parts` means the call succeeded
/// transport-wise but generated no usable content (safety filter, empty
/// candidate).
#[derive(Debug, Clone, Default)]
pub struct ChatReply {
    pub parts: Vec<String>,
    pub block_reason: Option<String>,
}

impl ChatReply {
    pub fn text(&self) -> String {
        self.parts.join("")
    }
}

/// Interface for a chat-completion upstream.
pub trait ChatModel: Send + Sync {
    /// Start a stateful session seeded with prior turns.
    fn start_session(&self, history: Vec<ChatTurn>) -> Box<dyn ChatSession>;
}

#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Submit `text` as the newest user turn and wait for the reply.
    async fn send(&mut self, text: &str) -> Result<ChatReply, ChatError>;
}
