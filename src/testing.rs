//! Fake upstream clients for tests. No network involved.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::chat::{ChatModel, ChatReply, ChatSession, ChatTurn};
use crate::error::{ChatError, TranslateError};
use crate::translate::{Translation, TranslationApi};

#[derive(Clone, Default)]
pub struct FakeChatModel {
    pub reply_parts: Vec<String>,
    pub block_reason: Option<String>,
    pub fail_with: Option<fn() -> ChatError>,
    pub seen_history: Arc<Mutex<Vec<ChatTurn>>>,
    pub seen_questions: Arc<Mutex<Vec<String>>>,
}

impl FakeChatModel {
    pub fn answering(text: &str) -> Self {
        Self {
            reply_parts: vec![text.to_string()],
            ..Self::default()
        }
    }

    pub fn failing(make_error: fn() -> ChatError) -> Self {
        Self {
            fail_with: Some(make_error),
            ..Self::default()
        }
    }
}

impl ChatModel for FakeChatModel {
    fn start_session(&self, history: Vec<ChatTurn>) -> Box<dyn ChatSession> {
        *self.seen_history.lock().unwrap() = history;
        Box::new(FakeChatSession {
            reply_parts: self.reply_parts.clone(),
            block_reason: self.block_reason.clone(),
            fail_with: self.fail_with,
            seen_questions: Arc::clone(&self.seen_questions),
        })
    }
}

struct FakeChatSession {
    reply_parts: Vec<String>,
    block_reason: Option<String>,
    fail_with: Option<fn() -> ChatError>,
    seen_questions: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ChatSession for FakeChatSession {
    async fn send(&mut self, text: &str) -> Result<ChatReply, ChatError> {
        self.seen_questions.lock().unwrap().push(text.to_string());
        if let Some(make_error) = self.fail_with {
            return Err(make_error());
        }
        Ok(ChatReply {
            parts: self.reply_parts.clone(),
            block_reason: self.block_reason.clone(),
        })
    }
}

type SeenTranslateCall = (String, Option<String>, String);

#[derive(Clone, Default)]
pub struct FakeTranslator {
    pub translated_text: String,
    pub detected_source_lang: Option<String>,
    pub fail_with: Option<fn() -> TranslateError>,
    pub seen_calls: Arc<Mutex<Vec<SeenTranslateCall>>>,
}

impl FakeTranslator {
    pub fn returning(text: &str, detected: Option<&str>) -> Self {
        Self {
            translated_text: text.to_string(),
            detected_source_lang: detected.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn failing(make_error: fn() -> TranslateError) -> Self {
        Self {
            fail_with: Some(make_error),
            ..Self::default()
        }
    }
}

#[async_trait]
impl TranslationApi for FakeTranslator {
    async fn translate(
        &self,
        text: &str,
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<Translation, TranslateError> {
        self.seen_calls.lock().unwrap().push((
            text.to_string(),
            source_lang.map(str::to_string),
            target_lang.to_string(),
        ));
        if let Some(make_error) = self.fail_with {
            return Err(make_error());
        }
        Ok(Translation {
            text: self.translated_text.clone(),
            detected_source_lang: self.detected_source_lang.clone(),
        })
    }
}
