use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TranslateError;

/// Result of one translation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
    pub detected_source_lang: Option<String>,
}

/// Interface for a translation upstream.
#[async_trait]
pub trait TranslationApi: Send + Sync {
    /// Translate `text` into `target_lang`. A `source_lang` of `None` asks
    /// the upstream to auto-detect.
    async fn translate(
        &self,
        text: &str,
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<Translation, TranslateError>;
}
