use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::interface::{Translation, TranslationApi};
use crate::error::TranslateError;

const DEEPL_API_BASE: &str = "https://api.deepl.com";
const DEEPL_FREE_API_BASE: &str = "https://api-free.deepl.com";

/// DeepL v2 REST client.
pub struct DeepLTranslator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl DeepLTranslator {
    pub fn new(api_key: String) -> Self {
        // Free-tier keys end in ":fx" and live on a separate host.
        let base_url = if api_key.ends_with(":fx") {
            DEEPL_FREE_API_BASE
        } else {
            DEEPL_API_BASE
        };
        info!("Initialized DeepL translator (endpoint: {base_url})");
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Serialize)]
struct TranslateBody<'a> {
    text: [&'a str; 1],
    target_lang: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<&'a str>,
}

#[derive(Deserialize)]
struct TranslateResult {
    translations: Vec<TranslationEntry>,
}

#[derive(Deserialize)]
struct TranslationEntry {
    text: String,
    detected_source_language: Option<String>,
}

#[derive(Deserialize)]
struct DeepLErrorBody {
    message: Option<String>,
}

#[async_trait]
impl TranslationApi for DeepLTranslator {
    async fn translate(
        &self,
        text: &str,
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<Translation, TranslateError> {
        let url = format!("{}/v2/translate", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .json(&TranslateBody {
                text: [text],
                target_lang,
                source_lang,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<DeepLErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| "no error detail provided".to_string());
            return Err(TranslateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: TranslateResult = response.json().await?;
        let entry = parsed
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| TranslateError::InvalidResponse("empty translations array".to_string()))?;

        Ok(Translation {
            text: entry.text,
            detected_source_lang: entry.detected_source_language,
        })
    }
}
