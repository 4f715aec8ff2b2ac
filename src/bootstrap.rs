use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::chat::gemini::GeminiChatModel;
use crate::chat::ChatModel;
use crate::config::Settings;
use crate::secrets::{SecretManagerClient, SecretProvider};
use crate::state::{AppState, Upstream};
use crate::translate::deepl::DeepLTranslator;
use crate::translate::TranslationApi;

const SECRET_VERSION: &str = "latest";

const METADATA_PROJECT_ID_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/project/project-id";

/// Persona the chat upstream applies to every turn.
pub const AI_TUTOR_SYSTEM_PROMPT: &str = "\
You are a helpful and concise language tutor called Artem Lychak for an app \"Lychakingo\".
Your answers should be clear, easy to understand, and not long.
Focus directly on answering the user's question about language or grammar.";

/// Runs once per process lifetime, before any request is served. A failed
/// upstream leaves its slot `Unavailable` with a reason; the other upstream
/// and the server itself keep going.
pub async fn bootstrap(settings: &Settings) -> AppState {
    info!("Attempting initial configuration...");

    let project_id = match resolve_project_id(settings).await {
        Ok(id) => {
            info!("Resolved project id: {id}");
            id
        }
        Err(e) => {
            error!("Initial configuration failed: {e:#}");
            let reason = format!("Initial configuration failed: {e:#}");
            return AppState {
                chat: Upstream::Unavailable(reason.clone()),
                translator: Upstream::Unavailable(reason),
            };
        }
    };

    let secrets = SecretManagerClient::new();
    configure_upstreams(&secrets, &project_id, settings).await
}

/// Initializes each upstream independently; one failing never blocks the
/// other.
pub async fn configure_upstreams(
    secrets: &dyn SecretProvider,
    project_id: &str,
    settings: &Settings,
) -> AppState {
    let chat = match init_chat(secrets, project_id, settings).await {
        Ok(model) => {
            info!("Configured Gemini model '{}'", settings.gemini_model);
            Upstream::Ready(Arc::new(model) as Arc<dyn ChatModel>)
        }
        Err(e) => {
            error!("Failed to configure Gemini: {e:#}");
            Upstream::Unavailable(format!("{e:#}"))
        }
    };

    let translator = match init_translator(secrets, project_id, settings).await {
        Ok(translator) => {
            info!("Configured DeepL translator");
            Upstream::Ready(Arc::new(translator) as Arc<dyn TranslationApi>)
        }
        Err(e) => {
            error!("Failed to configure DeepL: {e:#}");
            Upstream::Unavailable(format!("{e:#}"))
        }
    };

    AppState { chat, translator }
}

async fn resolve_project_id(settings: &Settings) -> Result<String> {
    if let Some(id) = &settings.project_id {
        return Ok(id.clone());
    }
    fetch_metadata_project_id()
        .await
        .context("no project id configured and the metadata server did not provide one")
}

async fn fetch_metadata_project_id() -> Result<String> {
    let client = reqwest::Client::new();
    let id = client
        .get(METADATA_PROJECT_ID_URL)
        .header("Metadata-Flavor", "Google")
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    if id.trim().is_empty() {
        anyhow::bail!("metadata server returned an empty project id");
    }
    Ok(id.trim().to_string())
}

async fn init_chat(
    secrets: &dyn SecretProvider,
    project_id: &str,
    settings: &Settings,
) -> Result<GeminiChatModel> {
    let key = secrets
        .access_secret(project_id, &settings.gemini_secret_name, SECRET_VERSION)
        .await
        .with_context(|| format!("could not access secret '{}'", settings.gemini_secret_name))?;
    if key.trim().is_empty() {
        anyhow::bail!("Gemini API key secret is empty");
    }

    Ok(GeminiChatModel::new(
        key,
        settings.gemini_model.clone(),
        AI_TUTOR_SYSTEM_PROMPT.to_string(),
    ))
}

async fn init_translator(
    secrets: &dyn SecretProvider,
    project_id: &str,
    settings: &Settings,
) -> Result<DeepLTranslator> {
    let key = secrets
        .access_secret(project_id, &settings.deepl_secret_name, SECRET_VERSION)
        .await
        .with_context(|| format!("could not access secret '{}'", settings.deepl_secret_name))?;
    if key.trim().is_empty() {
        anyhow::bail!("DeepL API key secret is empty");
    }

    Ok(DeepLTranslator::new(key))
}
