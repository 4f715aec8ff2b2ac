use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;

const SECRET_MANAGER_BASE: &str = "https://secretmanager.googleapis.com/v1";
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Given a logical secret name, returns its current value or fails.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn access_secret(&self, project_id: &str, name: &str, version: &str) -> Result<String>;
}

/// Google Secret Manager REST client. Authenticates with a bearer token from
/// `GOOGLE_ACCESS_TOKEN` (local development) or the GCE metadata server.
pub struct SecretManagerClient {
    client: reqwest::Client,
}

impl SecretManagerClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn access_token(&self) -> Result<String> {
        if let Ok(token) = std::env::var("GOOGLE_ACCESS_TOKEN") {
            if !token.is_empty() {
                return Ok(token);
            }
        }

        let response = self
            .client
            .get(METADATA_TOKEN_URL)
            .header("Metadata-Flavor", "Google")
            .send()
            .await?
            .error_for_status()?;

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

impl Default for SecretManagerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct AccessSecretResponse {
    payload: SecretPayload,
}

#[derive(Deserialize)]
struct SecretPayload {
    data: String,
}

#[async_trait]
impl SecretProvider for SecretManagerClient {
    async fn access_secret(&self, project_id: &str, name: &str, version: &str) -> Result<String> {
        let token = self
            .access_token()
            .await
            .context("failed to obtain an access token")?;

        let url = format!(
            "{SECRET_MANAGER_BASE}/projects/{project_id}/secrets/{name}/versions/{version}:access"
        );
        let response = self.client.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Secret Manager returned HTTP {status} for secret '{name}'");
        }

        let parsed: AccessSecretResponse = response.json().await?;
        let bytes = BASE64
            .decode(parsed.payload.data)
            .with_context(|| format!("secret '{name}' payload is not valid base64"))?;
        let value = String::from_utf8(bytes)
            .with_context(|| format!("secret '{name}' is not valid UTF-8"))?;

        Ok(value)
    }
}
