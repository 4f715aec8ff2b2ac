/// Runtime settings, read once from the environment at startup. Only secret
/// *names* live here; the values come from Secret Manager during bootstrap.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub project_id: Option<String>,
    pub gemini_secret_name: String,
    pub deepl_secret_name: String,
    pub gemini_model: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            project_id: ["GOOGLE_CLOUD_PROJECT", "GCP_PROJECT"]
                .iter()
                .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty())),
            gemini_secret_name: env_or("GEMINI_SECRET_NAME", "GEMINI_KEY"),
            deepl_secret_name: env_or("DEEPL_SECRET_NAME", "DEEPL_KEY"),
            gemini_model: env_or("GEMINI_MODEL", "gemini-2.0-flash"),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            project_id: None,
            gemini_secret_name: "GEMINI_KEY".to_string(),
            deepl_secret_name: "DEEPL_KEY".to_string(),
            gemini_model: "gemini-2.0-flash".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
