use thiserror::Error;

/// Failures from the chat upstream. `Display` carries enough detail for the
/// logs; `summary()` is what may be echoed back to the caller.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat upstream returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected chat response shape: {0}")]
    InvalidResponse(String),
}

impl ChatError {
    /// Failure kind plus safe context, never the raw upstream body.
    pub fn summary(&self) -> String {
        match self {
            ChatError::Transport(_) => "network error reaching the model".to_string(),
            ChatError::Api { status, .. } => format!("model API returned HTTP {status}"),
            ChatError::InvalidResponse(_) => "unexpected response from the model".to_string(),
        }
    }
}

/// Failures from the translation upstream.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("DeepL returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected translation response shape: {0}")]
    InvalidResponse(String),
}

impl TranslateError {
    /// True when the upstream itself reported the failure, as opposed to a
    /// transport or decoding problem on the way there.
    pub fn is_api_error(&self) -> bool {
        matches!(self, TranslateError::Api { .. })
    }

    pub fn summary(&self) -> String {
        match self {
            TranslateError::Transport(_) => {
                "network error reaching the translation service".to_string()
            }
            TranslateError::Api { status, message } => format!("HTTP {status}: {message}"),
            TranslateError::InvalidResponse(_) => {
                "unexpected response from the translation service".to_string()
            }
        }
    }
}
