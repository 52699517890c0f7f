use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    #[error("Request to Notion failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Notion returned HTTP {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        body: serde_json::Value,
    },
}

impl NotionError {
    /// Builds an API error from a non-success response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            code: Option<String>,
            message: Option<String>,
        }

        let value = serde_json::from_str::<serde_json::Value>(body)
            .unwrap_or_else(|_| serde_json::Value::String(body.to_string()));
        let parsed = serde_json::from_value::<ErrorBody>(value.clone()).ok();
        let code = parsed
            .as_ref()
            .and_then(|parsed| parsed.code.clone())
            .unwrap_or_else(|| "unknown".to_string());
        let message = parsed
            .and_then(|parsed| parsed.message)
            .unwrap_or_else(|| body.to_string());
        NotionError::Api {
            status,
            code,
            message,
            body: value,
        }
    }

    /// The structured error payload Notion sent, if any.
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            NotionError::Transport(_) => None,
            NotionError::Api { body, .. } => Some(body),
        }
    }
}
