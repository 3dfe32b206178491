use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant API key is not configured")]
    NotConfigured,

    #[error("request to the model failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("model returned no text")]
    EmptyResponse,

    #[error("could not parse model output: {0}")]
    Parse(#[from] serde_json::Error),
}
