use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnhancerError {
    #[error("LLM enhancement is disabled: no API key configured")]
    Disabled,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from LLM API")]
    UnexpectedStatus { status: u16 },

    #[error("LLM response contained no message content")]
    EmptyResponse,

    #[error("LLM response is not the expected JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}
