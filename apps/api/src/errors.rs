use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
///
/// Everything raised inside the outreach pipeline is converted into a
/// user-visible message by the pipeline's top-level catch; nothing here
/// escapes a request handler. Portfolio query failures never reach this
/// type at all; they are swallowed in `Portfolio::query_links`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed environment configuration. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The portfolio CSV source is missing or malformed. Fatal at startup.
    #[error("Portfolio data error: {0}")]
    Data(String),

    /// The LLM reply could not be parsed as JSON. Carries the raw reply
    /// truncated to its first 500 characters so the user can see what the
    /// model actually said.
    #[error("JSON parsing error: {source}. Raw response (truncated): {snippet}")]
    Parse {
        snippet: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Page retrieval failed (network error, non-success status).
    #[error("Failed to fetch the page: {0}")]
    Fetch(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
