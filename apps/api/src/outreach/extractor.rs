//! Job extraction: turns cleaned page text into structured postings via one
//! completion call, then scrapes JSON out of whatever the model returned.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};
use crate::outreach::prompts::EXTRACT_PROMPT_TEMPLATE;

/// Truncation limit for raw-reply snippets carried in parse errors.
const SNIPPET_CHARS: usize = 500;

/// A fenced block with or without a language tag. Dot matches newlines so the
/// whole block body is captured.
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\n(.*)\n```").expect("hardcoded regex is valid")
});

/// One structured job posting as extracted by the LLM. Every field is
/// defaulted; model output is untrusted and frequently incomplete.
#[derive(Debug, Clone, Deserialize)]
pub struct JobPosting {
    #[serde(default)]
    pub role: String,
    #[serde(default = "default_experience")]
    pub experience: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub description: String,
}

fn default_experience() -> String {
    "Unknown".to_string()
}

/// Sends the extraction prompt and parses the reply into job postings.
/// A single attempt; malformed output surfaces as a parse error, not a retry.
pub async fn extract_jobs(llm: &LlmClient, cleaned_text: &str) -> Result<Vec<JobPosting>, AppError> {
    let prompt = EXTRACT_PROMPT_TEMPLATE.replace("{page_data}", cleaned_text);

    let response = llm.call(&prompt).await?;
    let raw = response.text().ok_or(LlmError::EmptyContent)?;

    parse_jobs_reply(raw)
}

/// Two-stage parse of an untrusted model reply: take the contents of the
/// first fenced block if one exists, otherwise treat the whole reply as the
/// payload; then parse as JSON, wrapping a top-level object into a
/// one-element array.
pub fn parse_jobs_reply(raw: &str) -> Result<Vec<JobPosting>, AppError> {
    let payload = FENCE_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or_else(|| raw.trim());

    let value: Value = serde_json::from_str(payload).map_err(|e| parse_error(raw, e))?;

    let jobs = match value {
        Value::Array(_) => {
            serde_json::from_value::<Vec<JobPosting>>(value).map_err(|e| parse_error(raw, e))?
        }
        _ => vec![serde_json::from_value::<JobPosting>(value).map_err(|e| parse_error(raw, e))?],
    };

    Ok(jobs)
}

fn parse_error(raw: &str, source: serde_json::Error) -> AppError {
    AppError::Parse {
        snippet: raw.chars().take(SNIPPET_CHARS).collect(),
        source,
    }
}
