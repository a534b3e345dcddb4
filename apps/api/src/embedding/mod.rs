//! Text embedding via the Together AI embeddings endpoint.
//!
//! The portfolio index stores one embedding per portfolio row; skill strings
//! are embedded at query time. Same credential as the completion client.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const TOGETHER_EMBED_URL: &str = "https://api.together.xyz/v1/embeddings";
/// Retrieval model used for both documents and queries.
pub const EMBEDDING_MODEL: &str = "BAAI/bge-base-en-v1.5";
/// Output dimension of [`EMBEDDING_MODEL`].
pub const EMBEDDING_DIMENSION: i32 = 768;

/// Converts text into a vector. Seam for test doubles; production uses
/// [`TogetherEmbedding`].
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn dimension(&self) -> usize;
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Debug, Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct TogetherError {
    error: TogetherErrorBody,
}

#[derive(Debug, Deserialize)]
struct TogetherErrorBody {
    message: String,
}

/// Together AI embedding implementation.
#[derive(Debug)]
pub struct TogetherEmbedding {
    client: reqwest::Client,
    api_key: String,
}

impl TogetherEmbedding {
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl EmbeddingProvider for TogetherEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        // Blank input embeds to the zero vector without a network call.
        if text.trim().is_empty() {
            return Ok(vec![0.0; EMBEDDING_DIMENSION as usize]);
        }

        let request = EmbedRequest {
            model: EMBEDDING_MODEL,
            input: text,
        };

        let response = self
            .client
            .post(TOGETHER_EMBED_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send embedding request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read embedding response body")?;

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<TogetherError>(&body) {
                anyhow::bail!("Embedding API error ({}): {}", status, error.error.message);
            }
            anyhow::bail!("Embedding API error ({}): {}", status, body);
        }

        let embed_response: EmbedResponse =
            serde_json::from_str(&body).context("Failed to parse embedding response")?;

        let embedding = embed_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .context("Embedding response carried no data")?;

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION as usize
    }
}
