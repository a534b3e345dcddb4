//! Outreach: job extraction, email drafting, and the request pipeline.

pub mod extractor;
pub mod handlers;
pub mod mailer;
pub mod pipeline;
pub mod prompts;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::llm_client::LlmClient;

use self::extractor::JobPosting;

/// The two completion-backed operations the pipeline needs. Seam for test
/// doubles; production routes both through the shared [`LlmClient`].
#[async_trait]
pub trait OutreachModel: Send + Sync {
    async fn extract_jobs(&self, cleaned_text: &str) -> Result<Vec<JobPosting>, AppError>;

    async fn write_mail(&self, job: &JobPosting, links: &[String]) -> Result<String, AppError>;
}

pub struct TogetherOutreach {
    llm: LlmClient,
}

impl TogetherOutreach {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl OutreachModel for TogetherOutreach {
    async fn extract_jobs(&self, cleaned_text: &str) -> Result<Vec<JobPosting>, AppError> {
        extractor::extract_jobs(&self.llm, cleaned_text).await
    }

    async fn write_mail(&self, job: &JobPosting, links: &[String]) -> Result<String, AppError> {
        mailer::write_mail(&self.llm, job, links).await
    }
}
