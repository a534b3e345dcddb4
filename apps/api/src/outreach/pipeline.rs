//! Request pipeline: fetch page → clean text → extract jobs → match portfolio
//! links → draft emails.
//!
//! The pipeline never lets an error escape: every failure in the fetch /
//! extract / draft steps is converted into a user-visible message on the
//! outcome, and "nothing found" cases are outcomes, not errors. The one
//! deliberate exception to fail-fast is the portfolio query, which degrades
//! to an empty link list inside `Portfolio::query_links`.

use tracing::{debug, error};

use crate::cleaner::clean_text;
use crate::errors::AppError;
use crate::fetcher::PageFetcher;
use crate::outreach::OutreachModel;
use crate::portfolio::Portfolio;

pub const BLANK_URL_MSG: &str = "Please enter a valid job posting URL.";
pub const NO_CONTENT_MSG: &str = "No content found at the provided URL.";
pub const NO_JOBS_MSG: &str = "No job postings found in the webpage.";

/// One drafted email, labeled with the role it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailResult {
    pub role: String,
    pub email: String,
}

/// What the caller renders: either drafted emails or one error string,
/// never neither.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub results: Vec<EmailResult>,
    pub error: Option<String>,
}

impl PipelineOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            results: vec![],
            error: Some(message.into()),
        }
    }
}

pub async fn run(
    fetcher: &dyn PageFetcher,
    model: &dyn OutreachModel,
    portfolio: &Portfolio,
    job_url: &str,
) -> PipelineOutcome {
    if job_url.trim().is_empty() {
        return PipelineOutcome::failed(BLANK_URL_MSG);
    }

    match run_steps(fetcher, model, portfolio, job_url).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Outreach pipeline failed for {job_url}: {e}");
            PipelineOutcome::failed(e.to_string())
        }
    }
}

async fn run_steps(
    fetcher: &dyn PageFetcher,
    model: &dyn OutreachModel,
    portfolio: &Portfolio,
    job_url: &str,
) -> Result<PipelineOutcome, AppError> {
    let documents = fetcher.fetch(job_url).await?;
    let Some(first) = documents.first() else {
        return Ok(PipelineOutcome::failed(NO_CONTENT_MSG));
    };
    if let Some(title) = &first.title {
        debug!("Processing page titled {title:?}");
    }

    let cleaned = clean_text(&first.content);

    // Idempotent; first request pays the population cost.
    portfolio.load().await?;

    let jobs = model.extract_jobs(&cleaned).await?;
    if jobs.is_empty() {
        return Ok(PipelineOutcome::failed(NO_JOBS_MSG));
    }

    let mut results = Vec::with_capacity(jobs.len());
    for job in &jobs {
        let links = portfolio.query_links(&job.skills).await;
        let email = model.write_mail(job, &links).await?;
        let role = if job.role.trim().is_empty() {
            "Unknown Role".to_string()
        } else {
            job.role.clone()
        };
        results.push(EmailResult { role, email });
    }

    Ok(PipelineOutcome {
        results,
        error: None,
    })
}
