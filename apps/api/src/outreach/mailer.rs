//! Cold email drafting: one completion call per job posting.

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::outreach::extractor::JobPosting;
use crate::outreach::prompts::{MAIL_PROMPT_TEMPLATE, NO_RESPONSE_FALLBACK};

/// Drafts a cold email for `job`, referencing the matched portfolio `links`.
/// The reply is returned verbatim; a content-less reply yields the literal
/// fallback string rather than an error.
pub async fn write_mail(
    llm: &LlmClient,
    job: &JobPosting,
    links: &[String],
) -> Result<String, AppError> {
    let prompt = MAIL_PROMPT_TEMPLATE
        .replace("{job_description}", &render_job(job))
        .replace("{link_list}", &render_links(links));

    let response = llm.call(&prompt).await?;

    Ok(response
        .text()
        .map(str::to_string)
        .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string()))
}

fn render_job(job: &JobPosting) -> String {
    format!(
        "Role: {}\nExperience: {}\nSkills: {}\nDescription: {}",
        job.role,
        job.experience,
        job.skills.join(", "),
        job.description
    )
}

fn render_links(links: &[String]) -> String {
    if links.is_empty() {
        "(no portfolio links matched)".to_string()
    } else {
        links.join(", ")
    }
}
