// All LLM prompt constants for the outreach module.
// Each template documents the placeholders to replace before sending.

/// Job extraction prompt. Replace `{page_data}` with the cleaned page text.
pub const EXTRACT_PROMPT_TEMPLATE: &str = r#"### SCRAPED TEXT FROM WEBSITE:
{page_data}

### INSTRUCTION:
Extract job postings and return a JSON array with:
- `role` (Job title)
- `experience` (Years of experience or "Unknown" if missing)
- `skills` (List of relevant skills)
- `description` (Brief job description)

Output ONLY valid JSON enclosed in triple backticks.
Example:
```
[{"role": "Software Engineer", "experience": "3 years", "skills": ["Python", "ML"], "description": "Exciting opportunity in AI"}]
```"#;

/// Cold email prompt. Replace `{job_description}` with a textual rendering of
/// the job and `{link_list}` with the matched portfolio links.
pub const MAIL_PROMPT_TEMPLATE: &str = r#"### JOB DESCRIPTION:
{job_description}

### INSTRUCTION:
You are Adithya, a business development executive at AtliQ, an AI & Software Consulting company.
Write a cold email explaining how AtliQ can fulfill their needs.

Include relevant links: {link_list}

Output only the email content."#;

/// Returned verbatim when the completion reply carries no content at all.
pub const NO_RESPONSE_FALLBACK: &str = "Error: No response from model.";
