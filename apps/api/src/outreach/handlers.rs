//! Axum handlers for the outreach form.
//!
//! The form page is deliberately minimal; the pipeline owns all failure
//! handling, so these handlers always render a page and never return an
//! error response.

use axum::{extract::State, response::Html, Form};
use serde::Deserialize;

use crate::outreach::pipeline::{self, PipelineOutcome};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OutreachForm {
    #[serde(default)]
    pub job_url: String,
}

/// GET /
pub async fn index_page() -> Html<String> {
    Html(render_page("", &PipelineOutcome {
        results: vec![],
        error: None,
    }))
}

/// POST /
///
/// Runs the full pipeline for the submitted URL and renders either the
/// drafted emails or the error message back into the page.
pub async fn handle_outreach(
    State(state): State<AppState>,
    Form(form): Form<OutreachForm>,
) -> Html<String> {
    let outcome = pipeline::run(
        state.fetcher.as_ref(),
        state.model.as_ref(),
        &state.portfolio,
        &form.job_url,
    )
    .await;

    Html(render_page(&form.job_url, &outcome))
}

fn render_page(job_url: &str, outcome: &PipelineOutcome) -> String {
    let mut body = String::new();

    body.push_str(
        "<!doctype html>\n<html>\n<head><title>Cold Outreach Generator</title></head>\n<body>\n",
    );
    body.push_str("<h1>Cold Outreach Generator</h1>\n");
    body.push_str(&format!(
        "<form method=\"post\" action=\"/\">\n\
         <input type=\"text\" name=\"job_url\" placeholder=\"Job posting URL\" value=\"{}\" size=\"60\">\n\
         <button type=\"submit\">Generate</button>\n\
         </form>\n",
        escape_html(job_url)
    ));

    if let Some(error) = &outcome.error {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(error)));
    }

    for result in &outcome.results {
        body.push_str(&format!(
            "<section>\n<h2>{}</h2>\n<pre>{}</pre>\n</section>\n",
            escape_html(&result.role),
            escape_html(&result.email)
        ));
    }

    body.push_str("</body>\n</html>\n");
    body
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
