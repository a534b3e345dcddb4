//! Page fetcher: retrieves a job-posting URL and extracts its visible text.

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::info;

use crate::errors::AppError;

/// One loaded document. An empty result list from a fetch means
/// "nothing found at that URL".
#[derive(Debug, Clone)]
pub struct PageDocument {
    pub url: String,
    pub title: Option<String>,
    pub content: String,
}

/// Seam for test doubles; production uses [`HttpPageFetcher`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<PageDocument>, AppError>;
}

pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("coldreach/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<PageDocument>, AppError> {
        info!("Fetching page: {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch(format!(
                "{url} returned status {status}"
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        // `Html` is not Send; parse after the last await and drop before returning.
        let (title, content) = extract_page_text(&html);

        if content.trim().is_empty() {
            return Ok(vec![]);
        }

        Ok(vec![PageDocument {
            url: url.to_string(),
            title,
            content,
        }])
    }
}

/// Extracts the page title and the body text, whitespace collapsed.
/// Leftover markup and noise are handled downstream by the text cleaner.
fn extract_page_text(html: &str) -> (Option<String>, String) {
    let document = Html::parse_document(html);

    let title = Selector::parse("title").ok().and_then(|selector| {
        document.select(&selector).next().and_then(|element| {
            let text = element.text().collect::<String>().trim().to_string();
            (!text.is_empty()).then_some(text)
        })
    });

    let content = match Selector::parse("body") {
        Ok(selector) => document
            .select(&selector)
            .next()
            .map(|body| {
                body.text()
                    .flat_map(str::split_whitespace)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default(),
        Err(_) => String::new(),
    };

    (title, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_page_text_basic() {
        let html = "<html><head><title>Careers</title></head>\
                    <body><h1>Open roles</h1><p>Python   Engineer</p></body></html>";
        let (title, content) = extract_page_text(html);
        assert_eq!(title.as_deref(), Some("Careers"));
        assert_eq!(content, "Open roles Python Engineer");
    }

    #[test]
    fn test_extract_page_text_empty_body() {
        let (title, content) = extract_page_text("<html><body>   </body></html>");
        assert_eq!(title, None);
        assert_eq!(content, "");
    }

    #[test]
    fn test_extract_page_text_no_title() {
        let (title, content) = extract_page_text("<body><p>hello</p></body>");
        assert_eq!(title, None);
        assert_eq!(content, "hello");
    }
}
