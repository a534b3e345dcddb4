//! Portfolio store: the consultancy's catalog of past project techstacks and
//! showcase links, backed by a CSV source and a persistent vector index.
//!
//! Population is idempotent and serialized behind a mutex so two racing first
//! requests cannot both observe an empty index. The index entry count is
//! therefore always 0 or equal to the CSV row count.

pub mod index;
pub mod lance;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::embedding::EmbeddingProvider;
use crate::errors::AppError;

use self::index::{IndexedEntry, VectorIndex};

/// Nearest matches fetched per skill string.
const MATCHES_PER_SKILL: usize = 2;

/// One row of the portfolio CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioEntry {
    #[serde(rename = "Techstack")]
    pub techstack: String,
    #[serde(rename = "Links")]
    pub links: String,
}

pub struct Portfolio {
    entries: Vec<PortfolioEntry>,
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    /// One-time-initialization guard for index population.
    populate: Mutex<()>,
}

impl Portfolio {
    pub fn new(
        entries: Vec<PortfolioEntry>,
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            entries,
            index,
            embedder,
            populate: Mutex::new(()),
        }
    }

    /// Loads the portfolio rows from a CSV file with required columns
    /// `Techstack` and `Links`. Fails at construction on a missing file,
    /// missing columns, or a malformed row.
    pub fn from_csv(
        path: &Path,
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, AppError> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| AppError::Data(format!("Error loading portfolio CSV: {e}")))?;

        let headers = reader
            .headers()
            .map_err(|e| AppError::Data(format!("Error reading portfolio CSV headers: {e}")))?;
        for required in ["Techstack", "Links"] {
            if !headers.iter().any(|h| h == required) {
                return Err(AppError::Data(
                    "CSV file must contain 'Techstack' and 'Links' columns".to_string(),
                ));
            }
        }

        let entries = reader
            .deserialize::<PortfolioEntry>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::Data(format!("Error parsing portfolio CSV: {e}")))?;

        Ok(Self::new(entries, index, embedder))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Populates the vector index from the CSV rows if it is still empty.
    /// Safe to call on every request; a no-op after the first successful
    /// population.
    pub async fn load(&self) -> Result<(), AppError> {
        let _guard = self.populate.lock().await;

        if self.index.count().await? > 0 {
            return Ok(());
        }

        let mut batch = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let embedding = self.embedder.embed(&entry.techstack).await?;
            batch.push(IndexedEntry {
                id: Uuid::new_v4().to_string(),
                techstack: entry.techstack.clone(),
                links: entry.links.clone(),
                embedding,
            });
        }

        let inserted = self.index.add(&batch).await?;
        info!("Populated portfolio index with {inserted} entries");

        Ok(())
    }

    /// Links of the portfolio entries nearest to each skill, flattened in
    /// skill order then match-rank order, duplicates kept.
    ///
    /// Best-effort: any failure is logged and degrades to an empty list so a
    /// portfolio miss never aborts the outreach pipeline.
    pub async fn query_links(&self, skills: &[String]) -> Vec<String> {
        if skills.is_empty() {
            return vec![];
        }

        match self.query_links_inner(skills).await {
            Ok(links) => links,
            Err(e) => {
                warn!("Error querying portfolio: {e:#}");
                vec![]
            }
        }
    }

    async fn query_links_inner(&self, skills: &[String]) -> Result<Vec<String>> {
        let mut links = Vec::new();
        for skill in skills {
            let embedding = self.embedder.embed(skill).await?;
            links.extend(self.index.search(&embedding, MATCHES_PER_SKILL).await?);
        }
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    struct FakeEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 1.0])
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    /// In-memory index: `search` replays canned links keyed by entry count.
    struct FakeIndex {
        stored: AtomicUsize,
        links_per_search: Vec<String>,
    }

    impl FakeIndex {
        fn new(links_per_search: Vec<String>) -> Self {
            Self {
                stored: AtomicUsize::new(0),
                links_per_search,
            }
        }
    }

    #[async_trait]
    impl VectorIndex for FakeIndex {
        async fn count(&self) -> Result<usize> {
            Ok(self.stored.load(Ordering::SeqCst))
        }

        async fn add(&self, entries: &[IndexedEntry]) -> Result<usize> {
            self.stored.fetch_add(entries.len(), Ordering::SeqCst);
            Ok(entries.len())
        }

        async fn search(&self, _embedding: &[f32], limit: usize) -> Result<Vec<String>> {
            Ok(self
                .links_per_search
                .iter()
                .take(limit)
                .cloned()
                .collect())
        }
    }

    struct FailingIndex;

    #[async_trait]
    impl VectorIndex for FailingIndex {
        async fn count(&self) -> Result<usize> {
            Ok(1)
        }

        async fn add(&self, _entries: &[IndexedEntry]) -> Result<usize> {
            anyhow::bail!("index offline")
        }

        async fn search(&self, _embedding: &[f32], _limit: usize) -> Result<Vec<String>> {
            anyhow::bail!("index offline")
        }
    }

    fn sample_entries() -> Vec<PortfolioEntry> {
        vec![
            PortfolioEntry {
                techstack: "Rust, Axum, Postgres".to_string(),
                links: "https://example.com/rust".to_string(),
            },
            PortfolioEntry {
                techstack: "Python, ML".to_string(),
                links: "https://example.com/py".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn test_load_populates_once() {
        let index = Arc::new(FakeIndex::new(vec![]));
        let portfolio = Portfolio::new(sample_entries(), index.clone(), Arc::new(FakeEmbedder));

        portfolio.load().await.unwrap();
        let after_first = index.count().await.unwrap();
        assert_eq!(after_first, 2);

        // Second call is a no-op
        portfolio.load().await.unwrap();
        assert_eq!(index.count().await.unwrap(), after_first);
    }

    #[tokio::test]
    async fn test_query_links_empty_skills_is_empty() {
        let index = Arc::new(FakeIndex::new(vec!["https://example.com/a".to_string()]));
        let portfolio = Portfolio::new(sample_entries(), index, Arc::new(FakeEmbedder));

        assert!(portfolio.query_links(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_query_links_flattens_per_skill_matches() {
        let index = Arc::new(FakeIndex::new(vec![
            "https://example.com/a".to_string(),
            "https://example.com/b".to_string(),
        ]));
        let portfolio = Portfolio::new(sample_entries(), index, Arc::new(FakeEmbedder));

        let skills = vec!["Rust".to_string(), "Python".to_string()];
        let links = portfolio.query_links(&skills).await;

        // Two matches per skill, duplicates across skills kept
        assert_eq!(
            links,
            vec![
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/a",
                "https://example.com/b",
            ]
        );
    }

    #[tokio::test]
    async fn test_query_failure_degrades_to_empty() {
        let portfolio = Portfolio::new(sample_entries(), Arc::new(FailingIndex), Arc::new(FakeEmbedder));

        let links = portfolio.query_links(&["Rust".to_string()]).await;
        assert!(links.is_empty());
    }

    #[test]
    fn test_from_csv_missing_columns_is_data_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Stack,Url").unwrap();
        writeln!(file, "Rust,https://example.com").unwrap();
        file.flush().unwrap();

        let result = Portfolio::from_csv(
            file.path(),
            Arc::new(FakeIndex::new(vec![])),
            Arc::new(FakeEmbedder),
        );
        let err = result.err().expect("missing columns must fail");
        assert!(matches!(err, AppError::Data(_)));
        assert!(err.to_string().contains("Techstack"));
    }

    #[test]
    fn test_from_csv_reads_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Techstack,Links").unwrap();
        writeln!(file, "\"React, Node.js\",https://example.com/react").unwrap();
        writeln!(file, "Rust,https://example.com/rust").unwrap();
        file.flush().unwrap();

        let portfolio = Portfolio::from_csv(
            file.path(),
            Arc::new(FakeIndex::new(vec![])),
            Arc::new(FakeEmbedder),
        )
        .unwrap();

        assert_eq!(portfolio.len(), 2);
        assert_eq!(portfolio.entries[0].techstack, "React, Node.js");
    }

    #[test]
    fn test_from_csv_missing_file_is_data_error() {
        let result = Portfolio::from_csv(
            Path::new("/nonexistent/portfolio.csv"),
            Arc::new(FakeIndex::new(vec![])),
            Arc::new(FakeEmbedder),
        );
        assert!(matches!(result, Err(AppError::Data(_))));
    }
}
