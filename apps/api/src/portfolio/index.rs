//! Vector index interface for the portfolio.

use anyhow::Result;
use async_trait::async_trait;

/// One indexed portfolio row: the techstack text that was embedded plus the
/// showcase link carried as metadata.
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    pub id: String,
    pub techstack: String,
    pub links: String,
    pub embedding: Vec<f32>,
}

/// Nearest-neighbor index over portfolio entries. Seam for test doubles;
/// production uses [`super::lance::LancePortfolioIndex`].
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Number of entries currently stored. 0 means unpopulated.
    async fn count(&self) -> Result<usize>;

    /// Inserts entries; returns how many were written.
    async fn add(&self, entries: &[IndexedEntry]) -> Result<usize>;

    /// Links of the `limit` entries nearest to `embedding`, best first.
    async fn search(&self, embedding: &[f32], limit: usize) -> Result<Vec<String>>;
}
