//! LanceDB-backed portfolio index.
//!
//! Directory-backed persistent store; one table holds every portfolio row
//! with its embedding. LanceDB appends `_distance` to search results and
//! returns them ranked nearest-first.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow_array::{
    Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray,
};
use arrow_schema::{DataType, Field, Schema};
use async_trait::async_trait;
use futures::TryStreamExt;
use lancedb::connection::Connection;
use lancedb::query::{ExecutableQuery, QueryBase};

use crate::embedding::EMBEDDING_DIMENSION;

use super::index::{IndexedEntry, VectorIndex};

/// Fixed collection name for portfolio vectors.
const TABLE_NAME: &str = "portfolio";

pub struct LancePortfolioIndex {
    db: Connection,
}

impl LancePortfolioIndex {
    /// Opens (or creates) the database directory at `path`.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("Failed to create vectorstore directory")?;
            }
        }

        let path_str = path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid path encoding"))?;

        let db = lancedb::connect(path_str)
            .execute()
            .await
            .context("Failed to connect to LanceDB")?;

        Ok(Self { db })
    }

    fn create_schema() -> Schema {
        Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("techstack", DataType::Utf8, false),
            Field::new("links", DataType::Utf8, false),
            Field::new(
                "embedding",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    EMBEDDING_DIMENSION,
                ),
                false,
            ),
        ])
    }

    fn entries_to_batch(entries: &[IndexedEntry]) -> Result<RecordBatch> {
        if entries.is_empty() {
            anyhow::bail!("Cannot create batch from empty entries");
        }

        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        let techstacks: Vec<&str> = entries.iter().map(|e| e.techstack.as_str()).collect();
        let links: Vec<&str> = entries.iter().map(|e| e.links.as_str()).collect();

        let embeddings_flat: Vec<f32> = entries
            .iter()
            .flat_map(|e| e.embedding.iter().copied())
            .collect();

        let values = Float32Array::from(embeddings_flat);
        let field = Arc::new(Field::new("item", DataType::Float32, true));
        let embeddings_list = FixedSizeListArray::try_new(
            field,
            EMBEDDING_DIMENSION,
            Arc::new(values) as Arc<dyn Array>,
            None,
        )
        .context("Failed to create embedding array")?;

        let batch = RecordBatch::try_new(
            Arc::new(Self::create_schema()),
            vec![
                Arc::new(StringArray::from(ids)),
                Arc::new(StringArray::from(techstacks)),
                Arc::new(StringArray::from(links)),
                Arc::new(embeddings_list),
            ],
        )
        .context("Failed to create RecordBatch")?;

        Ok(batch)
    }

    async fn table_exists(&self) -> bool {
        self.db
            .table_names()
            .execute()
            .await
            .map(|names| names.contains(&TABLE_NAME.to_string()))
            .unwrap_or(false)
    }
}

#[async_trait]
impl VectorIndex for LancePortfolioIndex {
    async fn count(&self) -> Result<usize> {
        if !self.table_exists().await {
            return Ok(0);
        }

        let table = self
            .db
            .open_table(TABLE_NAME)
            .execute()
            .await
            .context("Failed to open portfolio table for count")?;

        let count = table.count_rows(None).await.context("Failed to count rows")?;
        Ok(count)
    }

    async fn add(&self, entries: &[IndexedEntry]) -> Result<usize> {
        if entries.is_empty() {
            return Ok(0);
        }

        let batch = Self::entries_to_batch(entries)?;
        let schema = batch.schema();

        if self.table_exists().await {
            let table = self
                .db
                .open_table(TABLE_NAME)
                .execute()
                .await
                .context("Failed to open portfolio table")?;

            let batches = RecordBatchIterator::new(vec![Ok(batch)], schema);
            table
                .add(batches)
                .execute()
                .await
                .context("Failed to add entries to portfolio table")?;
        } else {
            let batches = RecordBatchIterator::new(vec![Ok(batch)], schema);
            self.db
                .create_table(TABLE_NAME, batches)
                .execute()
                .await
                .context("Failed to create portfolio table")?;
        }

        Ok(entries.len())
    }

    async fn search(&self, embedding: &[f32], limit: usize) -> Result<Vec<String>> {
        if !self.table_exists().await {
            return Ok(vec![]);
        }

        let table = self
            .db
            .open_table(TABLE_NAME)
            .execute()
            .await
            .context("Failed to open portfolio table for search")?;

        let results = table
            .vector_search(embedding.to_vec())
            .context("Failed to create vector search")?
            .limit(limit)
            .execute()
            .await
            .context("Failed to execute vector search")?;

        let batches: Vec<RecordBatch> = results.try_collect().await?;

        let mut links = Vec::new();
        for batch in batches {
            let link_column = batch
                .column_by_name("links")
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| anyhow::anyhow!("Missing links column"))?;

            for i in 0..batch.num_rows() {
                links.push(link_column.value(i).to_string());
            }
        }

        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_entry(id: &str, links: &str, fill: f32) -> IndexedEntry {
        IndexedEntry {
            id: id.to_string(),
            techstack: format!("stack for {id}"),
            links: links.to_string(),
            embedding: vec![fill; EMBEDDING_DIMENSION as usize],
        }
    }

    #[tokio::test]
    async fn test_empty_index_counts_zero_and_searches_empty() {
        let temp_dir = TempDir::new().unwrap();
        let index = LancePortfolioIndex::open(&temp_dir.path().join("empty"))
            .await
            .unwrap();

        assert_eq!(index.count().await.unwrap(), 0);

        let query = vec![0.1; EMBEDDING_DIMENSION as usize];
        assert!(index.search(&query, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_then_count() {
        let temp_dir = TempDir::new().unwrap();
        let index = LancePortfolioIndex::open(&temp_dir.path().join("add"))
            .await
            .unwrap();

        let entries = vec![
            test_entry("a", "https://example.com/a", 0.1),
            test_entry("b", "https://example.com/b", 0.9),
        ];
        assert_eq!(index.add(&entries).await.unwrap(), 2);
        assert_eq!(index.count().await.unwrap(), 2);

        // A second batch appends rather than replacing
        let more = vec![test_entry("c", "https://example.com/c", 0.5)];
        assert_eq!(index.add(&more).await.unwrap(), 1);
        assert_eq!(index.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_search_returns_ranked_links() {
        let temp_dir = TempDir::new().unwrap();
        let index = LancePortfolioIndex::open(&temp_dir.path().join("search"))
            .await
            .unwrap();

        let entries = vec![
            test_entry("near", "https://example.com/near", 0.1),
            test_entry("far", "https://example.com/far", 0.9),
            test_entry("mid", "https://example.com/mid", 0.5),
        ];
        index.add(&entries).await.unwrap();

        let query = vec![0.1; EMBEDDING_DIMENSION as usize];
        let links = index.search(&query, 2).await.unwrap();

        assert_eq!(links.len(), 2);
        assert_eq!(links[0], "https://example.com/near");
    }
}
