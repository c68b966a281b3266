//! In-memory vector store
//!
//! Records live only for the lifetime of the process. There is no
//! deduplication and no capacity bound.

use super::{SearchHit, SimilarityMetric, VectorRecord, VectorStore};
use crate::error::{Result, VectorStoreError};
use async_trait::async_trait;
use std::cmp::Ordering;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct Inner {
    records: Vec<VectorRecord>,
    dimension: Option<usize>,
}

/// Brute-force nearest-neighbour store over an ordered list of records
#[derive(Default)]
pub struct MemoryVectorStore {
    inner: RwLock<Inner>,
}

impl MemoryVectorStore {
    /// Create a store whose dimensionality is fixed by the first insert
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with a fixed dimensionality
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: Vec::new(),
                dimension: Some(dimension),
            }),
        }
    }

    fn check_dimension(expected: Option<usize>, actual: usize) -> Result<()> {
        if actual == 0 {
            return Err(VectorStoreError::EmptyVector.into());
        }
        match expected {
            Some(expected) if expected != actual => {
                Err(VectorStoreError::InvalidDimension { expected, actual }.into())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn insert(&self, record: VectorRecord) -> Result<()> {
        let mut inner = self.inner.write().await;
        Self::check_dimension(inner.dimension, record.vector.len())?;

        inner.dimension.get_or_insert(record.vector.len());
        debug!("Inserting record {} ({} dims)", record.id, record.vector.len());
        inner.records.push(record);
        Ok(())
    }

    async fn insert_many(&self, records: Vec<VectorRecord>) -> Result<()> {
        let mut inner = self.inner.write().await;

        let mut dimension = inner.dimension;
        for record in &records {
            Self::check_dimension(dimension, record.vector.len())?;
            dimension.get_or_insert(record.vector.len());
        }

        debug!("Inserting {} records", records.len());
        inner.dimension = dimension;
        inner.records.extend(records);
        Ok(())
    }

    async fn search(
        &self,
        vector: &[f32],
        top_k: usize,
        metric: SimilarityMetric,
    ) -> Result<Vec<SearchHit>> {
        let inner = self.inner.read().await;
        if inner.records.is_empty() {
            return Ok(Vec::new());
        }
        Self::check_dimension(inner.dimension, vector.len())?;

        let mut hits: Vec<SearchHit> = inner
            .records
            .iter()
            .map(|record| SearchHit {
                score: metric.score(&record.vector, vector),
                record: record.clone(),
            })
            .collect();

        // Stable sort keeps insertion order for equal scores
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        hits.truncate(top_k);

        debug!("Scored {} records with {}, returning {}", inner.records.len(), metric, hits.len());
        Ok(hits)
    }

    async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    async fn dimension(&self) -> Option<usize> {
        self.inner.read().await.dimension
    }
}
