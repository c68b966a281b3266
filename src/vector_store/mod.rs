//! In-memory vector search over embedded text

pub mod index;
pub mod memory;
pub mod models;
pub mod similarity;

pub use index::SemanticIndex;
pub use memory::MemoryVectorStore;
pub use models::{SearchHit, VectorRecord};
pub use similarity::SimilarityMetric;

use async_trait::async_trait;
use crate::error::Result;

/// Trait for vector storage operations
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Append a record
    async fn insert(&self, record: VectorRecord) -> Result<()>;

    /// Append several records; either all are stored or none are
    async fn insert_many(&self, records: Vec<VectorRecord>) -> Result<()>;

    /// Score every record against `vector`, best first, at most `top_k` hits
    async fn search(
        &self,
        vector: &[f32],
        top_k: usize,
        metric: SimilarityMetric,
    ) -> Result<Vec<SearchHit>>;

    /// Number of stored records
    async fn len(&self) -> usize;

    /// Dimensionality shared by all records, once known
    async fn dimension(&self) -> Option<usize>;
}
