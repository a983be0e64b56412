use crate::batch::WriteBatch;
use crate::error::Result;
use crate::types::GraphCounts;
use async_trait::async_trait;

/// Persistent property graph the writer upserts into.
///
/// Every operation in a [`WriteBatch`] is a MERGE, so applying the same
/// batch twice leaves the store unchanged.
#[async_trait]
pub trait GraphStore: Send {
    /// Short identifier used in log lines
    fn name(&self) -> &str;

    /// Fails with [`GraphError::Connection`](crate::GraphError::Connection)
    /// when the store cannot be reached
    async fn verify_connectivity(&mut self) -> Result<()>;

    /// Apply one batch, atomically where the store supports it
    async fn apply(&mut self, batch: &WriteBatch) -> Result<()>;

    /// Node and relationship totals
    async fn counts(&mut self) -> Result<GraphCounts>;
}
