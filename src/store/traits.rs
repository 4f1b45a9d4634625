//! Core trait for document store access.
//!
//! Backends implement [`AggregateExecutor`] for a handle bound to one
//! collection. The trait is read-only: nothing here can modify the
//! collection.

use async_trait::async_trait;

use crate::error::AppError;
use crate::store::pipeline::Pipeline;
use crate::store::row::RowStream;

/// Runs aggregation pipelines against one named collection.
#[async_trait]
pub trait AggregateExecutor: Send + Sync {
    /// Name of the collection this handle reads from.
    ///
    /// Pipelines that correlate a collection with itself use this as the
    /// `from` side of the lookup.
    fn collection_name(&self) -> &str;

    /// Submits a pipeline and returns its rows in pipeline order.
    ///
    /// Faults from the store (unreachable server, malformed stage, invalid
    /// field reference) are returned unchanged, either here or while
    /// iterating the stream.
    async fn aggregate(&self, pipeline: &Pipeline) -> Result<RowStream<'_>, AppError>;
}
