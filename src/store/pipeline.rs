//! Pipeline builder and fluent execution.

use futures::{StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::store::row::{Row, RowStream};
use crate::store::stage::{Accumulator, Condition, Expr, SortOrder, Stage};
use crate::store::traits::AggregateExecutor;

/// An ordered list of stages describing one aggregation.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::new()
///     .unwind("languages")
///     .group(Expr::field("languages"), [("count", Accumulator::Count)])
///     .sort_desc("count");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an arbitrary stage.
    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Keeps rows satisfying every condition.
    pub fn filter(self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.stage(Stage::Match(conditions.into_iter().collect()))
    }

    /// Expands an array field into one row per element.
    pub fn unwind(self, path: impl Into<String>) -> Self {
        self.stage(Stage::Unwind(path.into()))
    }

    /// Groups rows by `key`. Use [`Expr::null`] to aggregate the whole input.
    pub fn group<K: Into<String>>(
        self,
        key: Expr,
        accumulators: impl IntoIterator<Item = (K, Accumulator)>,
    ) -> Self {
        self.stage(Stage::Group {
            key,
            accumulators: accumulators
                .into_iter()
                .map(|(name, acc)| (name.into(), acc))
                .collect(),
        })
    }

    pub fn sort_asc(self, field: impl Into<String>) -> Self {
        self.stage(Stage::Sort(vec![(field.into(), SortOrder::Ascending)]))
    }

    pub fn sort_desc(self, field: impl Into<String>) -> Self {
        self.stage(Stage::Sort(vec![(field.into(), SortOrder::Descending)]))
    }

    pub fn limit(self, n: u64) -> Self {
        self.stage(Stage::Limit(n))
    }

    /// Reshapes each row into the named expressions.
    pub fn project<K: Into<String>>(self, fields: impl IntoIterator<Item = (K, Expr)>) -> Self {
        self.stage(Stage::Project(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Correlates each row with rows of `from` on equal fields.
    pub fn lookup(
        self,
        from: impl Into<String>,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
        as_field: impl Into<String>,
    ) -> Self {
        self.stage(Stage::Lookup {
            from: from.into(),
            local_field: local_field.into(),
            foreign_field: foreign_field.into(),
            as_field: as_field.into(),
        })
    }

    /// Replaces the input with a single row holding the row count.
    pub fn count(self, field: impl Into<String>) -> Self {
        self.stage(Stage::Count(field.into()))
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The row cap imposed by the final stage, if it is a limit.
    pub fn row_limit(&self) -> Option<u64> {
        match self.stages.last() {
            Some(Stage::Limit(n)) => Some(*n),
            _ => None,
        }
    }

    /// Stage names joined with `|`, for logging.
    pub fn describe(&self) -> String {
        self.stages
            .iter()
            .map(Stage::name)
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// A pipeline bound to an executor, ready to run.
///
/// # Example
///
/// ```ignore
/// let rows = store.aggregation(pipeline).fetch_all().await?;
/// ```
pub struct Aggregation<'a, E: AggregateExecutor + ?Sized> {
    executor: &'a E,
    pipeline: Pipeline,
}

impl<'a, E: AggregateExecutor + ?Sized> Aggregation<'a, E> {
    pub fn new(executor: &'a E, pipeline: Pipeline) -> Self {
        Self { executor, pipeline }
    }

    /// Executes the pipeline and returns a stream of rows.
    pub async fn execute(self) -> Result<RowStream<'a>, AppError> {
        tracing::debug!(
            collection = self.executor.collection_name(),
            stages = self.pipeline.len(),
            plan = %self.pipeline.describe(),
            "submitting aggregation"
        );
        self.executor.aggregate(&self.pipeline).await
    }

    /// Executes the pipeline and collects every row, in order.
    pub async fn fetch_all(self) -> Result<Vec<Row>, AppError> {
        let rows: Vec<Row> = self.execute().await?.try_collect().await?;
        tracing::debug!(rows = rows.len(), "aggregation complete");
        Ok(rows)
    }

    /// Executes the pipeline and returns the first row, if any.
    pub async fn fetch_one(self) -> Result<Option<Row>, AppError> {
        let mut stream = self.execute().await?;
        stream.next().await.transpose()
    }

    /// Executes the pipeline and decodes every row into `T`.
    pub async fn fetch_as<T: DeserializeOwned>(self) -> Result<Vec<T>, AppError> {
        self.fetch_all()
            .await?
            .iter()
            .map(|row| row.decode::<T>())
            .collect()
    }
}

/// Extension trait providing a convenient `aggregation()` method.
pub trait AggregateExt: AggregateExecutor {
    fn aggregation(&self, pipeline: Pipeline) -> Aggregation<'_, Self>
    where
        Self: Sized,
    {
        Aggregation::new(self, pipeline)
    }
}

impl<E: AggregateExecutor> AggregateExt for E {}
