//! Document store abstraction for backend-agnostic aggregation.
//!
//! A query is a [`Pipeline`] of named [`Stage`] descriptors (match, unwind,
//! group, sort, limit, project, lookup, count). Backends render the stages
//! into their own syntax and return rows through [`AggregateExecutor`].
//!
//! # Usage
//!
//! ```ignore
//! use repometrics::store::{Accumulator, AggregateExt, Expr, Pipeline};
//!
//! let pipeline = Pipeline::new()
//!     .unwind("languages")
//!     .group(Expr::field("languages"), [("count", Accumulator::Count)])
//!     .sort_desc("count");
//!
//! let rows = client.aggregation(pipeline).fetch_all().await?;
//! ```

mod pipeline;
mod row;
mod stage;
mod traits;

pub mod backends;

pub use pipeline::{AggregateExt, Aggregation, Pipeline};
pub use row::{Row, RowStream};
pub use stage::{Accumulator, Condition, Expr, Literal, SortOrder, Stage};
pub use traits::AggregateExecutor;
