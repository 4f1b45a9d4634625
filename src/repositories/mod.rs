//! Data access layer for the repository-metadata collection.
//!
//! [`catalog`] defines one pipeline per analytical question;
//! [`AnalyticsRepository`] runs them against any
//! [`AggregateExecutor`](crate::store::AggregateExecutor).

pub mod catalog;
mod analytics;

pub use analytics::AnalyticsRepository;
