//! repometrics - analytical queries over GitHub repository metadata
//!
//! A catalog of aggregation pipelines (license and language counts, language
//! co-occurrence, activity totals and averages, keyword frequencies, stars
//! over time) submitted to a MongoDB collection of repository records.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod repositories;
pub mod store;
