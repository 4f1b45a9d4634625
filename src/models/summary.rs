//! Whole-collection summaries. Each query yields at most one record and
//! none at all when the collection is empty.

use serde::{Deserialize, Serialize};

use super::de::integral;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalRepositories {
    pub total_repositories: i64,
}

/// Activity totals. Records missing a field contribute zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityMetrics {
    #[serde(deserialize_with = "integral")]
    pub total_forks: i64,
    #[serde(deserialize_with = "integral")]
    pub total_stargazers: i64,
    #[serde(deserialize_with = "integral")]
    pub total_watchers: i64,
}

/// Record count and per-field means.
///
/// A mean is `None` when no record carries a numeric value for the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvgStatistics {
    pub total_repos: i64,
    pub avg_forks: Option<f64>,
    pub avg_stargazers: Option<f64>,
    pub avg_watchers: Option<f64>,
    pub avg_issues: Option<f64>,
}
