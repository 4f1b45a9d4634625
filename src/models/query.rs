//! The fixed set of catalog queries.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One analytical question the catalog can answer.
///
/// Variants are listed in catalog order; see [`QueryKind::all`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum QueryKind {
    TotalRepositories,
    RepositoriesByLicense,
    RepositoriesByLanguage,
    LanguagePairs,
    ActivityMetrics,
    TopKeywordsFromDescriptions,
    TopKeywordsFromReadmes,
    AvgStatistics,
    StarsOverTime,
}

impl QueryKind {
    /// Returns a static slice of all queries in catalog order.
    pub fn all() -> &'static [QueryKind] {
        &[
            QueryKind::TotalRepositories,
            QueryKind::RepositoriesByLicense,
            QueryKind::RepositoriesByLanguage,
            QueryKind::LanguagePairs,
            QueryKind::ActivityMetrics,
            QueryKind::TopKeywordsFromDescriptions,
            QueryKind::TopKeywordsFromReadmes,
            QueryKind::AvgStatistics,
            QueryKind::StarsOverTime,
        ]
    }

    /// Stable snake_case name.
    pub fn name(&self) -> &'static str {
        match self {
            QueryKind::TotalRepositories => "total_repositories",
            QueryKind::RepositoriesByLicense => "repositories_by_license",
            QueryKind::RepositoriesByLanguage => "repositories_by_language",
            QueryKind::LanguagePairs => "language_pairs",
            QueryKind::ActivityMetrics => "activity_metrics",
            QueryKind::TopKeywordsFromDescriptions => "top_keywords_from_descriptions",
            QueryKind::TopKeywordsFromReadmes => "top_keywords_from_readmes",
            QueryKind::AvgStatistics => "avg_statistics",
            QueryKind::StarsOverTime => "stars_over_time",
        }
    }

    /// Returns a human-readable description of this query.
    pub fn description(&self) -> &'static str {
        match self {
            QueryKind::TotalRepositories => "Number of repository records",
            QueryKind::RepositoriesByLicense => "Repositories per license, most common first",
            QueryKind::RepositoriesByLanguage => "Repositories per language, most common first",
            QueryKind::LanguagePairs => {
                "Directed pairs of distinct languages used by the same repository (top 500)"
            }
            QueryKind::ActivityMetrics => "Total forks, stargazers and watchers",
            QueryKind::TopKeywordsFromDescriptions => "Ten most frequent description keywords",
            QueryKind::TopKeywordsFromReadmes => {
                "150 most frequent alphabetic README keywords"
            }
            QueryKind::AvgStatistics => "Repository count and mean forks, stars, watchers, issues",
            QueryKind::StarsOverTime => "Stars summed per repository creation day",
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QueryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("Unknown query: {}", s))
    }
}
