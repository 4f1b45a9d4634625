//! Pipeline definitions for the query catalog.
//!
//! Every query reads the repository collection only; none of these
//! pipelines contain a writing stage.

use crate::models::QueryKind;
use crate::store::{Accumulator, Condition, Expr, Literal, Pipeline};

/// Row cap for [`QueryKind::LanguagePairs`].
pub const LANGUAGE_PAIRS_LIMIT: u64 = 500;

/// Row cap for [`QueryKind::TopKeywordsFromDescriptions`].
pub const DESCRIPTION_KEYWORDS_LIMIT: u64 = 10;

/// Row cap for [`QueryKind::TopKeywordsFromReadmes`].
pub const README_KEYWORDS_LIMIT: u64 = 150;

/// README keywords must be purely alphabetic to be counted.
pub const README_KEYWORD_PATTERN: &str = "^[A-Za-z]+$";

impl QueryKind {
    /// Builds the pipeline for this query against `collection`.
    ///
    /// `collection` is only used by queries that correlate the collection
    /// with itself.
    pub fn pipeline(&self, collection: &str) -> Pipeline {
        match self {
            QueryKind::TotalRepositories => Pipeline::new().count("total_repositories"),
            QueryKind::RepositoriesByLicense => count_by("license"),
            QueryKind::RepositoriesByLanguage => count_by_element("languages"),
            QueryKind::LanguagePairs => language_pairs(collection),
            QueryKind::ActivityMetrics => Pipeline::new().group(
                Expr::null(),
                [
                    ("total_forks", Accumulator::Sum(Expr::field("forks_count"))),
                    (
                        "total_stargazers",
                        Accumulator::Sum(Expr::field("stargazers_count")),
                    ),
                    (
                        "total_watchers",
                        Accumulator::Sum(Expr::field("watchers_count")),
                    ),
                ],
            ),
            QueryKind::TopKeywordsFromDescriptions => {
                count_by_element("keywords_from_description").limit(DESCRIPTION_KEYWORDS_LIMIT)
            }
            QueryKind::TopKeywordsFromReadmes => Pipeline::new()
                .unwind("keywords_from_readme")
                .filter([Condition::iregex(
                    "keywords_from_readme",
                    README_KEYWORD_PATTERN,
                )])
                .group(
                    Expr::field("keywords_from_readme"),
                    [("count", Accumulator::Count)],
                )
                .sort_desc("count")
                .limit(README_KEYWORDS_LIMIT),
            QueryKind::AvgStatistics => Pipeline::new().group(
                Expr::null(),
                [
                    ("total_repos", Accumulator::Count),
                    ("avg_forks", Accumulator::Avg(Expr::field("forks_count"))),
                    (
                        "avg_stargazers",
                        Accumulator::Avg(Expr::field("stargazers_count")),
                    ),
                    (
                        "avg_watchers",
                        Accumulator::Avg(Expr::field("watchers_count")),
                    ),
                    (
                        "avg_issues",
                        Accumulator::Avg(Expr::field("open_issues_count")),
                    ),
                ],
            ),
            QueryKind::StarsOverTime => Pipeline::new()
                .group(
                    Expr::day_of(Expr::field("created_at")),
                    [(
                        "total_stars",
                        Accumulator::Sum(Expr::field("stargazers_count")),
                    )],
                )
                .sort_asc("_id"),
        }
    }
}

/// Group by a scalar field and count, most frequent first.
fn count_by(field: &str) -> Pipeline {
    Pipeline::new()
        .group(Expr::field(field), [("count", Accumulator::Count)])
        .sort_desc("count")
}

/// Expand an array field and count its elements, most frequent first.
fn count_by_element(field: &str) -> Pipeline {
    Pipeline::new()
        .unwind(field)
        .group(Expr::field(field), [("count", Accumulator::Count)])
        .sort_desc("count")
}

/// Directed co-occurrence of distinct languages.
///
/// The lookup joins each record to itself on `_id`, so pairs only ever
/// combine languages of the same repository.
fn language_pairs(collection: &str) -> Pipeline {
    let joined = "repo_languages.languages";

    Pipeline::new()
        .filter([
            Condition::exists("languages"),
            Condition::ne("languages", Literal::EmptyArray),
        ])
        .unwind("languages")
        .lookup(collection, "_id", "_id", "repo_languages")
        .unwind("repo_languages")
        .unwind(joined)
        .project([(
            "pair",
            Expr::cond(
                Expr::ne(Expr::field("languages"), Expr::field(joined)),
                Expr::object([
                    ("source", Expr::field("languages")),
                    ("target", Expr::field(joined)),
                ]),
                Expr::null(),
            ),
        )])
        .filter([Condition::ne("pair", Literal::Null)])
        .group(Expr::field("pair"), [("count", Accumulator::Count)])
        .sort_desc("count")
        .limit(LANGUAGE_PAIRS_LIMIT)
}
