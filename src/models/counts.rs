//! Grouped counts: one record per distinct key, with its frequency.
//!
//! Raw rows carry the grouping key as `_id`; the models rename it on the way
//! in so serialized output reads `{ "license": "MIT", "count": 12 }`.

use serde::{Deserialize, Serialize};

/// Repositories sharing one license. `license` is `None` for records that
/// have no license (or a null one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseCount {
    #[serde(rename(deserialize = "_id"), default)]
    pub license: Option<String>,
    pub count: i64,
}

/// (repository, language) pairs for one language. `language` is `None` for
/// null entries inside a `languages` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCount {
    #[serde(rename(deserialize = "_id"), default)]
    pub language: Option<String>,
    pub count: i64,
}

/// Occurrences of one keyword across repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    #[serde(rename(deserialize = "_id"), default)]
    pub keyword: Option<String>,
    pub count: i64,
}

/// A directed pair of distinct languages found in the same repository.
///
/// Both `(a, b)` and `(b, a)` are reported for every repository using `a`
/// and `b`. A null entry in `languages` pairs up as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LanguagePairRow")]
pub struct LanguagePair {
    pub source: Option<String>,
    pub target: Option<String>,
    pub count: i64,
}

#[derive(Deserialize)]
struct LanguagePairRow {
    #[serde(rename = "_id")]
    pair: PairKey,
    count: i64,
}

#[derive(Deserialize)]
struct PairKey {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    target: Option<String>,
}

impl From<LanguagePairRow> for LanguagePair {
    fn from(row: LanguagePairRow) -> Self {
        Self {
            source: row.pair.source,
            target: row.pair.target,
            count: row.count,
        }
    }
}
