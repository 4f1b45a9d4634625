//! Typed result records for the query catalog.

mod counts;
mod de;
mod query;
mod summary;
mod timeline;

pub use counts::{KeywordCount, LanguageCount, LanguagePair, LicenseCount};
pub use query::QueryKind;
pub use summary::{ActivityMetrics, AvgStatistics, TotalRepositories};
pub use timeline::DailyStars;
