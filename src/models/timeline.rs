//! Star counts bucketed by repository creation day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::de::integral;

/// Stars of all repositories created on one UTC calendar day.
///
/// `day` is `None` for the bucket of records without a `created_at` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStars {
    #[serde(rename(deserialize = "_id"), default)]
    pub day: Option<NaiveDate>,
    #[serde(deserialize_with = "integral")]
    pub total_stars: i64,
}
