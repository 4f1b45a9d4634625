//! Analytics repository: the query catalog bound to a collection handle.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::models::{
    ActivityMetrics, AvgStatistics, DailyStars, KeywordCount, LanguageCount, LanguagePair,
    LicenseCount, QueryKind, TotalRepositories,
};
use crate::store::{AggregateExecutor, Aggregation, Row};

/// Runs catalog queries against one repository collection.
///
/// Every method is a single read: build the pipeline, submit it, collect
/// all rows in order. Faults from the store are returned unchanged.
pub struct AnalyticsRepository<E: AggregateExecutor> {
    store: Arc<E>,
}

impl<E: AggregateExecutor> Clone for AnalyticsRepository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<E: AggregateExecutor> AnalyticsRepository<E> {
    pub fn new(store: Arc<E>) -> Self {
        Self { store }
    }

    /// Runs any catalog query and returns its rows untouched.
    pub async fn run(&self, kind: QueryKind) -> Result<Vec<Row>, AppError> {
        self.aggregation(kind).fetch_all().await
    }

    /// `[{ total_repositories }]`, or no record for an empty collection.
    pub async fn total_repositories(&self) -> Result<Vec<TotalRepositories>, AppError> {
        self.fetch(QueryKind::TotalRepositories).await
    }

    /// Repository count per license, most common first.
    pub async fn repositories_by_license(&self) -> Result<Vec<LicenseCount>, AppError> {
        self.fetch(QueryKind::RepositoriesByLicense).await
    }

    /// Repository count per language, most common first.
    pub async fn repositories_by_language(&self) -> Result<Vec<LanguageCount>, AppError> {
        self.fetch(QueryKind::RepositoriesByLanguage).await
    }

    /// Top 500 directed pairs of distinct languages used by the same repository.
    pub async fn language_pairs(&self) -> Result<Vec<LanguagePair>, AppError> {
        self.fetch(QueryKind::LanguagePairs).await
    }

    /// Total forks, stargazers and watchers.
    pub async fn activity_metrics(&self) -> Result<Vec<ActivityMetrics>, AppError> {
        self.fetch(QueryKind::ActivityMetrics).await
    }

    /// Ten most frequent description keywords.
    pub async fn top_keywords_from_descriptions(&self) -> Result<Vec<KeywordCount>, AppError> {
        self.fetch(QueryKind::TopKeywordsFromDescriptions).await
    }

    /// 150 most frequent purely alphabetic README keywords.
    pub async fn top_keywords_from_readmes(&self) -> Result<Vec<KeywordCount>, AppError> {
        self.fetch(QueryKind::TopKeywordsFromReadmes).await
    }

    /// Record count and mean forks, stargazers, watchers and open issues.
    pub async fn avg_statistics(&self) -> Result<Vec<AvgStatistics>, AppError> {
        self.fetch(QueryKind::AvgStatistics).await
    }

    /// Stars summed per creation day, oldest day first.
    pub async fn stars_over_time(&self) -> Result<Vec<DailyStars>, AppError> {
        self.fetch(QueryKind::StarsOverTime).await
    }

    fn aggregation(&self, kind: QueryKind) -> Aggregation<'_, E> {
        tracing::debug!(query = %kind, "building catalog query");
        let pipeline = kind.pipeline(self.store.collection_name());
        Aggregation::new(self.store.as_ref(), pipeline)
    }

    async fn fetch<T: DeserializeOwned>(&self, kind: QueryKind) -> Result<Vec<T>, AppError> {
        self.aggregation(kind).fetch_as().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use chrono::NaiveDate;
    use serde_json::{json, Value as JsonValue};

    use crate::store::{Pipeline, RowStream};

    // Mock executor returning canned rows and recording submitted pipelines
    struct MockExecutor {
        rows: Vec<JsonValue>,
        fail: bool,
        seen: Mutex<Vec<Pipeline>>,
    }

    impl MockExecutor {
        fn returning(rows: Vec<JsonValue>) -> Arc<Self> {
            Arc::new(Self {
                rows,
                fail: false,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                rows: Vec::new(),
                fail: true,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn submitted(&self) -> Vec<Pipeline> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl AggregateExecutor for MockExecutor {
        fn collection_name(&self) -> &str {
            "github_repos"
        }

        async fn aggregate(&self, pipeline: &Pipeline) -> Result<RowStream<'_>, AppError> {
            self.seen.lock().unwrap().push(pipeline.clone());
            if self.fail {
                return Err(AppError::Internal("connection refused".to_string()));
            }
            let rows: Vec<Result<Row, AppError>> =
                self.rows.iter().cloned().map(Row::try_from).collect();
            Ok(Box::pin(futures::stream::iter(rows)))
        }
    }

    #[tokio::test]
    async fn test_run_submits_catalog_pipeline() {
        let store = MockExecutor::returning(vec![json!({"total_repositories": 3})]);
        let repo = AnalyticsRepository::new(store.clone());

        let rows = repo.run(QueryKind::TotalRepositories).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get::<i64>("total_repositories").unwrap(), 3);
        assert_eq!(
            store.submitted(),
            vec![QueryKind::TotalRepositories.pipeline("github_repos")]
        );
    }

    #[tokio::test]
    async fn test_repositories_by_license_keeps_order() {
        let store = MockExecutor::returning(vec![
            json!({"_id": "mit", "count": 5}),
            json!({"_id": null, "count": 2}),
            json!({"_id": "apache-2.0", "count": 1}),
        ]);
        let repo = AnalyticsRepository::new(store);

        let licenses = repo.repositories_by_license().await.unwrap();
        let keys: Vec<Option<&str>> = licenses.iter().map(|l| l.license.as_deref()).collect();
        assert_eq!(keys, vec![Some("mit"), None, Some("apache-2.0")]);
    }

    #[tokio::test]
    async fn test_language_pairs_decodes_pairs() {
        let store = MockExecutor::returning(vec![
            json!({"_id": {"source": "Go", "target": "Rust"}, "count": 1}),
            json!({"_id": {"source": "Rust", "target": "Go"}, "count": 1}),
        ]);
        let repo = AnalyticsRepository::new(store.clone());

        let pairs = repo.language_pairs().await.unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].source.as_deref(), Some("Go"));
        assert_eq!(pairs[1].target.as_deref(), Some("Go"));
        assert_eq!(store.submitted()[0].row_limit(), Some(500));
    }

    #[tokio::test]
    async fn test_stars_over_time_decodes_days() {
        let store = MockExecutor::returning(vec![
            json!({"_id": "2023-01-01", "total_stars": 8}),
            json!({"_id": "2023-01-02", "total_stars": 1}),
        ]);
        let repo = AnalyticsRepository::new(store);

        let days = repo.stars_over_time().await.unwrap();
        assert_eq!(days[0].day, NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(days[0].total_stars, 8);
        assert_eq!(days[1].day, NaiveDate::from_ymd_opt(2023, 1, 2));
    }

    #[tokio::test]
    async fn test_avg_statistics_empty_collection() {
        let repo = AnalyticsRepository::new(MockExecutor::returning(vec![]));
        let stats = repo.avg_statistics().await.unwrap();
        assert!(stats.is_empty());
    }

    #[tokio::test]
    async fn test_summaries_decode() {
        let repo = AnalyticsRepository::new(MockExecutor::returning(vec![json!({
            "_id": null,
            "total_forks": 4,
            "total_stargazers": 9,
            "total_watchers": 9
        })]));
        let metrics = repo.activity_metrics().await.unwrap();
        assert_eq!(
            metrics,
            vec![ActivityMetrics {
                total_forks: 4,
                total_stargazers: 9,
                total_watchers: 9,
            }]
        );
    }

    #[tokio::test]
    async fn test_keyword_queries_use_their_own_fields() {
        let store = MockExecutor::returning(vec![json!({"_id": "cli", "count": 2})]);
        let repo = AnalyticsRepository::new(store.clone());

        let from_descriptions = repo.top_keywords_from_descriptions().await.unwrap();
        let from_readmes = repo.top_keywords_from_readmes().await.unwrap();
        assert_eq!(from_descriptions[0].keyword.as_deref(), Some("cli"));
        assert_eq!(from_readmes[0].count, 2);

        let submitted = store.submitted();
        assert_eq!(submitted[0].row_limit(), Some(10));
        assert_eq!(submitted[1].row_limit(), Some(150));
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let repo = AnalyticsRepository::new(MockExecutor::failing());
        let result = repo.repositories_by_language().await;
        assert!(matches!(result, Err(AppError::Internal(msg)) if msg == "connection refused"));
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_decode_error() {
        let repo = AnalyticsRepository::new(MockExecutor::returning(vec![
            json!({"_id": 42, "count": 1}),
        ]));
        let result = repo.repositories_by_language().await;
        assert!(matches!(result, Err(AppError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_null_language_bucket_is_kept() {
        let repo = AnalyticsRepository::new(MockExecutor::returning(vec![
            json!({"_id": "Go", "count": 2}),
            json!({"_id": null, "count": 1}),
        ]));
        let languages = repo.repositories_by_language().await.unwrap();
        assert_eq!(languages.len(), 2);
        assert_eq!(languages[1].language, None);
        assert_eq!(languages[1].count, 1);
    }

    #[tokio::test]
    async fn test_double_totals_decode() {
        let repo = AnalyticsRepository::new(MockExecutor::returning(vec![json!({
            "_id": null,
            "total_forks": 3.0,
            "total_stargazers": 7,
            "total_watchers": 7.0
        })]));
        let metrics = repo.activity_metrics().await.unwrap();
        assert_eq!(metrics[0].total_forks, 3);
        assert_eq!(metrics[0].total_watchers, 7);
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let store = MockExecutor::returning(vec![json!({"_id": "Rust", "count": 2})]);
        let repo = AnalyticsRepository::new(store.clone());

        let first = repo.repositories_by_language().await.unwrap();
        let second = repo.repositories_by_language().await.unwrap();
        assert_eq!(first, second);

        let submitted = store.submitted();
        assert_eq!(submitted[0], submitted[1]);
    }
}
