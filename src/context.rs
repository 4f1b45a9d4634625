//! Application context holding shared dependencies.

use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::repositories::AnalyticsRepository;
use crate::store::backends::mongo::MongoClient;

/// Root application context.
///
/// Built once from an explicit [`Config`]; there is no process-wide
/// connection.
#[derive(Clone)]
pub struct Context {
    /// MongoDB handle bound to the repository collection.
    pub store: Arc<MongoClient>,
    /// Application configuration.
    pub config: Arc<Config>,
}

impl Context {
    /// Creates a new context with the given dependencies.
    pub fn new(store: MongoClient, config: Config) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }

    /// Creates the MongoDB client described by `config` and wraps it in a context.
    pub async fn from(config: Config) -> Result<Self, AppError> {
        tracing::info!(
            uri = %config.mongodb.uri,
            database = %config.mongodb.database,
            collection = %config.mongodb.collection,
            "Connecting to MongoDB"
        );
        let store = MongoClient::from_config(&config.mongodb).await?;
        Ok(Self::new(store, config))
    }

    /// The query catalog over this context's collection.
    pub fn analytics(&self) -> AnalyticsRepository<MongoClient> {
        AnalyticsRepository::new(Arc::clone(&self.store))
    }
}
