//! Query command handlers.

use color_eyre::Result;
use serde_json::json;

use crate::context::Context;
use crate::models::QueryKind;

use super::App;

impl App {
    /// Print average statistics, the default when no subcommand is given.
    pub async fn run_default(&self) -> Result<()> {
        let ctx = Context::from(self.load_config()?).await?;
        let stats = ctx.analytics().avg_statistics().await?;
        println!("Average statistics: {}", serde_json::to_string(&stats)?);
        Ok(())
    }

    /// Run a single catalog query.
    pub async fn run_query(&self, query: QueryKind) -> Result<()> {
        let ctx = Context::from(self.load_config()?).await?;

        tracing::info!(query = %query, "Running query");
        let rows = ctx.analytics().run(query).await?;
        tracing::info!(query = %query, rows = rows.len(), "Query complete");

        println!("{}", serde_json::to_string_pretty(&rows)?);
        Ok(())
    }

    /// Run every catalog query, one after another, in catalog order.
    pub async fn run_all(&self) -> Result<()> {
        let ctx = Context::from(self.load_config()?).await?;
        let analytics = ctx.analytics();

        let mut results = Vec::with_capacity(QueryKind::all().len());
        for query in QueryKind::all() {
            tracing::info!(query = %query, "Running query");
            let rows = analytics.run(*query).await?;
            results.push(json!({ "query": query.name(), "records": rows }));
        }

        println!("{}", serde_json::to_string_pretty(&results)?);
        Ok(())
    }

    /// Print query names and descriptions.
    pub fn run_list() {
        for query in QueryKind::all() {
            println!("{:<32} {}", query.name(), query.description());
        }
    }

    /// Check connectivity to the configured server.
    pub async fn run_ping(&self) -> Result<()> {
        let ctx = Context::from(self.load_config()?).await?;
        ctx.store.ping().await?;
        println!(
            "MongoDB reachable: {}.{}",
            ctx.store.database_name(),
            ctx.config.mongodb.collection
        );
        Ok(())
    }
}
