//! CLI module for repometrics.
//!
//! Subcommands:
//! - (none): print average statistics
//! - `run`: run one catalog query
//! - `all`: run every catalog query
//! - `list`: list catalog queries
//! - `ping`: check the MongoDB server is reachable

mod query;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use figment::providers::Serialized;
use serde::Serialize;

use crate::config::Config;
use crate::models::QueryKind;

/// repometrics - analytical queries over GitHub repository metadata
#[derive(Parser)]
#[command(name = "repometrics")]
#[command(about = "Analytical aggregation queries over GitHub repository metadata in MongoDB")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub overrides: ConnectionArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Connection settings that override the loaded configuration.
#[derive(clap::Args, Debug, Default, Serialize)]
pub struct ConnectionArgs {
    /// MongoDB connection string
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Database holding the repository collection
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Collection of repository records
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run one catalog query and print its records as JSON
    Run {
        /// Query to run
        #[arg(value_enum)]
        query: QueryKind,
    },

    /// Run every catalog query and print the results keyed by query name
    All,

    /// List the catalog queries
    List,

    /// Check that the MongoDB server is reachable
    Ping,
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> Result<()> {
        match &self.command {
            None => self.run_default().await,
            Some(Command::Run { query }) => self.run_query(*query).await,
            Some(Command::All) => self.run_all().await,
            Some(Command::List) => {
                Self::run_list();
                Ok(())
            }
            Some(Command::Ping) => self.run_ping().await,
        }
    }

    /// Load the layered config with command line overrides on top.
    fn load_config(&self) -> Result<Config> {
        let figment = Config::figment().merge(Serialized::default("mongodb", &self.overrides));
        Ok(Config::from_figment(figment)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        App::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_parses() {
        let app = App::try_parse_from(["repometrics"]).unwrap();
        assert!(app.command.is_none());
        assert!(!app.verbose);
    }

    #[test]
    fn test_run_parses_snake_case_query() {
        let app = App::try_parse_from(["repometrics", "run", "stars_over_time"]).unwrap();
        assert!(matches!(
            app.command,
            Some(Command::Run {
                query: QueryKind::StarsOverTime
            })
        ));
    }

    #[test]
    fn test_run_rejects_unknown_query() {
        assert!(App::try_parse_from(["repometrics", "run", "stars"]).is_err());
    }

    #[test]
    fn test_connection_overrides() {
        let app = App::try_parse_from([
            "repometrics",
            "--database",
            "Analytics",
            "run",
            "total_repositories",
        ])
        .unwrap();
        assert_eq!(app.overrides.database.as_deref(), Some("Analytics"));
        assert_eq!(app.overrides.uri, None);

        let value = serde_json::to_value(&app.overrides).unwrap();
        assert_eq!(value, serde_json::json!({"database": "Analytics"}));
    }
}
