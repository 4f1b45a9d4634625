//! MongoDB backend implementation.
//!
//! Renders [`Pipeline`] stages into aggregation-framework BSON and runs them
//! through the official async driver.
//!
//! # Example
//!
//! ```ignore
//! use repometrics::store::backends::mongo::MongoClient;
//! use repometrics::store::AggregateExt;
//!
//! let client = MongoClient::connect("mongodb://localhost:27017", "Developer", "github_repos").await?;
//! let rows = client.aggregation(pipeline).fetch_all().await?;
//! ```

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};

use crate::config::MongoConfig;
use crate::error::AppError;
use crate::store::pipeline::Pipeline;
use crate::store::row::{Row, RowStream};
use crate::store::stage::{Accumulator, Condition, Expr, Literal, SortOrder, Stage};
use crate::store::traits::AggregateExecutor;

/// MongoDB client bound to one collection.
///
/// Cheap to clone; the driver's handles are `Arc`-based and share one pooled
/// client. Connecting is lazy, so an unreachable server surfaces on the
/// first aggregation (or [`ping`](MongoClient::ping)).
#[derive(Debug, Clone)]
pub struct MongoClient {
    database: Database,
    collection: Collection<Document>,
}

impl MongoClient {
    /// Creates a client for `database.collection` at `uri`.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, AppError> {
        let opts = ClientOptions::parse(uri).await?;
        Self::with_options(opts, database, collection)
    }

    /// Creates a client from the `[mongodb]` config section.
    pub async fn from_config(config: &MongoConfig) -> Result<Self, AppError> {
        let mut opts = ClientOptions::parse(config.uri.as_str()).await?;
        opts.app_name = config.app_name.clone();
        Self::with_options(opts, &config.database, &config.collection)
    }

    fn with_options(
        opts: ClientOptions,
        database: &str,
        collection: &str,
    ) -> Result<Self, AppError> {
        let client = Client::with_options(opts)?;
        let database = client.database(database);
        let collection = database.collection::<Document>(collection);
        Ok(Self {
            database,
            collection,
        })
    }

    /// Round-trips a `ping` command to check the server is reachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// The underlying driver collection.
    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }
}

#[async_trait]
impl AggregateExecutor for MongoClient {
    fn collection_name(&self) -> &str {
        self.collection.name()
    }

    async fn aggregate(&self, pipeline: &Pipeline) -> Result<RowStream<'_>, AppError> {
        let cursor = self.collection.aggregate(render_pipeline(pipeline)).await?;

        Ok(Box::pin(
            cursor
                .map_err(AppError::from)
                .map(|doc| doc.and_then(document_to_row)),
        ))
    }
}

/// Converts a result document into a [`Row`] using relaxed extended JSON,
/// so integers and doubles come through as plain JSON numbers.
fn document_to_row(doc: Document) -> Result<Row, AppError> {
    Row::try_from(Bson::Document(doc).into_relaxed_extjson())
}

// ----------------------------------------------------------------------------
// Rendering
// ----------------------------------------------------------------------------

/// Renders a pipeline into aggregation-framework stage documents.
pub fn render_pipeline(pipeline: &Pipeline) -> Vec<Document> {
    pipeline.stages().iter().map(render_stage).collect()
}

fn render_stage(stage: &Stage) -> Document {
    match stage {
        Stage::Match(conditions) => doc! { "$match": render_conditions(conditions) },
        Stage::Unwind(path) => doc! { "$unwind": field_ref(path) },
        Stage::Group { key, accumulators } => {
            let mut group = doc! { "_id": render_expr(key) };
            for (name, acc) in accumulators {
                group.insert(name.clone(), render_accumulator(acc));
            }
            doc! { "$group": group }
        }
        Stage::Sort(keys) => {
            let mut sort = Document::new();
            for (field, order) in keys {
                let direction = match order {
                    SortOrder::Ascending => 1,
                    SortOrder::Descending => -1,
                };
                sort.insert(field.clone(), direction);
            }
            doc! { "$sort": sort }
        }
        Stage::Limit(n) => {
            let limit = i64::try_from(*n).unwrap_or(i64::MAX);
            doc! { "$limit": limit }
        }
        Stage::Project(fields) => {
            let mut projection = Document::new();
            for (name, expr) in fields {
                projection.insert(name.clone(), render_expr(expr));
            }
            doc! { "$project": projection }
        }
        Stage::Lookup {
            from,
            local_field,
            foreign_field,
            as_field,
        } => doc! {
            "$lookup": {
                "from": from.as_str(),
                "localField": local_field.as_str(),
                "foreignField": foreign_field.as_str(),
                "as": as_field.as_str(),
            }
        },
        Stage::Count(field) => doc! { "$count": field.as_str() },
    }
}

/// Renders conditions as a query filter. Conditions on the same field are
/// merged into one operator document, e.g. `{f: {$exists: true, $ne: []}}`.
fn render_conditions(conditions: &[Condition]) -> Document {
    let mut filter = Document::new();
    for condition in conditions {
        let field = condition.field();
        if !filter.contains_key(field) {
            filter.insert(field, Document::new());
        }
        let Some(Bson::Document(ops)) = filter.get_mut(field) else {
            continue;
        };
        match condition {
            Condition::Exists { exists, .. } => {
                ops.insert("$exists", *exists);
            }
            Condition::Ne { value, .. } => {
                ops.insert("$ne", render_literal(value));
            }
            Condition::Regex {
                pattern,
                case_insensitive,
                ..
            } => {
                ops.insert("$regex", pattern.as_str());
                if *case_insensitive {
                    ops.insert("$options", "i");
                }
            }
        }
    }
    filter
}

fn render_accumulator(acc: &Accumulator) -> Bson {
    match acc {
        Accumulator::Count => Bson::Document(doc! { "$sum": 1 }),
        Accumulator::Sum(expr) => Bson::Document(doc! { "$sum": render_expr(expr) }),
        Accumulator::Avg(expr) => Bson::Document(doc! { "$avg": render_expr(expr) }),
    }
}

fn render_expr(expr: &Expr) -> Bson {
    match expr {
        Expr::Field(path) => field_ref(path),
        Expr::Literal(literal) => render_literal(literal),
        Expr::Object(fields) => {
            let mut object = Document::new();
            for (name, value) in fields {
                object.insert(name.clone(), render_expr(value));
            }
            Bson::Document(object)
        }
        Expr::Ne(left, right) => Bson::Document(doc! {
            "$ne": [render_expr(left), render_expr(right)]
        }),
        Expr::Cond {
            condition,
            then,
            otherwise,
        } => Bson::Document(doc! {
            "$cond": [render_expr(condition), render_expr(then), render_expr(otherwise)]
        }),
        Expr::ParseDate(value) => Bson::Document(doc! {
            "$dateFromString": { "dateString": render_expr(value) }
        }),
        Expr::FormatDate { format, date } => Bson::Document(doc! {
            "$dateToString": { "format": format.as_str(), "date": render_expr(date) }
        }),
    }
}

fn render_literal(literal: &Literal) -> Bson {
    match literal {
        Literal::Null => Bson::Null,
        Literal::EmptyArray => Bson::Array(Vec::new()),
    }
}

fn field_ref(path: &str) -> Bson {
    Bson::String(format!("${}", path))
}
