//! Row and streaming types for aggregation results.

use crate::error::AppError;
use futures::Stream;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::pin::Pin;

/// A stream of rows from an aggregation result.
///
/// Rows arrive in the order the pipeline produced them.
pub type RowStream<'a> = Pin<Box<dyn Stream<Item = Result<Row, AppError>> + Send + 'a>>;

/// A single result record.
///
/// Holds field values as JSON, with typed extraction via [`Row::get`] or
/// whole-row decoding via [`Row::decode`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    data: Map<String, JsonValue>,
}

impl Row {
    /// Creates a new row from a map of field names to values.
    pub fn new(data: Map<String, JsonValue>) -> Self {
        Self { data }
    }

    /// Gets a field, deserializing to the requested type.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is missing or cannot be deserialized.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let count: i64 = row.get("count")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, AppError> {
        self.data
            .get(key)
            .ok_or_else(|| AppError::ColumnNotFound(key.to_string()))
            .and_then(|v| {
                serde_json::from_value(v.clone()).map_err(|e| AppError::Decode {
                    column: key.to_string(),
                    message: e.to_string(),
                })
            })
    }

    /// Decodes the whole row into a typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_value(JsonValue::Object(self.data.clone())).map_err(|e| {
            AppError::Decode {
                column: "<row>".to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl From<Map<String, JsonValue>> for Row {
    fn from(data: Map<String, JsonValue>) -> Self {
        Self::new(data)
    }
}

impl TryFrom<JsonValue> for Row {
    type Error = AppError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::Object(data) => Ok(Self::new(data)),
            other => Err(AppError::Internal(format!(
                "expected a document, got: {}",
                other
            ))),
        }
    }
}
