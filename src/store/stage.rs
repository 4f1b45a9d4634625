//! Store-agnostic pipeline stage descriptors.
//!
//! A stage names a capability (filter, expand, group, ...) and carries the
//! field paths and expressions it needs. Backends decide how each stage is
//! spelled for their client; see [`crate::store::backends`].

/// A constant value usable inside expressions and filters.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    /// The empty array `[]`.
    EmptyArray,
}

/// An expression evaluated against each input row.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A (possibly dotted) field path, e.g. `repo_languages.languages`.
    Field(String),
    Literal(Literal),
    /// A sub-document built from named expressions, in order.
    Object(Vec<(String, Expr)>),
    /// True when both sides differ.
    Ne(Box<Expr>, Box<Expr>),
    /// `then` when `condition` holds, otherwise `otherwise`.
    Cond {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Parse an ISO-8601 string into a timestamp.
    ParseDate(Box<Expr>),
    /// Format a timestamp (UTC) with a strftime-style format.
    FormatDate { format: String, date: Box<Expr> },
}

impl Expr {
    pub fn field(path: impl Into<String>) -> Self {
        Expr::Field(path.into())
    }

    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Expr)>) -> Self {
        Expr::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn ne(left: Expr, right: Expr) -> Self {
        Expr::Ne(Box::new(left), Box::new(right))
    }

    pub fn cond(condition: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::Cond {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn parse_date(value: Expr) -> Self {
        Expr::ParseDate(Box::new(value))
    }

    pub fn format_date(format: impl Into<String>, date: Expr) -> Self {
        Expr::FormatDate {
            format: format.into(),
            date: Box::new(date),
        }
    }

    /// Truncates an ISO-8601 timestamp string to its calendar day (`YYYY-MM-DD`, UTC).
    pub fn day_of(timestamp: Expr) -> Self {
        Self::format_date("%Y-%m-%d", Self::parse_date(timestamp))
    }
}

/// A per-group aggregate.
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    /// Number of rows in the group.
    Count,
    Sum(Expr),
    Avg(Expr),
}

/// One predicate on a single field, used by [`Stage::Match`].
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Exists { field: String, exists: bool },
    Ne { field: String, value: Literal },
    Regex {
        field: String,
        pattern: String,
        case_insensitive: bool,
    },
}

impl Condition {
    pub fn exists(field: impl Into<String>) -> Self {
        Condition::Exists {
            field: field.into(),
            exists: true,
        }
    }

    pub fn ne(field: impl Into<String>, value: Literal) -> Self {
        Condition::Ne {
            field: field.into(),
            value,
        }
    }

    pub fn regex(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Condition::Regex {
            field: field.into(),
            pattern: pattern.into(),
            case_insensitive: false,
        }
    }

    /// Same as [`Condition::regex`], ignoring case.
    pub fn iregex(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Condition::Regex {
            field: field.into(),
            pattern: pattern.into(),
            case_insensitive: true,
        }
    }

    /// The field this condition tests.
    pub fn field(&self) -> &str {
        match self {
            Condition::Exists { field, .. }
            | Condition::Ne { field, .. }
            | Condition::Regex { field, .. } => field,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// One step of a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Keep rows satisfying every condition.
    Match(Vec<Condition>),
    /// Emit one row per element of an array field. Rows whose field is
    /// missing, null or empty are dropped.
    Unwind(String),
    /// Partition rows by `key` and compute each named accumulator.
    Group {
        key: Expr,
        accumulators: Vec<(String, Accumulator)>,
    },
    Sort(Vec<(String, SortOrder)>),
    Limit(u64),
    /// Reshape each row into the named expressions.
    Project(Vec<(String, Expr)>),
    /// Correlate each row with rows of `from` where
    /// `local_field == foreign_field`, collected into the array `as_field`.
    Lookup {
        from: String,
        local_field: String,
        foreign_field: String,
        as_field: String,
    },
    /// Replace the input with a single row `{ field: <row count> }`.
    Count(String),
}

impl Stage {
    /// Short capability name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Match(_) => "match",
            Stage::Unwind(_) => "unwind",
            Stage::Group { .. } => "group",
            Stage::Sort(_) => "sort",
            Stage::Limit(_) => "limit",
            Stage::Project(_) => "project",
            Stage::Lookup { .. } => "lookup",
            Stage::Count(_) => "count",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_of_nests_parse_inside_format() {
        let expr = Expr::day_of(Expr::field("created_at"));
        assert_eq!(
            expr,
            Expr::FormatDate {
                format: "%Y-%m-%d".to_string(),
                date: Box::new(Expr::ParseDate(Box::new(Expr::Field(
                    "created_at".to_string()
                )))),
            }
        );
    }

    #[test]
    fn test_condition_field() {
        assert_eq!(Condition::exists("languages").field(), "languages");
        assert_eq!(
            Condition::iregex("keywords_from_readme", "^[A-Za-z]+$").field(),
            "keywords_from_readme"
        );
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Limit(10).name(), "limit");
        assert_eq!(Stage::Count("n".to_string()).name(), "count");
        assert_eq!(Stage::Unwind("languages".to_string()).name(), "unwind");
    }
}
