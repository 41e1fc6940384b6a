use serde_json::Value;
use std::fmt;

use super::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NIn,
    All,
    Exists,
    Size,
}

impl FilterOp {
    pub fn from_key(key: &str) -> Result<Self, FilterError> {
        Ok(match key {
            "$eq" => FilterOp::Eq,
            "$ne" => FilterOp::Ne,
            "$gt" => FilterOp::Gt,
            "$gte" => FilterOp::Gte,
            "$lt" => FilterOp::Lt,
            "$lte" => FilterOp::Lte,
            "$in" => FilterOp::In,
            "$nin" => FilterOp::NIn,
            "$all" => FilterOp::All,
            "$exists" => FilterOp::Exists,
            "$size" => FilterOp::Size,
            other => return Err(FilterError::UnsupportedOperator(other.to_string())),
        })
    }

    pub fn comparison_sql(&self) -> Option<&'static str> {
        match self {
            FilterOp::Gt => Some(">"),
            FilterOp::Gte => Some(">="),
            FilterOp::Lt => Some("<"),
            FilterOp::Lte => Some("<="),
            _ => None,
        }
    }
}

/// Dotted path into a document, e.g. `location.point.coordinates.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn parse(raw: &str) -> Result<Self, FilterError> {
        if raw.is_empty() { return Err(FilterError::InvalidField("Field name cannot be empty".to_string())); }
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        for segment in &segments {
            if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(FilterError::InvalidField(format!("Invalid field name format: {}", raw)));
            }
        }
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_id(&self) -> bool {
        self.0.first().map(String::as_str) == Some("_id")
    }

    /// Postgres text[] path literal, e.g. `'{location,point}'`.
    pub fn to_pg_path(&self) -> String {
        format!("'{{{}}}'", self.0.join(","))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

#[derive(Debug, Clone)]
pub struct FilterWhereInfo {
    pub path: FieldPath,
    pub operator: FilterOp,
    pub data: Value,
}

#[derive(Debug, Clone)]
pub enum FilterNode {
    Condition(FilterWhereInfo),
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    Not(Box<FilterNode>),
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}
