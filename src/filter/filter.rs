use serde_json::Value;

use super::error::FilterError;
use super::evaluate;
use super::filter_where::FilterWhere;
use super::types::{FieldPath, FilterNode, FilterOp, FilterWhereInfo, SqlResult};

/// A parsed filter document. Top-level conditions are AND-ed.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    nodes: Vec<FilterNode>,
}

impl Filter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(where_data: &Value) -> Result<Self, FilterError> {
        Ok(Self { nodes: Self::parse_where_data(where_data)? })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[FilterNode] {
        &self.nodes
    }

    /// Compile into a predicate over the JSONB `column`. Placeholders start at
    /// `$param_offset + 1`.
    pub fn to_sql(&self, column: &str, param_offset: usize) -> SqlResult {
        FilterWhere::generate(&self.nodes, column, param_offset)
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.nodes.iter().all(|node| evaluate::matches_node(node, doc))
    }

    fn parse_where_data(where_data: &Value) -> Result<Vec<FilterNode>, FilterError> {
        let obj = match where_data {
            Value::Object(obj) => obj,
            Value::Null => return Ok(vec![]),
            _ => return Err(FilterError::InvalidWhereClause("filter must be an object".to_string())),
        };

        let mut nodes = Vec::with_capacity(obj.len());
        for (key, value) in obj {
            if key.starts_with('$') {
                nodes.push(Self::parse_logical_operator(key, value)?);
            } else {
                nodes.extend(Self::parse_field_condition(key, value)?);
            }
        }
        Ok(nodes)
    }

    fn parse_logical_operator(op: &str, value: &Value) -> Result<FilterNode, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value.as_array().ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                if arr.is_empty() { return Err(FilterError::InvalidOperatorData(format!("{} requires a non-empty array", op))); }
                let mut branches = Vec::with_capacity(arr.len());
                for v in arr {
                    if !v.is_object() { return Err(FilterError::InvalidOperatorData(format!("{} entries must be objects", op))); }
                    branches.push(FilterNode::And(Self::parse_where_data(v)?));
                }
                Ok(if op == "$and" { FilterNode::And(branches) } else { FilterNode::Or(branches) })
            }
            "$not" => {
                if !value.is_object() { return Err(FilterError::InvalidOperatorData("$not requires object".to_string())); }
                Ok(FilterNode::Not(Box::new(FilterNode::And(Self::parse_where_data(value)?))))
            }
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn parse_field_condition(field: &str, value: &Value) -> Result<Vec<FilterNode>, FilterError> {
        let path = FieldPath::parse(field)?;

        // `{ field: { $op: .. } }` only when every key is an operator; otherwise
        // the object is an equality operand.
        let operators = match value {
            Value::Object(obj) if !obj.is_empty() && obj.keys().all(|k| k.starts_with('$')) => obj,
            _ => {
                return Ok(vec![FilterNode::Condition(FilterWhereInfo { path, operator: FilterOp::Eq, data: value.clone() })]);
            }
        };

        let mut nodes = Vec::with_capacity(operators.len());
        for (op_key, op_val) in operators {
            let operator = FilterOp::from_key(op_key)?;
            Self::validate_operand(op_key, operator, op_val)?;
            nodes.push(FilterNode::Condition(FilterWhereInfo { path: path.clone(), operator, data: op_val.clone() }));
        }
        Ok(nodes)
    }

    fn validate_operand(op_key: &str, operator: FilterOp, data: &Value) -> Result<(), FilterError> {
        match operator {
            FilterOp::In | FilterOp::NIn | FilterOp::All if !data.is_array() => {
                Err(FilterError::InvalidOperatorData(format!("{} requires array", op_key)))
            }
            FilterOp::Exists if !data.is_boolean() => {
                Err(FilterError::InvalidOperatorData("$exists requires boolean".to_string()))
            }
            FilterOp::Size if data.as_u64().is_none() => {
                Err(FilterError::InvalidOperatorData("$size requires a non-negative integer".to_string()))
            }
            _ => Ok(()),
        }
    }
}
