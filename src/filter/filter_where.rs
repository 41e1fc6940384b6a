use serde_json::Value;

use super::types::{FilterNode, FilterOp, FilterWhereInfo, SqlResult};

/// Builds a parameterised predicate over a JSONB column.
///
/// Every condition is wrapped in `COALESCE(.., FALSE)` so that missing paths
/// (SQL NULL) never leak three-valued logic into `$not` and `$nin`.
pub struct FilterWhere<'a> {
    column: &'a str,
    param_values: Vec<Value>,
    param_index: usize,
}

impl<'a> FilterWhere<'a> {
    pub fn new(column: &'a str, starting_param_index: usize) -> Self {
        Self { column, param_values: vec![], param_index: starting_param_index }
    }

    pub fn generate(nodes: &[FilterNode], column: &str, starting_param_index: usize) -> SqlResult {
        let mut filter_where = FilterWhere::new(column, starting_param_index);
        let query = filter_where.build_all(nodes);
        SqlResult { query, params: filter_where.param_values }
    }

    fn build_all(&mut self, nodes: &[FilterNode]) -> String {
        if nodes.is_empty() { return "TRUE".to_string(); }
        let parts: Vec<String> = nodes.iter().map(|n| self.build_node(n)).collect();
        if parts.len() == 1 { parts.into_iter().next().unwrap_or_default() } else { format!("({})", parts.join(" AND ")) }
    }

    fn build_node(&mut self, node: &FilterNode) -> String {
        match node {
            FilterNode::Condition(info) => format!("COALESCE({}, FALSE)", self.build_sql_condition(info)),
            FilterNode::And(children) => self.build_all(children),
            FilterNode::Or(children) => {
                let parts: Vec<String> = children.iter().map(|c| self.build_node(c)).collect();
                format!("({})", parts.join(" OR "))
            }
            FilterNode::Not(inner) => format!("(NOT {})", self.build_node(inner)),
        }
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> String {
        let field = format!("({} #> {})", self.column, condition.path.to_pg_path());
        match condition.operator {
            FilterOp::Eq => self.equality(&field, &condition.data),
            FilterOp::Ne => format!("(NOT COALESCE({}, FALSE))", self.equality(&field, &condition.data)),
            FilterOp::Gt | FilterOp::Gte | FilterOp::Lt | FilterOp::Lte => {
                let op = condition.operator.comparison_sql().unwrap_or("=");
                let param = self.param(condition.data.clone());
                format!("(jsonb_typeof({field}) = jsonb_typeof({param}) AND {field} {op} {param})")
            }
            FilterOp::In => self.any_equal(&field, &condition.data),
            FilterOp::NIn => format!("(NOT COALESCE({}, FALSE))", self.any_equal(&field, &condition.data)),
            FilterOp::All => format!("({} @> {})", field, self.param(condition.data.clone())),
            FilterOp::Exists => {
                if condition.data.as_bool().unwrap_or(true) { format!("({} IS NOT NULL)", field) } else { format!("({} IS NULL)", field) }
            }
            FilterOp::Size => {
                let size = condition.data.as_u64().unwrap_or(0);
                format!("(CASE WHEN jsonb_typeof({field}) = 'array' THEN jsonb_array_length({field}) = {size} ELSE FALSE END)")
            }
        }
    }

    /// Scalar operands use containment so that arrays holding the value match too.
    fn equality(&mut self, field: &str, data: &Value) -> String {
        match data {
            Value::Null => format!("({field} IS NULL OR {field} = 'null'::jsonb)"),
            Value::Object(_) | Value::Array(_) => format!("({} = {})", field, self.param(data.clone())),
            _ => format!("({} @> {})", field, self.param(data.clone())),
        }
    }

    fn any_equal(&mut self, field: &str, data: &Value) -> String {
        let values = data.as_array().cloned().unwrap_or_default();
        if values.is_empty() { return "FALSE".to_string(); }
        let parts: Vec<String> = values.iter().map(|v| self.equality(field, v)).collect();
        format!("({})", parts.join(" OR "))
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}::jsonb", self.param_index)
    }
}
