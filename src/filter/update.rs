use serde_json::{Map, Value};

use super::error::FilterError;
use super::evaluate;
use super::types::{FieldPath, SqlResult};

#[derive(Debug, Clone)]
pub enum UpdateOp {
    Set(FieldPath, Value),
    Unset(FieldPath),
    AddToSet(FieldPath, Value),
}

/// A parsed update document (`$set`, `$unset`, `$addToSet`).
#[derive(Debug, Clone, Default)]
pub struct Update {
    ops: Vec<UpdateOp>,
}

impl Update {
    pub fn new(update_data: &Value) -> Result<Self, FilterError> {
        let obj = update_data
            .as_object()
            .ok_or_else(|| FilterError::InvalidUpdate("update must be an object".to_string()))?;
        if obj.is_empty() { return Err(FilterError::InvalidUpdate("update cannot be empty".to_string())); }

        let mut update = Self::default();
        for (op, fields) in obj {
            let fields = fields
                .as_object()
                .ok_or_else(|| FilterError::InvalidUpdate(format!("{} requires an object", op)))?;
            for (field, value) in fields {
                let path = Self::mutable_path(field)?;
                update.ops.push(match op.as_str() {
                    "$set" => UpdateOp::Set(path, value.clone()),
                    "$unset" => UpdateOp::Unset(path),
                    "$addToSet" => UpdateOp::AddToSet(path, value.clone()),
                    other => return Err(FilterError::UnsupportedOperator(other.to_string())),
                });
            }
        }
        Ok(update)
    }

    /// `$set` of every entry in `fields`.
    pub fn set_fields(fields: Map<String, Value>) -> Result<Self, FilterError> {
        fields.into_iter().try_fold(Self::default(), |update, (field, value)| update.set(&field, value))
    }

    pub fn set(mut self, field: &str, value: Value) -> Result<Self, FilterError> {
        self.ops.push(UpdateOp::Set(Self::mutable_path(field)?, value));
        Ok(self)
    }

    pub fn add_to_set(mut self, field: &str, value: Value) -> Result<Self, FilterError> {
        self.ops.push(UpdateOp::AddToSet(Self::mutable_path(field)?, value));
        Ok(self)
    }

    pub fn ops(&self) -> &[UpdateOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// True when a `$set` targets `field` (top-level name).
    pub fn sets(&self, field: &str) -> bool {
        self.ops.iter().any(|op| matches!(op, UpdateOp::Set(path, _) if path.segments()[0] == field))
    }

    /// Compile into a JSONB expression over `column`; each operation sees the
    /// result of the ones before it. `$addToSet` on a present non-array value
    /// leaves it untouched, as [`apply`](Self::apply) does.
    pub fn to_sql(&self, column: &str, param_offset: usize) -> SqlResult {
        let mut params = Vec::new();
        let mut expr = column.to_string();
        let param = |value: &Value, params: &mut Vec<Value>| {
            params.push(value.clone());
            format!("${}::jsonb", param_offset + params.len())
        };

        for op in &self.ops {
            expr = match op {
                UpdateOp::Set(path, value) => {
                    format!("jsonb_set({}, {}, {}, true)", expr, path.to_pg_path(), param(value, &mut params))
                }
                UpdateOp::Unset(path) => format!("({} #- {})", expr, path.to_pg_path()),
                UpdateOp::AddToSet(path, value) => {
                    let current = format!("COALESCE({} #> {}, 'null'::jsonb)", expr, path.to_pg_path());
                    let item = param(value, &mut params);
                    format!(
                        "jsonb_set({expr}, {path}, CASE \
                         WHEN jsonb_typeof({current}) = 'null' THEN jsonb_build_array({item}) \
                         WHEN jsonb_typeof({current}) <> 'array' THEN {current} \
                         WHEN EXISTS (SELECT 1 FROM jsonb_array_elements({current}) AS e(v) WHERE e.v = {item}) THEN {current} \
                         ELSE {current} || jsonb_build_array({item}) END, true)",
                        path = path.to_pg_path(),
                    )
                }
            };
        }

        SqlResult { query: expr, params }
    }

    /// Apply to an in-memory document; returns whether anything changed.
    pub fn apply(&self, doc: &mut Value) -> bool {
        let before = doc.clone();
        for op in &self.ops {
            match op {
                UpdateOp::Set(path, value) => {
                    if let Some(slot) = evaluate::resolve_mut(doc, path) {
                        *slot = value.clone();
                    }
                }
                UpdateOp::Unset(path) => {
                    evaluate::remove(doc, path);
                }
                UpdateOp::AddToSet(path, value) => {
                    if let Some(slot) = evaluate::resolve_mut(doc, path) {
                        match slot {
                            Value::Array(items) => {
                                if !items.iter().any(|item| evaluate::same(item, value)) {
                                    items.push(value.clone());
                                }
                            }
                            Value::Null => *slot = Value::Array(vec![value.clone()]),
                            _ => {}
                        }
                    }
                }
            }
        }
        *doc != before
    }

    fn mutable_path(field: &str) -> Result<FieldPath, FilterError> {
        let path = FieldPath::parse(field)?;
        if path.is_id() { return Err(FilterError::ImmutableField("_id".to_string())); }
        Ok(path)
    }
}
