use serde_json::{Map, Value};
use std::cmp::Ordering;

use super::types::{FieldPath, FilterNode, FilterOp, FilterWhereInfo};

pub fn matches_node(node: &FilterNode, doc: &Value) -> bool {
    match node {
        FilterNode::Condition(info) => matches_condition(info, doc),
        FilterNode::And(children) => children.iter().all(|c| matches_node(c, doc)),
        FilterNode::Or(children) => children.iter().any(|c| matches_node(c, doc)),
        FilterNode::Not(inner) => !matches_node(inner, doc),
    }
}

fn matches_condition(info: &FilterWhereInfo, doc: &Value) -> bool {
    let actual = resolve(doc, &info.path);
    match info.operator {
        FilterOp::Eq => equals(actual, &info.data),
        FilterOp::Ne => !equals(actual, &info.data),
        FilterOp::Gt => compare(actual, &info.data) == Some(Ordering::Greater),
        FilterOp::Gte => matches!(compare(actual, &info.data), Some(Ordering::Greater | Ordering::Equal)),
        FilterOp::Lt => compare(actual, &info.data) == Some(Ordering::Less),
        FilterOp::Lte => matches!(compare(actual, &info.data), Some(Ordering::Less | Ordering::Equal)),
        FilterOp::In => info.data.as_array().map_or(false, |vs| vs.iter().any(|v| equals(actual, v))),
        FilterOp::NIn => !info.data.as_array().map_or(false, |vs| vs.iter().any(|v| equals(actual, v))),
        FilterOp::All => match actual {
            Some(have @ Value::Array(_)) => contains(have, &info.data),
            _ => false,
        },
        FilterOp::Exists => actual.is_some() == info.data.as_bool().unwrap_or(true),
        FilterOp::Size => match actual {
            Some(Value::Array(items)) => Some(items.len() as u64) == info.data.as_u64(),
            _ => false,
        },
    }
}

pub fn resolve<'v>(doc: &'v Value, path: &FieldPath) -> Option<&'v Value> {
    path.segments().iter().try_fold(doc, |current, segment| match current {
        Value::Object(obj) => obj.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Mutable lookup that creates intermediate objects as needed.
pub fn resolve_mut<'v>(doc: &'v mut Value, path: &FieldPath) -> Option<&'v mut Value> {
    let (last, parents) = path.segments().split_last()?;
    let mut current = doc;
    for segment in parents {
        if current.is_null() { *current = Value::Object(Map::new()); }
        current = match current {
            Value::Object(obj) => obj.entry(segment.clone()).or_insert(Value::Null),
            Value::Array(items) => items.get_mut(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    if current.is_null() { *current = Value::Object(Map::new()); }
    match current {
        Value::Object(obj) => Some(obj.entry(last.clone()).or_insert(Value::Null)),
        Value::Array(items) => items.get_mut(last.parse::<usize>().ok()?),
        _ => None,
    }
}

pub fn remove(doc: &mut Value, path: &FieldPath) -> bool {
    let Some((last, parents)) = path.segments().split_last() else { return false };
    let mut current = doc;
    for segment in parents {
        current = match current {
            Value::Object(obj) => match obj.get_mut(segment) {
                Some(next) => next,
                None => return false,
            },
            _ => return false,
        };
    }
    match current {
        Value::Object(obj) => obj.remove(last).is_some(),
        _ => false,
    }
}

fn equals(actual: Option<&Value>, expected: &Value) -> bool {
    match (actual, expected) {
        (None, Value::Null) => true,
        (None, _) => false,
        (Some(value), expected) if same(value, expected) => true,
        (Some(Value::Array(items)), expected) if !expected.is_array() && !expected.is_object() => {
            items.iter().any(|item| same(item, expected))
        }
        _ => false,
    }
}

/// JSON equality that treats `1` and `1.0` as the same number.
pub fn same(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same(x, y)),
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len() && xs.iter().all(|(k, x)| ys.get(k).map_or(false, |y| same(x, y)))
        }
        _ => a == b,
    }
}

/// JSONB `@>` containment: objects match on a subset of keys, arrays when
/// every wanted element is contained by some element present.
pub fn contains(have: &Value, want: &Value) -> bool {
    match (have, want) {
        (Value::Object(h), Value::Object(w)) => w.iter().all(|(k, wv)| h.get(k).map_or(false, |hv| contains(hv, wv))),
        (Value::Array(h), Value::Array(w)) => w.iter().all(|wv| h.iter().any(|hv| contains(hv, wv))),
        _ => same(have, want),
    }
}

fn compare(actual: Option<&Value>, expected: &Value) -> Option<Ordering> {
    match (actual?, expected) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
