//! In-process table store.
//!
//! Rows are plain JSON objects. Like the hosted store, inserts fill in `id`
//! and `created_at` when the caller leaves them out.

use super::query::{Direction, Filter, FilterOp, FilterValue, SelectQuery};
use super::{StoreError, TableStore};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

type Tables = HashMap<String, Vec<Map<String, Value>>>;

#[derive(Debug, Default)]
pub struct MemoryTableStore {
    tables: RwLock<Tables>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load rows as-is, without filling defaults.
    pub fn seed(&self, table: &str, rows: Vec<Value>) -> Result<(), StoreError> {
        let mut objects = Vec::with_capacity(rows.len());
        for row in rows {
            objects.push(into_object(row)?);
        }
        let mut tables = self.write()?;
        tables.entry(table.to_string()).or_default().extend(objects);
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Transport("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Transport("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError> {
        let tables = self.read()?;
        let mut rows: Vec<Map<String, Value>> = tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(row, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(tables);

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                nulls_last(a.get(&order.column), b.get(&order.column), order.direction)
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows
            .into_iter()
            .map(|row| project(row, &query.columns))
            .collect())
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, StoreError> {
        let mut inserted = Vec::with_capacity(rows.len());
        for row in rows {
            let mut object = into_object(row)?;
            if !object.get("id").map(is_present).unwrap_or(false) {
                object.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
            }
            if !object.get("created_at").map(is_present).unwrap_or(false) {
                object.insert(
                    "created_at".to_string(),
                    Value::String(Utc::now().to_rfc3339()),
                );
            }
            inserted.push(object);
        }

        let mut tables = self.write()?;
        tables
            .entry(table.to_string())
            .or_default()
            .extend(inserted.iter().cloned());

        Ok(inserted.into_iter().map(Value::Object).collect())
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        let patch = into_object(patch)?;
        let mut tables = self.write()?;
        let mut updated = Vec::new();

        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| matches_all(row, filters)) {
                for (key, value) in &patch {
                    row.insert(key.clone(), value.clone());
                }
                updated.push(Value::Object(row.clone()));
            }
        }

        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, StoreError> {
        let mut tables = self.write()?;
        let mut removed = Vec::new();

        if let Some(rows) = tables.get_mut(table) {
            let mut kept = Vec::with_capacity(rows.len());
            for row in rows.drain(..) {
                if matches_all(&row, filters) {
                    removed.push(Value::Object(row));
                } else {
                    kept.push(row);
                }
            }
            *rows = kept;
        }

        Ok(removed)
    }
}

fn into_object(value: Value) -> Result<Map<String, Value>, StoreError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Encode(format!(
            "expected a JSON object row, got {}",
            other
        ))),
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn project(row: Map<String, Value>, columns: &[String]) -> Value {
    if columns.is_empty() || columns.iter().any(|c| c == "*") {
        return Value::Object(row);
    }
    let projected = row
        .into_iter()
        .filter(|(key, _)| columns.iter().any(|c| c == key))
        .collect();
    Value::Object(projected)
}

fn matches_all(row: &Map<String, Value>, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| matches(row, filter))
}

/// SQL-style: a missing or null column never satisfies a predicate.
fn matches(row: &Map<String, Value>, filter: &Filter) -> bool {
    let value = match row.get(&filter.column) {
        Some(Value::Null) | None => return false,
        Some(value) => value,
    };

    match (&filter.op, &filter.value) {
        (FilterOp::In, FilterValue::List(candidates)) => {
            let text = scalar_text(value);
            candidates.iter().any(|c| *c == text)
        }
        (FilterOp::Like, FilterValue::Single(pattern)) => like(&scalar_text(value), pattern),
        (op, FilterValue::Single(expected)) => {
            let ordering = compare_scalar(value, expected);
            match op {
                FilterOp::Eq => ordering == Ordering::Equal,
                FilterOp::Neq => ordering != Ordering::Equal,
                FilterOp::Lt => ordering == Ordering::Less,
                FilterOp::Lte => ordering != Ordering::Greater,
                FilterOp::Gt => ordering == Ordering::Greater,
                FilterOp::Gte => ordering != Ordering::Less,
                FilterOp::Like | FilterOp::In => false,
            }
        }
        (_, FilterValue::List(_)) => false,
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numbers compare numerically when the filter value parses; everything
/// else compares as text, which orders ISO-8601 dates correctly.
fn compare_scalar(value: &Value, expected: &str) -> Ordering {
    if let Value::Number(n) = value {
        if let (Some(actual), Ok(wanted)) = (n.as_f64(), expected.parse::<f64>()) {
            return actual.partial_cmp(&wanted).unwrap_or(Ordering::Equal);
        }
    }
    scalar_text(value).as_str().cmp(expected)
}

fn nulls_last(a: Option<&Value>, b: Option<&Value>, direction: Direction) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    let ordering = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => scalar_text(x).cmp(&scalar_text(y)),
    };
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

/// `%` matches any run of characters; matching is case-sensitive.
fn like(text: &str, pattern: &str) -> bool {
    let parts: Vec<&str> = pattern.split('%').collect();
    if parts.len() == 1 {
        return text == pattern;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];
    if !text.starts_with(first) || text.len() < first.len() + last.len() {
        return false;
    }

    let mut rest = &text[first.len()..];
    for part in &parts[1..parts.len() - 1] {
        match rest.find(part) {
            Some(idx) => rest = &rest[idx + part.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}
