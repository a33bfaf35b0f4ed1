use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use super::{ContentStore, Filter, Query, Row, StoreError, StoreResult, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Upsert,
    Delete,
}

/// A store call as seen by [`MemoryStore`], kept for assertions in tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub operation: Operation,
    pub table: Table,
    pub row: Option<Row>,
    pub key: Option<String>,
}

#[derive(Default)]
struct MemoryState {
    tables: HashMap<Table, Vec<Row>>,
    next_id: HashMap<Table, i64>,
    // calls still allowed to succeed before the operation starts failing
    failing: HashMap<(Operation, Table), usize>,
    calls: Vec<Call>,
}

/// In-process content store. Rows keep insertion order; inserts without an
/// `id` get the next integer id of their table.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, table: Table, rows: Vec<Row>) -> Self {
        {
            let mut state = self.lock();
            let max_id = rows
                .iter()
                .filter_map(|r| r.get("id").and_then(Value::as_i64))
                .max()
                .unwrap_or(0);
            state.next_id.insert(table, max_id + 1);
            state.tables.insert(table, rows);
        }
        self
    }

    /// Makes every subsequent `operation` on `table` fail with a backend error.
    pub fn fail_on(&self, operation: Operation, table: Table) {
        self.fail_after(operation, table, 0);
    }

    /// Lets `successes` more calls through, then fails like [`Self::fail_on`].
    pub fn fail_after(&self, operation: Operation, table: Table, successes: usize) {
        self.lock().failing.insert((operation, table), successes);
    }

    pub fn recover(&self, operation: Operation, table: Table) {
        self.lock().failing.remove(&(operation, table));
    }

    pub fn rows(&self, table: Table) -> Vec<Row> {
        self.lock().tables.get(&table).cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn calls_of(&self, operation: Operation) -> Vec<Call> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // a panicking test must not poison the other assertions
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(
        state: &mut MemoryState,
        operation: Operation,
        table: Table,
        row: Option<Row>,
        key: Option<String>,
    ) -> StoreResult<()> {
        state.calls.push(Call {
            operation,
            table,
            row,
            key,
        });
        match state.failing.get_mut(&(operation, table)) {
            Some(0) => Err(StoreError::Backend {
                status: 500,
                message: format!("simulated {:?} failure on {}", operation, table),
            }),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn select(&self, table: Table, query: &Query) -> StoreResult<Vec<Row>> {
        let mut state = self.lock();
        Self::record(&mut state, Operation::Select, table, None, None)?;
        let mut rows: Vec<Row> = state
            .tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| f.matches(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare(a.get(order.column), b.get(order.column));
                if order.ascending { ord } else { ord.reverse() }
            });
        }
        Ok(rows)
    }

    async fn insert(&self, table: Table, mut row: Row) -> StoreResult<()> {
        let mut state = self.lock();
        Self::record(&mut state, Operation::Insert, table, Some(row.clone()), None)?;
        let next = state.next_id.entry(table).or_insert(1);
        match row.get("id").and_then(Value::as_i64) {
            Some(id) => *next = (*next).max(id + 1),
            None if row.get("id").is_none_or(Value::is_null) => {
                row.insert("id".into(), Value::from(*next));
                *next += 1;
            }
            None => {}
        }
        state.tables.entry(table).or_default().push(row);
        Ok(())
    }

    async fn update(&self, table: Table, row: Row, matching: &Filter) -> StoreResult<()> {
        let mut state = self.lock();
        Self::record(
            &mut state,
            Operation::Update,
            table,
            Some(row.clone()),
            Some(matching.column.clone()),
        )?;
        for existing in state.tables.entry(table).or_default().iter_mut() {
            if matching.matches(existing) {
                for (column, value) in &row {
                    existing.insert(column.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    async fn upsert(&self, table: Table, row: Row, conflict_key: &str) -> StoreResult<()> {
        let mut state = self.lock();
        Self::record(
            &mut state,
            Operation::Upsert,
            table,
            Some(row.clone()),
            Some(conflict_key.to_string()),
        )?;
        let key = row.get(conflict_key).cloned().unwrap_or(Value::Null);
        let filter = Filter::new(conflict_key, key);
        let rows = state.tables.entry(table).or_default();
        match rows.iter_mut().find(|existing| filter.matches(existing)) {
            Some(existing) => {
                for (column, value) in row {
                    existing.insert(column, value);
                }
            }
            None => rows.push(row),
        }
        Ok(())
    }

    async fn delete(&self, table: Table, matching: &Filter) -> StoreResult<()> {
        let mut state = self.lock();
        Self::record(
            &mut state,
            Operation::Delete,
            table,
            None,
            Some(matching.column.clone()),
        )?;
        state
            .tables
            .entry(table)
            .or_default()
            .retain(|row| !matching.matches(row));
        Ok(())
    }
}
