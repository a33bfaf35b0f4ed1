use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Map, Value};
use sqlx::mysql::MySqlRow;
use sqlx::{Column, MySql, MySqlPool, QueryBuilder, Row as _, TypeInfo};

use super::{ContentStore, Filter, Query, Row, StoreError, StoreResult, Table, identifier};

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn push_value(builder: &mut QueryBuilder<'_, MySql>, value: &Value) {
    match value {
        Value::Null => {
            builder.push_bind(None::<String>);
        }
        Value::Bool(b) => {
            builder.push_bind(*b);
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                builder.push_bind(i);
            } else if let Some(u) = n.as_u64() {
                builder.push_bind(u);
            } else {
                builder.push_bind(n.as_f64().unwrap_or_default());
            }
        }
        Value::String(s) => {
            builder.push_bind(s.clone());
        }
        other => {
            builder.push_bind(other.to_string());
        }
    }
}

fn push_where(builder: &mut QueryBuilder<'_, MySql>, filters: &[&Filter]) -> StoreResult<()> {
    for (i, filter) in filters.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        builder.push(identifier(&filter.column)?);
        if filter.value.is_null() {
            builder.push(" IS NULL");
        } else {
            builder.push(" = ");
            push_value(builder, &filter.value);
        }
    }
    Ok(())
}

/// Reads a row of any shape into JSON, going by the column's declared type.
fn row_to_json(row: &MySqlRow) -> Result<Row, sqlx::Error> {
    let mut map = Map::new();
    for column in row.columns() {
        let name = column.name();
        let type_name = column.type_info().name();
        let value = match type_name {
            "BOOLEAN" => row.try_get::<Option<bool>, _>(name)?.map(Value::from),
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
                row.try_get::<Option<i64>, _>(name)?.map(Value::from)
            }
            "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
            | "BIGINT UNSIGNED" => row.try_get::<Option<u64>, _>(name)?.map(Value::from),
            "FLOAT" | "DOUBLE" => row.try_get::<Option<f64>, _>(name)?.map(Value::from),
            "DATE" => row
                .try_get::<Option<NaiveDate>, _>(name)?
                .map(|d| Value::from(d.to_string())),
            "TIME" => row
                .try_get::<Option<NaiveTime>, _>(name)?
                .map(|t| Value::from(t.to_string())),
            "DATETIME" => row
                .try_get::<Option<NaiveDateTime>, _>(name)?
                .map(|d| Value::from(d.format("%Y-%m-%dT%H:%M:%S").to_string())),
            "TIMESTAMP" => row
                .try_get::<Option<DateTime<Utc>>, _>(name)?
                .map(|d| Value::from(d.to_rfc3339())),
            "JSON" => row.try_get::<Option<Value>, _>(name)?,
            "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
                log::warn!("Kolom biner {} dilewati", name);
                None
            }
            _ => row.try_get::<Option<String>, _>(name)?.map(Value::from),
        };
        map.insert(name.to_string(), value.unwrap_or(Value::Null));
    }
    Ok(map)
}

#[async_trait]
impl ContentStore for MySqlStore {
    async fn select(&self, table: Table, query: &Query) -> StoreResult<Vec<Row>> {
        let mut builder = QueryBuilder::<MySql>::new("SELECT * FROM ");
        builder.push(identifier(table.name())?);
        let filters: Vec<&Filter> = query.filters.iter().collect();
        push_where(&mut builder, &filters)?;
        if let Some(order) = &query.order {
            builder.push(" ORDER BY ");
            builder.push(identifier(order.column)?);
            builder.push(if order.ascending { " ASC" } else { " DESC" });
        }

        let rows = builder.build().fetch_all(&self.pool).await.map_err(|e| {
            log::error!("Gagal select dari {}: {:?}", table, e);
            e
        })?;
        rows.iter()
            .map(|r| row_to_json(r).map_err(StoreError::from))
            .collect()
    }

    async fn insert(&self, table: Table, row: Row) -> StoreResult<()> {
        if row.is_empty() {
            return Err(StoreError::NotAnObject);
        }
        let mut builder = QueryBuilder::<MySql>::new("INSERT INTO ");
        builder.push(identifier(table.name())?);
        builder.push(" (");
        let mut columns = builder.separated(", ");
        for column in row.keys() {
            columns.push(identifier(column)?);
        }
        builder.push(") VALUES (");
        for (i, value) in row.values().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            push_value(&mut builder, value);
        }
        builder.push(")");

        builder.build().execute(&self.pool).await?;
        Ok(())
    }

    async fn update(&self, table: Table, row: Row, matching: &Filter) -> StoreResult<()> {
        if row.is_empty() {
            return Err(StoreError::NotAnObject);
        }
        let mut builder = QueryBuilder::<MySql>::new("UPDATE ");
        builder.push(identifier(table.name())?);
        builder.push(" SET ");
        for (i, (column, value)) in row.iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            builder.push(identifier(column)?);
            builder.push(" = ");
            push_value(&mut builder, value);
        }
        push_where(&mut builder, &[matching])?;

        builder.build().execute(&self.pool).await?;
        Ok(())
    }

    async fn upsert(&self, table: Table, row: Row, conflict_key: &str) -> StoreResult<()> {
        identifier(conflict_key)?;
        if !row.contains_key(conflict_key) {
            return Err(StoreError::InvalidIdentifier(conflict_key.to_string()));
        }
        let mut builder = QueryBuilder::<MySql>::new("INSERT INTO ");
        builder.push(identifier(table.name())?);
        builder.push(" (");
        let mut columns = builder.separated(", ");
        for column in row.keys() {
            columns.push(identifier(column)?);
        }
        builder.push(") VALUES (");
        for (i, value) in row.values().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            push_value(&mut builder, value);
        }
        // conflict resolution rides on the unique index of `conflict_key`
        builder.push(") ON DUPLICATE KEY UPDATE ");
        let updates: Vec<&String> = row.keys().filter(|c| c.as_str() != conflict_key).collect();
        if updates.is_empty() {
            builder.push(conflict_key);
            builder.push(" = ");
            builder.push(conflict_key);
        }
        for (i, column) in updates.into_iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            builder.push(format!("{0} = VALUES({0})", identifier(column)?));
        }

        builder.build().execute(&self.pool).await?;
        Ok(())
    }

    async fn delete(&self, table: Table, matching: &Filter) -> StoreResult<()> {
        let mut builder = QueryBuilder::<MySql>::new("DELETE FROM ");
        builder.push(identifier(table.name())?);
        push_where(&mut builder, &[matching])?;

        builder.build().execute(&self.pool).await?;
        Ok(())
    }
}
