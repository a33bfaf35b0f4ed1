use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use super::{ContentStore, Filter, Query, Row, StoreError, StoreResult, Table, identifier};

/// Client for a hosted PostgREST-style table API (`/rest/v1/{table}`).
#[derive(Clone)]
pub struct RestStore {
    http: Client,
    base_url: String,
    api_key: String,
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn eq_param(filter: &Filter) -> StoreResult<(String, String)> {
    Ok((
        identifier(&filter.column)?.to_string(),
        format!("eq.{}", literal(&filter.value)),
    ))
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str) -> StoreResult<Self> {
        let http = Client::builder()
            .user_agent("desa-suntenjaya-backend/0.1")
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self, table: Table) -> StoreResult<String> {
        Ok(format!("{}/rest/v1/{}", self.base_url, identifier(table.name())?))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn checked(table: Table, response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        log::error!("Content store menolak permintaan ke {}: {} {}", table, status, message);
        Err(StoreError::Backend {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ContentStore for RestStore {
    async fn select(&self, table: Table, query: &Query) -> StoreResult<Vec<Row>> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        for filter in &query.filters {
            params.push(eq_param(filter)?);
        }
        if let Some(order) = &query.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push((
                "order".to_string(),
                format!("{}.{}", identifier(order.column)?, direction),
            ));
        }

        let request = self.http.get(self.endpoint(table)?).query(&params);
        let response = self.authorized(request).send().await?;
        let rows = Self::checked(table, response).await?.json::<Vec<Row>>().await?;
        Ok(rows)
    }

    async fn insert(&self, table: Table, row: Row) -> StoreResult<()> {
        let request = self
            .http
            .post(self.endpoint(table)?)
            .header("Prefer", "return=minimal")
            .json(&[row]);
        let response = self.authorized(request).send().await?;
        Self::checked(table, response).await?;
        Ok(())
    }

    async fn update(&self, table: Table, row: Row, matching: &Filter) -> StoreResult<()> {
        let request = self
            .http
            .patch(self.endpoint(table)?)
            .query(&[eq_param(matching)?])
            .header("Prefer", "return=minimal")
            .json(&row);
        let response = self.authorized(request).send().await?;
        Self::checked(table, response).await?;
        Ok(())
    }

    async fn upsert(&self, table: Table, row: Row, conflict_key: &str) -> StoreResult<()> {
        let request = self
            .http
            .post(self.endpoint(table)?)
            .query(&[("on_conflict", identifier(conflict_key)?)])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[row]);
        let response = self.authorized(request).send().await?;
        Self::checked(table, response).await?;
        Ok(())
    }

    async fn delete(&self, table: Table, matching: &Filter) -> StoreResult<()> {
        let request = self
            .http
            .delete(self.endpoint(table)?)
            .query(&[eq_param(matching)?]);
        let response = self.authorized(request).send().await?;
        Self::checked(table, response).await?;
        Ok(())
    }
}
