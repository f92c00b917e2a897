use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, PgPool, Row};

use crate::model::{
    Endpoint, ExampleSchema, Id, NewEndpoint, NewExampleSchema, NewProxy, Proxy,
    UNAUTHORIZED_STATUS,
};
use crate::store::traits::{EndpointStore, ExampleStore, ProxyStore, Store};

const SCHEMA_COLUMNS: &str = "id, endpoint_id, status_code, req_json, res_json, \
     path_params, header_json, enabled, is_deleted, created_at";

// Numeric status ascending with non-numeric codes last, newest row first within a status
const SCHEMA_ORDER: &str = r#"CASE WHEN status_code ~ '^\s*\+?[0-9]{1,9}\s*$'
        THEN trim(status_code)::bigint END ASC NULLS LAST,
    id DESC"#;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn proxy_from_row(row: &PgRow) -> Proxy {
    Proxy {
        id: row.get("id"),
        name: row.get("name"),
        is_published: row.get("is_published"),
        is_deleted: row.get("is_deleted"),
        created_at: row.get("created_at"),
    }
}

fn endpoint_from_row(row: &PgRow) -> Endpoint {
    Endpoint {
        id: row.get("id"),
        proxy_id: row.get("proxy_id"),
        name: row.get("name"),
        method: row.get("method"),
        path: row.get("path"),
        path_params: row.get("path_params"),
        header_param: row.get("header_param"),
        is_deleted: row.get("is_deleted"),
        created_at: row.get("created_at"),
    }
}

fn schema_from_row(row: &PgRow) -> ExampleSchema {
    ExampleSchema {
        id: row.get("id"),
        endpoint_id: row.get("endpoint_id"),
        status_code: row.get("status_code"),
        req_json: row.get("req_json"),
        res_json: row.get("res_json"),
        path_params: row.get("path_params"),
        header_json: row.get("header_json"),
        enabled: row.get("enabled"),
        is_deleted: row.get("is_deleted"),
        created_at: row.get("created_at"),
    }
}

#[async_trait::async_trait]
impl ProxyStore for PostgresStore {
    async fn get_proxy(&self, id: Id) -> Result<Option<Proxy>> {
        let row = sqlx::query(
            "SELECT id, name, is_published, is_deleted, created_at FROM proxies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch proxy")?;

        Ok(row.as_ref().map(proxy_from_row))
    }

    async fn create_proxy(&self, proxy: NewProxy) -> Result<Proxy> {
        let row = sqlx::query(
            r#"
            INSERT INTO proxies (name, is_published)
            VALUES ($1, $2)
            RETURNING id, name, is_published, is_deleted, created_at
            "#,
        )
        .bind(&proxy.name)
        .bind(proxy.is_published)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create proxy")?;

        Ok(proxy_from_row(&row))
    }

    async fn set_proxy_published(&self, id: Id, published: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE proxies SET is_published = $2 WHERE id = $1")
            .bind(id)
            .bind(published)
            .execute(&self.pool)
            .await
            .context("Failed to update proxy publication")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl EndpointStore for PostgresStore {
    async fn get_endpoint(&self, id: Id) -> Result<Option<Endpoint>> {
        let row = sqlx::query(
            r#"
            SELECT id, proxy_id, name, method, path, path_params, header_param,
                   is_deleted, created_at
            FROM endpoints
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch endpoint")?;

        Ok(row.as_ref().map(endpoint_from_row))
    }

    async fn create_endpoint(&self, endpoint: NewEndpoint) -> Result<Endpoint> {
        let path_params = NewEndpoint::serialize_requirements(&endpoint.path_params)
            .context("Failed to serialize path requirements")?;
        let header_param = NewEndpoint::serialize_requirements(&endpoint.header_param)
            .context("Failed to serialize header requirements")?;

        let row = sqlx::query(
            r#"
            INSERT INTO endpoints (proxy_id, name, method, path, path_params, header_param)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, proxy_id, name, method, path, path_params, header_param,
                      is_deleted, created_at
            "#,
        )
        .bind(endpoint.proxy_id)
        .bind(&endpoint.name)
        .bind(&endpoint.method)
        .bind(&endpoint.path)
        .bind(path_params)
        .bind(header_param)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create endpoint")?;

        Ok(endpoint_from_row(&row))
    }

    async fn soft_delete_endpoint(&self, id: Id) -> Result<bool> {
        let result =
            sqlx::query("UPDATE endpoints SET is_deleted = TRUE WHERE id = $1 AND NOT is_deleted")
                .bind(id)
                .execute(&self.pool)
                .await
                .context("Failed to delete endpoint")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl ExampleStore for PostgresStore {
    async fn list_latest_schemas_by_status(&self, endpoint_id: Id) -> Result<Vec<ExampleSchema>> {
        let query = format!(
            r#"
            SELECT {SCHEMA_COLUMNS}
            FROM (
                SELECT DISTINCT ON (status_code) {SCHEMA_COLUMNS}
                FROM api_schemas
                WHERE endpoint_id = $1 AND enabled AND NOT is_deleted
                ORDER BY status_code, id DESC
            ) latest
            ORDER BY {SCHEMA_ORDER}
            "#
        );

        let rows = sqlx::query(&query)
            .bind(endpoint_id)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list latest example schemas")?;

        Ok(rows.iter().map(schema_from_row).collect())
    }

    async fn list_candidate_schemas(&self, endpoint_id: Id) -> Result<Vec<ExampleSchema>> {
        let query = format!(
            r#"
            SELECT {SCHEMA_COLUMNS}
            FROM api_schemas
            WHERE endpoint_id = $1 AND enabled AND NOT is_deleted
            ORDER BY {SCHEMA_ORDER}
            "#
        );

        let rows = sqlx::query(&query)
            .bind(endpoint_id)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list candidate example schemas")?;

        Ok(rows.iter().map(schema_from_row).collect())
    }

    async fn get_unauthorized_schema(&self, endpoint_id: Id) -> Result<Option<ExampleSchema>> {
        let query = format!(
            r#"
            SELECT {SCHEMA_COLUMNS}
            FROM api_schemas
            WHERE endpoint_id = $1 AND status_code = $2 AND enabled AND NOT is_deleted
            ORDER BY id DESC
            LIMIT 1
            "#
        );

        let row = sqlx::query(&query)
            .bind(endpoint_id)
            .bind(UNAUTHORIZED_STATUS)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch unauthorized example schema")?;

        Ok(row.as_ref().map(schema_from_row))
    }

    async fn create_schema(&self, schema: NewExampleSchema) -> Result<ExampleSchema> {
        let query = format!(
            r#"
            INSERT INTO api_schemas
                (endpoint_id, status_code, req_json, res_json, path_params, header_json)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SCHEMA_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(schema.endpoint_id)
            .bind(&schema.status_code)
            .bind(&schema.req_json)
            .bind(&schema.res_json)
            .bind(&schema.path_params)
            .bind(&schema.header_json)
            .fetch_one(&self.pool)
            .await
            .context("Failed to create example schema")?;

        Ok(schema_from_row(&row))
    }

    async fn set_schema_enabled(&self, id: Id, enabled: bool) -> Result<bool> {
        let result =
            sqlx::query("UPDATE api_schemas SET enabled = $2 WHERE id = $1 AND NOT is_deleted")
                .bind(id)
                .bind(enabled)
                .execute(&self.pool)
                .await
                .context("Failed to toggle example schema")?;

        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete_schema(&self, id: Id) -> Result<bool> {
        let result =
            sqlx::query("UPDATE api_schemas SET is_deleted = TRUE WHERE id = $1 AND NOT is_deleted")
                .bind(id)
                .execute(&self.pool)
                .await
                .context("Failed to delete example schema")?;

        Ok(result.rows_affected() > 0)
    }
}

impl Store for PostgresStore {}
