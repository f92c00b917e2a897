use crate::model::{Endpoint, ExampleSchema, Id, NewEndpoint, NewExampleSchema, NewProxy, Proxy};
use anyhow::Result;

/// Publication state of proxies, owned by the portal's CRUD side
#[async_trait::async_trait]
pub trait ProxyStore: Send + Sync {
    async fn get_proxy(&self, id: Id) -> Result<Option<Proxy>>;
    async fn create_proxy(&self, proxy: NewProxy) -> Result<Proxy>;
    async fn set_proxy_published(&self, id: Id, published: bool) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait EndpointStore: Send + Sync {
    /// Get a non-deleted endpoint by id
    async fn get_endpoint(&self, id: Id) -> Result<Option<Endpoint>>;
    async fn create_endpoint(&self, endpoint: NewEndpoint) -> Result<Endpoint>;
    async fn soft_delete_endpoint(&self, id: Id) -> Result<bool>;
}

/// Read access to recorded examples, plus the admin writes that maintain them.
///
/// Every read only sees rows that are enabled and not soft-deleted. Ordering is
/// numeric status code ascending (non-numeric codes last), then id descending.
#[async_trait::async_trait]
pub trait ExampleStore: Send + Sync {
    /// One row per distinct status code, the one with the highest id
    async fn list_latest_schemas_by_status(&self, endpoint_id: Id) -> Result<Vec<ExampleSchema>>;
    /// Every live row, ordered for body matching
    async fn list_candidate_schemas(&self, endpoint_id: Id) -> Result<Vec<ExampleSchema>>;
    /// The latest live row with status code "401"
    async fn get_unauthorized_schema(&self, endpoint_id: Id) -> Result<Option<ExampleSchema>>;
    async fn create_schema(&self, schema: NewExampleSchema) -> Result<ExampleSchema>;
    async fn set_schema_enabled(&self, id: Id, enabled: bool) -> Result<bool>;
    async fn soft_delete_schema(&self, id: Id) -> Result<bool>;
}

pub trait Store: ProxyStore + EndpointStore + ExampleStore + Send + Sync {}
