use anyhow::Result;
use chrono::Utc;
use itertools::Itertools;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::model::{
    status_order_key, Endpoint, ExampleSchema, Id, NewEndpoint, NewExampleSchema, NewProxy, Proxy,
    UNAUTHORIZED_STATUS,
};
use crate::store::traits::{EndpointStore, ExampleStore, ProxyStore, Store};

#[derive(Debug, Default)]
struct MemoryState {
    proxies: BTreeMap<Id, Proxy>,
    endpoints: BTreeMap<Id, Endpoint>,
    schemas: BTreeMap<Id, ExampleSchema>,
    last_id: Id,
}

impl MemoryState {
    fn next_id(&mut self) -> Id {
        self.last_id += 1;
        self.last_id
    }

    fn live_schemas(&self, endpoint_id: Id) -> impl Iterator<Item = &ExampleSchema> {
        self.schemas
            .values()
            .filter(move |schema| schema.endpoint_id == endpoint_id && schema.is_live())
            .sorted_by_key(|schema| status_order_key(&schema.status_code, schema.id))
    }
}

/// In-process store used for local runs without PostgreSQL and for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProxyStore for MemoryStore {
    async fn get_proxy(&self, id: Id) -> Result<Option<Proxy>> {
        Ok(self.state.read().proxies.get(&id).cloned())
    }

    async fn create_proxy(&self, proxy: NewProxy) -> Result<Proxy> {
        let mut state = self.state.write();
        let proxy = Proxy {
            id: state.next_id(),
            name: proxy.name,
            is_published: proxy.is_published,
            is_deleted: false,
            created_at: Utc::now(),
        };
        state.proxies.insert(proxy.id, proxy.clone());
        Ok(proxy)
    }

    async fn set_proxy_published(&self, id: Id, published: bool) -> Result<bool> {
        let mut state = self.state.write();
        match state.proxies.get_mut(&id) {
            Some(proxy) => {
                proxy.is_published = published;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait::async_trait]
impl EndpointStore for MemoryStore {
    async fn get_endpoint(&self, id: Id) -> Result<Option<Endpoint>> {
        let state = self.state.read();
        let found = state
            .endpoints
            .get(&id)
            .filter(|endpoint| !endpoint.is_deleted)
            .cloned();
        Ok(found)
    }

    async fn create_endpoint(&self, endpoint: NewEndpoint) -> Result<Endpoint> {
        let path_params = NewEndpoint::serialize_requirements(&endpoint.path_params)?;
        let header_param = NewEndpoint::serialize_requirements(&endpoint.header_param)?;

        let mut state = self.state.write();
        let endpoint = Endpoint {
            id: state.next_id(),
            proxy_id: endpoint.proxy_id,
            name: endpoint.name,
            method: endpoint.method,
            path: endpoint.path,
            path_params,
            header_param,
            is_deleted: false,
            created_at: Utc::now(),
        };
        state.endpoints.insert(endpoint.id, endpoint.clone());
        Ok(endpoint)
    }

    async fn soft_delete_endpoint(&self, id: Id) -> Result<bool> {
        let mut state = self.state.write();
        match state.endpoints.get_mut(&id) {
            Some(endpoint) if !endpoint.is_deleted => {
                endpoint.is_deleted = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait::async_trait]
impl ExampleStore for MemoryStore {
    async fn list_latest_schemas_by_status(&self, endpoint_id: Id) -> Result<Vec<ExampleSchema>> {
        let state = self.state.read();
        // Ordering puts the highest id first within each status group
        Ok(state
            .live_schemas(endpoint_id)
            .unique_by(|schema| schema.status_code.clone())
            .cloned()
            .collect())
    }

    async fn list_candidate_schemas(&self, endpoint_id: Id) -> Result<Vec<ExampleSchema>> {
        let state = self.state.read();
        Ok(state.live_schemas(endpoint_id).cloned().collect())
    }

    async fn get_unauthorized_schema(&self, endpoint_id: Id) -> Result<Option<ExampleSchema>> {
        let state = self.state.read();
        let found = state
            .live_schemas(endpoint_id)
            .find(|schema| schema.status_code == UNAUTHORIZED_STATUS)
            .cloned();
        Ok(found)
    }

    async fn create_schema(&self, schema: NewExampleSchema) -> Result<ExampleSchema> {
        let mut state = self.state.write();
        let schema = ExampleSchema {
            id: state.next_id(),
            endpoint_id: schema.endpoint_id,
            status_code: schema.status_code,
            req_json: schema.req_json,
            res_json: schema.res_json,
            path_params: schema.path_params,
            header_json: schema.header_json,
            enabled: true,
            is_deleted: false,
            created_at: Utc::now(),
        };
        state.schemas.insert(schema.id, schema.clone());
        Ok(schema)
    }

    async fn set_schema_enabled(&self, id: Id, enabled: bool) -> Result<bool> {
        let mut state = self.state.write();
        match state.schemas.get_mut(&id) {
            Some(schema) if !schema.is_deleted => {
                schema.enabled = enabled;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn soft_delete_schema(&self, id: Id) -> Result<bool> {
        let mut state = self.state.write();
        match state.schemas.get_mut(&id) {
            Some(schema) if !schema.is_deleted => {
                schema.is_deleted = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl Store for MemoryStore {}
