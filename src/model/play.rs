use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{deserialize_integer_like, Id, SuppliedParam};

/// A simulated inbound request against a documented endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRequest {
    #[serde(deserialize_with = "deserialize_integer_like")]
    pub endpoint_id: Id,
    #[serde(default)]
    pub path_param: Option<Vec<SuppliedParam>>,
    #[serde(default)]
    pub header_param: Option<Vec<SuppliedParam>>,
    #[serde(default)]
    pub json_body: Option<Value>,
}

impl PlayRequest {
    pub fn new(endpoint_id: Id) -> Self {
        Self {
            endpoint_id,
            path_param: None,
            header_param: None,
            json_body: None,
        }
    }

    pub fn with_path_param(mut self, name: &str, value: Value) -> Self {
        self.path_param
            .get_or_insert_with(Vec::new)
            .push(SuppliedParam::new(name, value));
        self
    }

    pub fn with_header_param(mut self, name: &str, value: Value) -> Self {
        self.header_param
            .get_or_insert_with(Vec::new)
            .push(SuppliedParam::new(name, value));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.json_body = Some(body);
        self
    }
}
