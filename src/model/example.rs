use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Id;

/// Status code of the canonical unauthorized example
pub const UNAUTHORIZED_STATUS: &str = "401";

/// One recorded request/response pair used for sandbox playback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleSchema {
    pub id: Id,
    pub endpoint_id: Id,
    pub status_code: String,
    pub req_json: String,
    pub res_json: String,
    pub path_params: Option<String>,
    pub header_json: Option<String>,
    pub enabled: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl ExampleSchema {
    /// Enabled and not soft-deleted
    pub fn is_live(&self) -> bool {
        self.enabled && !self.is_deleted
    }

    pub fn to_envelope(&self) -> ResolvedResponse {
        ResolvedResponse {
            status: self.status_code.clone(),
            data: self.res_json.clone(),
        }
    }
}

/// Input model for recording a new example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExampleSchema {
    pub endpoint_id: Id,
    pub status_code: String,
    pub req_json: String,
    pub res_json: String,
    #[serde(default)]
    pub path_params: Option<String>,
    #[serde(default)]
    pub header_json: Option<String>,
}

impl NewExampleSchema {
    pub fn new(endpoint_id: Id, status_code: &str, req_json: &str, res_json: &str) -> Self {
        Self {
            endpoint_id,
            status_code: status_code.to_string(),
            req_json: req_json.to_string(),
            res_json: res_json.to_string(),
            path_params: None,
            header_json: None,
        }
    }
}

/// The `{status, data}` pair returned for a played request.
///
/// `data` is already-serialized JSON and is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedResponse {
    pub status: String,
    pub data: String,
}

impl ResolvedResponse {
    /// Fixed fallback returned when no recorded example applies
    pub fn default_unauthorized() -> Self {
        Self {
            status: UNAUTHORIZED_STATUS.to_string(),
            data: r#"{"message":"Invalid Access Token"}"#.to_string(),
        }
    }
}
