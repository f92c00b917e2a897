use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Id;

/// A published API product grouping documented endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proxy {
    pub id: Id,
    pub name: String,
    pub is_published: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl Proxy {
    /// Whether endpoints under this proxy may be browsed and played
    pub fn is_visible(&self) -> bool {
        self.is_published && !self.is_deleted
    }
}

/// Input model for creating a proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProxy {
    pub name: String,
    #[serde(default)]
    pub is_published: bool,
}
