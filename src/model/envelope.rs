use serde::{Deserialize, Serialize};

/// Generic response wrapper shared by every portal endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: u16,
    pub message: String,
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            code: 200,
            message: "OK".to_string(),
            result: Some(result),
        }
    }

    pub fn failure(code: u16, message: &str) -> Self {
        Self {
            success: false,
            code,
            message: message.to_string(),
            result: None,
        }
    }
}
