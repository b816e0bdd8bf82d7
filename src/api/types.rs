//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::rag::RagResponse;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Question submitted by the user
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Summary plus the retrieval material it was grounded on
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub context: String,
    pub query: serde_json::Value,
}

impl From<RagResponse> for AskResponse {
    fn from(response: RagResponse) -> Self {
        Self {
            answer: response.answer,
            context: response.context,
            query: response.request,
        }
    }
}
