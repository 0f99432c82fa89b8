use serde::{Deserialize, Serialize};

use super::ProductTree;

/// Request body for the chat endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub context: Option<ChatContext>,
}

/// Optional per-request context. When a snapshot is attached it takes
/// precedence over the shared store for that request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatContext {
    #[serde(rename = "productTree", default)]
    pub product_tree: Option<ProductTree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub success: bool,
    pub message: String,
}

/// Input for the stateless node-creation stub.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNodeInput {
    pub node_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub effort: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Input for the stateless node-update stub. `updates` is an open map of
/// field names to new values, echoed back to the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNodeInput {
    #[serde(default)]
    pub updates: serde_json::Value,
}
