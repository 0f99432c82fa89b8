use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;

use crate::api::AppState;
use crate::models::*;
use crate::{analysis, diagnostics, xml};

/// Error body shared by the tree endpoints when nothing is loaded.
fn no_tree_loaded() -> Json<serde_json::Value> {
    Json(json!({ "error": "No product tree loaded" }))
}

fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: timestamp(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================
// Chat
// ============================================================

/// Chat endpoint: local model first, rule-based analyzer as fallback.
///
/// The tree snapshot comes from the request context when attached,
/// otherwise from the shared store. Either source may be absent; the
/// analyzer copes with that by itself.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let preview: String = request.message.chars().take(100).collect();
    tracing::info!("Received chat request: {}...", preview);

    let tree = request
        .context
        .and_then(|c| c.product_tree)
        .or_else(|| state.store.current());

    if state.model.enabled() {
        match state.model.generate(&request.message, tree.as_ref()).await {
            Ok(response) => {
                tracing::info!("Using local model response");
                return Json(ChatResponse {
                    response,
                    timestamp: timestamp(),
                });
            }
            Err(e) => {
                tracing::warn!("Local model unavailable, falling back: {}", e);
            }
        }
    }

    tracing::info!("Using internal analysis engine");
    Json(ChatResponse {
        response: analysis::analyze(&request.message, tree.as_ref()),
        timestamp: timestamp(),
    })
}

/// List the chat backends this instance can serve responses from.
pub async fn list_models(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut models = Vec::new();
    if state.model.enabled() {
        models.push(json!({
            "id": "local",
            "name": format!("Local AI Model ({})", state.model.model()),
            "version": env!("CARGO_PKG_VERSION"),
            "description": format!("Local AI model running at {}", state.model.endpoint()),
            "endpoint": state.model.endpoint(),
            "model_name": state.model.model(),
        }));
    }
    models.push(json!({
        "id": "internal",
        "name": "Internal Analysis Engine",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Rule-based analysis engine for product tree management",
    }));
    Json(json!({ "models": models }))
}

pub async fn test_model(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.model.probe().await)
}

// ============================================================
// Product tree
// ============================================================

/// Replace the stored snapshot wholesale. No merge.
pub async fn import_tree(
    State(state): State<AppState>,
    Json(tree): Json<ProductTree>,
) -> Json<ImportResponse> {
    let count = tree.nodes.len();
    state.store.replace(tree);
    tracing::info!("Imported product tree with {} nodes", count);
    Json(ImportResponse {
        success: true,
        message: format!("Imported {} nodes", count),
    })
}

pub async fn debug_tree(State(state): State<AppState>) -> Response {
    match state.store.current() {
        Some(tree) => Json(diagnostics::diagnose(&tree)).into_response(),
        None => no_tree_loaded().into_response(),
    }
}

pub async fn export_xml(State(state): State<AppState>) -> Response {
    match state.store.current() {
        Some(tree) => (
            [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
            xml::render_xml(&tree),
        )
            .into_response(),
        None => no_tree_loaded().into_response(),
    }
}

// ============================================================
// Node CRUD stubs
// ============================================================
//
// These endpoints perform no state mutation: they echo back constructed
// objects so clients can exercise their flows without a database. The
// stored snapshot is only ever replaced by an import.

pub async fn create_node(Json(input): Json<CreateNodeInput>) -> Json<serde_json::Value> {
    let node = json!({
        "id": input.node_id,
        "title": input.title,
        "type": input.node_type,
        "description": input.description,
        "status": input.status.unwrap_or_else(|| "Not Started".to_string()),
        "priority": input.priority.unwrap_or_else(|| "Medium".to_string()),
        "team": input.team,
        "owner": input.owner,
        "effort": input.effort,
        "parent_id": input.parent_id,
        "created_at": timestamp(),
    });
    Json(json!({ "success": true, "node": node }))
}

pub async fn update_node(
    Path(node_id): Path<String>,
    Json(input): Json<UpdateNodeInput>,
) -> Json<serde_json::Value> {
    let mut node = serde_json::Map::new();
    node.insert("id".to_string(), json!(node_id));
    node.insert("updated_at".to_string(), json!(timestamp()));
    // Caller-supplied updates win, id included.
    if let serde_json::Value::Object(updates) = input.updates {
        node.extend(updates);
    }
    Json(json!({ "success": true, "node": node }))
}

pub async fn delete_node(Path(node_id): Path<String>) -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "message": format!("Node {} deleted", node_id),
    }))
}

pub async fn get_node(Path(node_id): Path<String>) -> Json<serde_json::Value> {
    let node = json!({
        "id": node_id,
        "title": "Sample Node",
        "type": "Work Item",
        "description": "This is a sample node",
        "status": "In Progress",
        "priority": "High",
        "team": "Development Team",
        "owner": "John Doe",
        "effort": "5 days",
        "parent_id": null,
        "created_at": timestamp(),
    });
    Json(json!({ "success": true, "node": node }))
}
