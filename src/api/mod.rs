mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::ai::LocalModelClient;
use crate::store::TreeStore;

/// Shared state for all handlers: the tree slot and the model client.
#[derive(Clone)]
pub struct AppState {
    pub store: TreeStore,
    pub model: LocalModelClient,
}

impl AppState {
    pub fn new(store: TreeStore, model: LocalModelClient) -> Self {
        Self { store, model }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Chat / model backends
        .route("/ai/chat", post(handlers::chat))
        .route("/ai/models", get(handlers::list_models))
        .route("/ai/test", get(handlers::test_model))
        // Product tree
        .route("/product-tree/import", post(handlers::import_tree))
        .route("/product-tree/debug", get(handlers::debug_tree))
        .route("/product-tree/xml", get(handlers::export_xml))
        // Node CRUD stubs
        .route("/product-tree/nodes", post(handlers::create_node))
        .route("/product-tree/nodes/{id}", get(handlers::get_node))
        .route("/product-tree/nodes/{id}", put(handlers::update_node))
        .route("/product-tree/nodes/{id}", delete(handlers::delete_node))
        // Health
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
