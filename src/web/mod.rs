//! HTTP 層 (axum)
//!
//! 各ハンドラは `CatalogService` を `State` として受け取る。

pub mod error;
pub mod handlers;
pub mod models;

use axum::{routing::get, Router};

use crate::services::CatalogService;

/// ルーティング設定
pub fn router(service: CatalogService) -> Router {
    Router::new()
        .route("/api/tools", get(handlers::list_tools).post(handlers::create_tool))
        .route(
            "/api/tools/name/:name",
            get(handlers::get_tool_by_name)
                .put(handlers::update_tool_by_name)
                .delete(handlers::delete_tool_by_name),
        )
        .route(
            "/api/tools/:id",
            get(handlers::get_tool_by_id)
                .put(handlers::update_tool_by_id)
                .delete(handlers::delete_tool_by_id),
        )
        .with_state(service)
}
