use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::StatusCode,
};

use crate::error::CatalogResult;
use crate::models::{Tool, ToolInput};
use crate::services::CatalogService;
use crate::web::error::ApiError;
use crate::web::models::DataResponse;

type ApiResult<T> = Result<T, ApiError>;

/// SQLite 呼び出しはブロッキングなので専用スレッドで実行する
async fn run_blocking<T, F>(service: CatalogService, f: F) -> ApiResult<T>
where
    F: FnOnce(&CatalogService) -> CatalogResult<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| ApiError::internal(format!("worker task failed: {e}")))?;
    Ok(result?)
}

/// GET /api/tools - 全ツールを取得
#[axum::debug_handler]
pub async fn list_tools(
    State(service): State<CatalogService>,
) -> ApiResult<Json<DataResponse<Vec<Tool>>>> {
    let tools = run_blocking(service, |s| s.list()).await?;
    Ok(Json(DataResponse::new(tools)))
}

/// POST /api/tools - ツールを作成
#[axum::debug_handler]
pub async fn create_tool(
    State(service): State<CatalogService>,
    payload: Result<Json<ToolInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataResponse<Tool>>)> {
    let Json(input) = payload?;
    tracing::info!(
        target: "web::tools",
        name = %input.name,
        acronym = %input.acronym,
        "create request"
    );
    let tool = run_blocking(service, move |s| s.create(input)).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(tool, "tool created")),
    ))
}

/// GET /api/tools/:id
#[axum::debug_handler]
pub async fn get_tool_by_id(
    State(service): State<CatalogService>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<Tool>>> {
    let tool = run_blocking(service, move |s| s.get_by_id(&id)).await?;
    Ok(Json(DataResponse::new(tool)))
}

/// PUT /api/tools/:id
#[axum::debug_handler]
pub async fn update_tool_by_id(
    State(service): State<CatalogService>,
    Path(id): Path<String>,
    payload: Result<Json<ToolInput>, JsonRejection>,
) -> ApiResult<Json<DataResponse<Tool>>> {
    let Json(input) = payload?;
    let tool = run_blocking(service, move |s| s.update_by_id(&id, input)).await?;
    Ok(Json(DataResponse::with_message(tool, "tool updated")))
}

/// DELETE /api/tools/:id
#[axum::debug_handler]
pub async fn delete_tool_by_id(
    State(service): State<CatalogService>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    run_blocking(service, move |s| s.delete_by_id(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/tools/name/:name
#[axum::debug_handler]
pub async fn get_tool_by_name(
    State(service): State<CatalogService>,
    Path(name): Path<String>,
) -> ApiResult<Json<DataResponse<Tool>>> {
    let tool = run_blocking(service, move |s| s.get_by_name(&name)).await?;
    Ok(Json(DataResponse::new(tool)))
}

/// PUT /api/tools/name/:name
#[axum::debug_handler]
pub async fn update_tool_by_name(
    State(service): State<CatalogService>,
    Path(name): Path<String>,
    payload: Result<Json<ToolInput>, JsonRejection>,
) -> ApiResult<Json<DataResponse<Tool>>> {
    let Json(input) = payload?;
    let tool = run_blocking(service, move |s| s.update_by_name(&name, input)).await?;
    Ok(Json(DataResponse::with_message(tool, "tool updated")))
}

/// DELETE /api/tools/name/:name
#[axum::debug_handler]
pub async fn delete_tool_by_name(
    State(service): State<CatalogService>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    run_blocking(service, move |s| s.delete_by_name(&name)).await?;
    Ok(StatusCode::NO_CONTENT)
}
