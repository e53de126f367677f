//! Classes, streams and subjects share one shape: a unique name. Their handlers
//! are built once and parameterised by [`NamedKind`].

use crate::response::{ApiResponse, ApiResult, Empty};
use crate::routes::common::{JsonBody, validated};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use db::models::class_stream;
use serde::Deserialize;
use services::reference::{ClassStreamRequest, NameRequest, NamedItem, NamedKind, ReferenceService};
use util::state::AppState;

/// `GET /` and `POST /` on the collection, `PUT /{id}` and `DELETE /{id}` on an
/// item. Duplicate names answer `409 Conflict`.
pub fn named_routes(kind: NamedKind) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(move |state: State<AppState>| list(state, kind))
                .post(move |state: State<AppState>, body: JsonBody<NameRequest>| create(state, kind, body)),
        )
        .route(
            "/{id}",
            put(move |state: State<AppState>, id: Path<i64>, body: JsonBody<NameRequest>| {
                rename(state, kind, id, body)
            })
            .delete(move |state: State<AppState>, id: Path<i64>| remove(state, kind, id)),
        )
}

async fn list(State(app_state): State<AppState>, kind: NamedKind) -> ApiResult<Json<ApiResponse<Vec<NamedItem>>>> {
    let items = ReferenceService::list_named(app_state.db(), kind).await?;
    Ok(Json(ApiResponse::success(items, format!("{kind} list retrieved successfully"))))
}

async fn create(
    State(app_state): State<AppState>,
    kind: NamedKind,
    JsonBody(req): JsonBody<NameRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<NamedItem>>)> {
    let req = validated(req)?;
    let item = ReferenceService::create_named(app_state.db(), kind, &req.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(item, format!("{kind} created successfully"))),
    ))
}

async fn rename(
    State(app_state): State<AppState>,
    kind: NamedKind,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<NameRequest>,
) -> ApiResult<Json<ApiResponse<NamedItem>>> {
    let req = validated(req)?;
    let item = ReferenceService::rename_named(app_state.db(), kind, id, &req.name).await?;
    Ok(Json(ApiResponse::success(item, format!("{kind} updated successfully"))))
}

async fn remove(
    State(app_state): State<AppState>,
    kind: NamedKind,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    ReferenceService::delete_named(app_state.db(), kind, id).await?;
    Ok(Json(ApiResponse::success(Empty {}, format!("{kind} deleted successfully"))))
}

/// - `GET /{id}/streams` → streams paired with the class
/// - `POST /{id}/streams` `{ "stream_id": 2 }` → pair
/// - `DELETE /{id}/streams/{stream_id}` → unpair
///
/// The class segment is named `id` to match [`named_routes`], which is merged
/// under the same prefix.
pub fn class_stream_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/streams", get(list_class_streams).post(pair_stream))
        .route("/{id}/streams/{stream_id}", delete(unpair_stream))
}

#[derive(Debug, Deserialize)]
pub struct PairStreamRequest {
    pub stream_id: i64,
}

async fn list_class_streams(
    State(app_state): State<AppState>,
    Path(class_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Vec<NamedItem>>>> {
    let streams = ReferenceService::streams_for_class(app_state.db(), class_id).await?;
    Ok(Json(ApiResponse::success(streams, "Class streams retrieved successfully")))
}

async fn pair_stream(
    State(app_state): State<AppState>,
    Path(class_id): Path<i64>,
    JsonBody(req): JsonBody<PairStreamRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<class_stream::Model>>)> {
    let pairing = ReferenceService::pair_class_stream(
        app_state.db(),
        ClassStreamRequest {
            class_id,
            stream_id: req.stream_id,
        },
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(pairing, "Stream added to class")),
    ))
}

async fn unpair_stream(
    State(app_state): State<AppState>,
    Path((class_id, stream_id)): Path<(i64, i64)>,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    ReferenceService::unpair_class_stream(app_state.db(), ClassStreamRequest { class_id, stream_id }).await?;
    Ok(Json(ApiResponse::success(Empty {}, "Stream removed from class")))
}
