use crate::response::{ApiError, ApiResponse, ApiResult};
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use util::state::AppState;

/// Builds the `/health` route group: a single public `GET /health`.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// GET /health
///
/// Pings the database before answering.
///
/// ```json
/// { "success": true, "data": "OK", "message": "Health check passed" }
/// ```
///
/// `503 Service Unavailable` when the database does not respond.
async fn health_check(State(app_state): State<AppState>) -> ApiResult<Json<ApiResponse<&'static str>>> {
    if let Err(err) = app_state.db().ping().await {
        tracing::error!(error = %err, "Health check could not reach the database");
        return Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Database unavailable",
        ));
    }
    Ok(Json(ApiResponse::success("OK", "Health check passed")))
}
