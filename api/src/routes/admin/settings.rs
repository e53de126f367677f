use crate::auth::AuthUser;
use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::{JsonBody, validated};
use axum::{Extension, Json, Router, extract::State, routing::get};
use db::models::school_settings;
use services::settings::{SettingsService, UpdateSettings};
use util::state::AppState;

pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/", get(get_settings).put(update_settings))
}

/// GET /settings
pub async fn get_settings(
    State(app_state): State<AppState>,
) -> ApiResult<Json<ApiResponse<school_settings::Model>>> {
    let settings = SettingsService::get(app_state.db()).await?;
    Ok(Json(ApiResponse::success(settings, "Settings retrieved successfully")))
}

/// PUT /settings
///
/// Replaces the school settings.
///
/// ```json
/// {
///   "school_name": "Hillside Primary",
///   "current_academic_year_id": 1,
///   "current_term_id": 2,
///   "maintenance_mode": false,
///   "min_password_length": 8
/// }
/// ```
///
/// The current term must belong to the current academic year (`400` otherwise).
pub async fn update_settings(
    State(app_state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    JsonBody(req): JsonBody<UpdateSettings>,
) -> ApiResult<Json<ApiResponse<school_settings::Model>>> {
    let req = validated(req)?;
    let settings = SettingsService::update(app_state.db(), admin.id(), req).await?;
    Ok(Json(ApiResponse::success(settings, "Settings updated successfully")))
}
