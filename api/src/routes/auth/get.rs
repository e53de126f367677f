use crate::auth::AuthUser;
use crate::response::{ApiResponse, ApiResult};
use axum::{Extension, Json, extract::State};
use db::models::user;
use services::users::UserService;
use util::state::AppState;

/// GET /auth/me
///
/// Returns the account behind the bearer token.
pub async fn get_me(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<ApiResponse<user::Model>>> {
    let me = UserService::get(app_state.db(), user.id()).await?;
    Ok(Json(ApiResponse::success(me, "User data retrieved successfully")))
}
