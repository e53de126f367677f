use crate::auth::generate_jwt;
use crate::response::{ApiError, ApiResponse, ApiResult};
use crate::routes::common::{JsonBody, validated};
use axum::{Json, extract::State, http::StatusCode};
use db::models::user;
use serde::{Deserialize, Serialize};
use services::users::UserService;
use tracing::{error, info};
use util::state::AppState;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: user::Model,
}

/// POST /auth/login
///
/// Authenticates a user by email and password and issues a JWT.
///
/// ### Request Body
/// ```json
/// { "email": "teacher@school.test", "password": "secret123" }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ token, expires_at, user }`
/// - `400 Bad Request` when a field is missing
/// - `401 Unauthorized` on bad credentials
/// - `503 Service Unavailable` for non-admins while maintenance mode is on
pub async fn login(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let req = validated(req)?;
    let user = UserService::authenticate(app_state.db(), &req.email, &req.password).await?;

    let (token, expires_at) = generate_jwt(user.id, user.role).map_err(|e| {
        error!(error = %e, user_id = user.id, "Failed to sign token");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Could not issue a token")
    })?;

    info!(user_id = user.id, role = %user.role, "User logged in");
    Ok(Json(ApiResponse::success(
        LoginResponse {
            token,
            expires_at,
            user,
        },
        "Login successful",
    )))
}
