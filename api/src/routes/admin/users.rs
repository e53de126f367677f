use crate::auth::AuthUser;
use crate::response::{ApiResponse, ApiResult, Empty};
use crate::routes::common::{JsonBody, QueryParams, validated};
use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use db::models::user::{self, UserRole};
use serde::Deserialize;
use services::users::{CreateStaff, UserService};
use util::state::AppState;

/// - `GET /users?role=` → [`list_users`]
/// - `POST /users` → [`create_user`]
/// - `GET /users/{user_id}` → [`get_user`]
/// - `DELETE /users/{user_id}` → [`delete_user`]
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{user_id}", get(get_user).delete(delete_user))
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<UserRole>,
}

pub async fn list_users(
    State(app_state): State<AppState>,
    QueryParams(query): QueryParams<ListUsersQuery>,
) -> ApiResult<Json<ApiResponse<Vec<user::Model>>>> {
    let users = UserService::list(app_state.db(), query.role).await?;
    Ok(Json(ApiResponse::success(users, "Users retrieved successfully")))
}

/// POST /users
///
/// ```json
/// { "username": "jdoe", "email": "jdoe@school.test", "password": "secret123", "role": "teacher" }
/// ```
///
/// - `201 Created`
/// - `400 Bad Request` for an invalid email or a password shorter than the
///   configured minimum
/// - `409 Conflict` when the username or email is taken
pub async fn create_user(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<CreateStaff>,
) -> ApiResult<(StatusCode, Json<ApiResponse<user::Model>>)> {
    let req = validated(req)?;
    let user = UserService::create_staff(app_state.db(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(user, "User created successfully")),
    ))
}

pub async fn get_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<user::Model>>> {
    let user = UserService::get(app_state.db(), user_id).await?;
    Ok(Json(ApiResponse::success(user, "User retrieved successfully")))
}

/// DELETE /users/{user_id}. Admins cannot delete themselves (`403`).
pub async fn delete_user(
    State(app_state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    UserService::delete(app_state.db(), admin.id(), user_id).await?;
    Ok(Json(ApiResponse::success(Empty {}, "User deleted successfully")))
}
