use crate::auth::claims::AuthUser;
use crate::response::{ApiResponse, Empty};
use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::models::user::UserRole;

type GuardRejection = (StatusCode, Json<ApiResponse<Empty>>);

/// Decodes the caller and stores them in the request extensions.
async fn extract_and_insert_authuser(
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), GuardRejection> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

/// Lets the request through only for the listed roles.
async fn allow_roles(
    req: Request<Body>,
    next: Next,
    roles: &[UserRole],
    failure_msg: &str,
) -> Result<Response, GuardRejection> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if !roles.contains(&user.role()) {
        tracing::debug!(user_id = user.id(), role = %user.role(), "Role check failed");
        return Err((StatusCode::FORBIDDEN, Json(ApiResponse::error(failure_msg))));
    }

    Ok(next.run(req).await)
}

/// Basic guard to ensure the request is authenticated.
pub async fn allow_authenticated(req: Request<Body>, next: Next) -> Result<Response, GuardRejection> {
    let (req, _user) = extract_and_insert_authuser(req).await?;
    Ok(next.run(req).await)
}

pub async fn allow_admin(req: Request<Body>, next: Next) -> Result<Response, GuardRejection> {
    allow_roles(req, next, &[UserRole::Admin], "Admin access required").await
}

/// Teachers only. Marks belong to the teacher who entered them, so admins are not
/// let through here.
pub async fn allow_teacher(req: Request<Body>, next: Next) -> Result<Response, GuardRejection> {
    allow_roles(req, next, &[UserRole::Teacher], "Teacher access required").await
}

/// Secretaries and admins.
pub async fn allow_secretary(req: Request<Body>, next: Next) -> Result<Response, GuardRejection> {
    allow_roles(
        req,
        next,
        &[UserRole::Secretary, UserRole::Admin],
        "Secretary access required",
    )
    .await
}
