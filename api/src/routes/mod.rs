//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → health check (public)
//! - `/auth` → login and the current user
//! - `/admin` → school structure, calendar, staff and settings (admins)
//! - `/secretary` → pupil registry (secretaries and admins)
//! - `/teacher` → marks entry, grading and ranking (teachers)

use crate::auth::guards::{allow_admin, allow_secretary, allow_teacher};
use crate::routes::{
    admin::admin_routes, auth::auth_routes, health::health_routes,
    secretary::secretary_routes, teacher::teacher_routes,
};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod admin;
pub mod auth;
pub mod common;
pub mod health;
pub mod secretary;
pub mod teacher;

/// Builds the complete application router.
///
/// Role guards run as `route_layer`s, so unknown paths inside a group still
/// answer `404` rather than `401`.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes().route_layer(from_fn(allow_admin)))
        .nest(
            "/secretary",
            secretary_routes().route_layer(from_fn(allow_secretary)),
        )
        .nest("/teacher", teacher_routes().route_layer(from_fn(allow_teacher)))
        .with_state(app_state)
}
