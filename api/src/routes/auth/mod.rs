//! # auth Routes Module
//!
//! - `POST /auth/login` → [`post::login`] (public)
//! - `GET /auth/me` → [`get::get_me`] (authenticated)

pub mod get;
pub mod post;

use crate::auth::guards::allow_authenticated;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use get::get_me;
use post::login;
use util::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(get_me).route_layer(from_fn(allow_authenticated)))
}
