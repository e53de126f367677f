//! # secretary Routes Module
//!
//! Pupil roster management, open to secretaries and admins.
//!
//! - `GET /secretary/pupils` → [`get::list_pupils`]
//! - `POST /secretary/pupils` → [`post::register_pupil`]
//! - `GET /secretary/pupils/{pupil_id}` → [`get::get_pupil`]
//! - `PUT /secretary/pupils/{pupil_id}` → [`put::update_pupil`]
//! - `DELETE /secretary/pupils/{pupil_id}` → [`delete::delete_pupil`]

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use axum::{Router, routing::get};
use util::state::AppState;

pub fn secretary_routes() -> Router<AppState> {
    Router::new()
        .route("/pupils", get(get::list_pupils).post(post::register_pupil))
        .route(
            "/pupils/{pupil_id}",
            get(get::get_pupil)
                .put(put::update_pupil)
                .delete(delete::delete_pupil),
        )
}
