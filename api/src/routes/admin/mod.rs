//! # admin Routes Module
//!
//! Reference data, staff accounts and school settings. Everything here sits behind
//! `allow_admin`.
//!
//! - `/admin/classes`, `/admin/streams`, `/admin/subjects` → [`reference`]
//! - `/admin/classes/{id}/streams` → [`reference`] (pairings)
//! - `/admin/teacher-assignments` → [`assignments`]
//! - `/admin/academic-years`, `/admin/terms`, `/admin/exam-schedules` → [`calendar`]
//! - `/admin/users` → [`users`]
//! - `/admin/settings` → [`settings`]

pub mod assignments;
pub mod calendar;
pub mod reference;
pub mod settings;
pub mod users;

use axum::Router;
use services::reference::NamedKind;
use util::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/classes",
            reference::named_routes(NamedKind::Class).merge(reference::class_stream_routes()),
        )
        .nest("/streams", reference::named_routes(NamedKind::Stream))
        .nest("/subjects", reference::named_routes(NamedKind::Subject))
        .nest("/teacher-assignments", assignments::assignment_routes())
        .merge(calendar::calendar_routes())
        .nest("/users", users::user_routes())
        .nest("/settings", settings::settings_routes())
}
