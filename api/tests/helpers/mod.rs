#![allow(dead_code)]

pub mod app;
pub mod school;

pub use app::{body_json, get, make_test_app, send_json, token_for};
pub use school::{School, create_user, seed_school};
