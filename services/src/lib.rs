//! Application services.
//!
//! Each module owns one workflow and talks to the database through the helpers on
//! the `db` models. Services never know about HTTP; they take plain input structs
//! and return plain output structs or a [`ServiceError`].

pub mod assessment_records;
pub mod error;
pub mod marks;
pub mod pupils;
pub mod reference;
pub mod settings;
pub mod users;

pub use error::{ServiceError, ServiceResult};
