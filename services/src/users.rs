use crate::error::{ServiceError, ServiceResult};
use db::models::{
    school_settings,
    user::{self, UserRole},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStaff {
    #[validate(length(min = 3, max = 64, message = "username must be between 3 and 64 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

pub struct UserService;

impl UserService {
    /// Creates an account. The password must meet the configured minimum length.
    pub async fn create_staff(db: &DatabaseConnection, req: CreateStaff) -> ServiceResult<user::Model> {
        let settings = school_settings::Model::get_or_init(db).await?;
        let min_len = usize::try_from(settings.min_password_length).unwrap_or(0);
        if req.password.chars().count() < min_len {
            return Err(ServiceError::validation(format!(
                "Password must be at least {min_len} characters"
            )));
        }

        let user = user::Model::create(db, req.username.trim(), req.email.trim(), &req.password, req.role)
            .await
            .map_err(|e| ServiceError::conflict_on_unique(e, "Username or email already in use"))?;

        info!(user_id = user.id, role = %user.role, "Created user");
        Ok(user)
    }

    pub async fn list(db: &DatabaseConnection, role: Option<UserRole>) -> ServiceResult<Vec<user::Model>> {
        Ok(user::Model::list(db, role).await?)
    }

    pub async fn get(db: &DatabaseConnection, id: i64) -> ServiceResult<user::Model> {
        user::Model::get_by_id(db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))
    }

    /// Deletes a user. Administrators cannot delete their own account.
    pub async fn delete(db: &DatabaseConnection, acting_user_id: i64, id: i64) -> ServiceResult<()> {
        if acting_user_id == id {
            return Err(ServiceError::Forbidden("You cannot delete your own account".into()));
        }
        if user::Model::delete(db, id).await? == 0 {
            return Err(ServiceError::not_found("User not found"));
        }
        info!(user_id = id, deleted_by = acting_user_id, "Deleted user");
        Ok(())
    }

    /// Checks credentials and records the login.
    ///
    /// While maintenance mode is on, only administrators get through.
    pub async fn authenticate(
        db: &DatabaseConnection,
        email: &str,
        password: &str,
    ) -> ServiceResult<user::Model> {
        let Some(user) = user::Model::verify_credentials(db, email.trim(), password).await? else {
            warn!(email = %email.trim(), "Failed login attempt");
            return Err(ServiceError::Unauthorized("Invalid email or password".into()));
        };

        let settings = school_settings::Model::get_or_init(db).await?;
        if settings.maintenance_mode && user.role != UserRole::Admin {
            return Err(ServiceError::Unavailable(
                "The system is under maintenance. Please try again later.".into(),
            ));
        }

        Ok(user::Model::touch_last_login(db, user.id).await?)
    }
}
