use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Represents a staff or parent account in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// System-wide role of a user. Backed by the `user_role` enum column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Display, EnumString,
    Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "teacher")]
    Teacher,
    #[sea_orm(string_value = "secretary")]
    Secretary,
    #[sea_orm(string_value = "parent")]
    Parent,
    #[sea_orm(string_value = "headteacher")]
    Headteacher,
    #[sea_orm(string_value = "bursar")]
    Bursar,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::teacher_assignment::Entity")]
    TeacherAssignments,
}

impl Related<super::teacher_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Hashes a plaintext password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, DbErr> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbErr::Custom(format!("Password hashing failed: {e}")))
}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        username: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let user = ActiveModel {
            username: Set(username.to_owned()),
            email: Set(email.to_lowercase()),
            password_hash: Set(hash_password(password)?),
            role: Set(role),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        user.insert(db).await
    }

    pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_email<C: ConnectionTrait>(
        db: &C,
        email: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(email.to_lowercase()))
            .one(db)
            .await
    }

    pub async fn list<C: ConnectionTrait>(
        db: &C,
        role: Option<UserRole>,
    ) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find().order_by_asc(Column::Username);
        if let Some(role) = role {
            query = query.filter(Column::Role.eq(role));
        }
        query.all(db).await
    }

    /// Looks a user up by email and checks the password. `None` on either mismatch.
    pub async fn verify_credentials<C: ConnectionTrait>(
        db: &C,
        email: &str,
        password: &str,
    ) -> Result<Option<Model>, DbErr> {
        Ok(Self::find_by_email(db, email)
            .await?
            .filter(|user| user.verify_password(password)))
    }

    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    pub async fn touch_last_login<C: ConnectionTrait>(db: &C, id: i64) -> Result<Model, DbErr> {
        let now = Utc::now();
        ActiveModel {
            id: Set(id),
            last_login: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(db)
        .await
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
        Ok(Entity::delete_by_id(id).exec(db).await?.rows_affected)
    }
}
