use crate::seed::Seeder;
use crate::seeds::SUBJECTS;
use db::models::user::{Model, UserRole};
use sea_orm::{DatabaseConnection, DbErr};

pub struct UserSeeder;

async fn ensure(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    role: UserRole,
) -> Result<(), DbErr> {
    if Model::find_by_email(db, email).await?.is_none() {
        Model::create(db, username, email, "password123", role).await?;
    }
    Ok(())
}

#[async_trait::async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        ensure(db, "admin", "admin@school.test", UserRole::Admin).await?;
        ensure(db, "secretary", "secretary@school.test", UserRole::Secretary).await?;
        ensure(db, "headteacher", "headteacher@school.test", UserRole::Headteacher).await?;

        // One teacher per subject: teacher1 teaches the first subject, and so on.
        for n in 1..=SUBJECTS.len() {
            let username = format!("teacher{n}");
            ensure(db, &username, &format!("{username}@school.test"), UserRole::Teacher).await?;
        }
        Ok(())
    }
}
