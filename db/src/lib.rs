pub mod models;
pub mod test_utils;

use sea_orm::{Database, DatabaseConnection, DbErr};
use std::path::Path;
use util::config;

/// Opens the application database named by `DATABASE_PATH`.
///
/// A plain path is treated as a SQLite file and created when missing; a value that
/// already looks like a connection URL is used as is.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let url = sqlite_url(&config::database_path())?;

    tracing::debug!(%url, "Connecting to database");
    Database::connect(&url).await
}

/// Builds the connection URL for `path_or_url`, creating the parent directory of a
/// plain file path.
fn sqlite_url(path_or_url: &str) -> Result<String, DbErr> {
    if path_or_url.starts_with("sqlite:") {
        return Ok(path_or_url.to_owned());
    }

    if let Some(parent) = Path::new(path_or_url).parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            tracing::warn!(path = %parent.display(), error = %err, "Could not create database directory");
            DbErr::Custom(format!(
                "Could not create database directory {}: {err}",
                parent.display()
            ))
        })?;
    }
    Ok(format!("sqlite://{path_or_url}?mode=rwc"))
}

#[cfg(test)]
mod tests {
    use super::sqlite_url;
    use sea_orm::DbErr;

    #[test]
    fn connection_urls_pass_through() {
        assert_eq!(
            sqlite_url("sqlite::memory:").unwrap(),
            "sqlite::memory:"
        );
    }

    #[test]
    fn plain_path_gets_its_directory_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("school.db");
        let path = path.to_str().unwrap();

        assert_eq!(sqlite_url(path).unwrap(), format!("sqlite://{path}?mode=rwc"));
        assert!(dir.path().join("data").is_dir());
    }

    #[test]
    fn directory_that_cannot_be_created_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let path = blocker.join("school.db");

        let err = sqlite_url(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, DbErr::Custom(msg) if msg.contains("Could not create database directory")));
    }
}
