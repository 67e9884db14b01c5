use std::time::Duration;

pub type Result<T, E = Error> = std::result::Result<T, E>;
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Backend(#[source] BoxError),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Edit conflict on record {id}, version {version} is stale")]
    EditConflict { id: i64, version: i32 },

    #[error("Database not reachable within {0:?}")]
    ConnectTimeout(Duration),

    #[error("Migration error: {0}")]
    Migration(#[source] BoxError),
}

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        Error::Backend(Box::new(value))
    }
}

impl From<sqlx::migrate::MigrateError> for Error {
    fn from(value: sqlx::migrate::MigrateError) -> Self {
        Error::Migration(Box::new(value))
    }
}
