#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database configuration missing")]
    ConfigMissing,
    #[error("database query failed: {0}")]
    QueryFailed(sqlx::Error),
    #[error("row not found")]
    NotFound,
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => DbError::NotFound,
            other => DbError::QueryFailed(other),
        }
    }
}
