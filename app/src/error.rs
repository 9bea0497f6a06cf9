use std::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DBError {
    #[error(transparent)]
    SQLError(#[from] sqlx::Error),
    #[error(transparent)]
    MigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("Did not find machine: {0}")]
    MachineNotFound(i32),
}

#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("Scorer request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Scorer replied with status: {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Arguments are not used as specified")]
    ArgumentError(),
}

#[derive(Debug, Error)]
pub enum ObserverError {
    #[error(transparent)]
    User(Box<dyn error::Error>),
    #[error(transparent)]
    Internal(Box<dyn error::Error>),
}
unsafe impl Send for ObserverError {}

impl From<DBError> for ObserverError {
    fn from(err: DBError) -> Self {
        match err {
            DBError::MachineNotFound(_) => ObserverError::User(Box::from(err)),
            DBError::SQLError(_) | DBError::MigrateError(_) => {
                ObserverError::Internal(Box::from(err))
            }
        }
    }
}

impl From<ApiError> for ObserverError {
    fn from(err: ApiError) -> Self {
        ObserverError::User(Box::from(err))
    }
}
