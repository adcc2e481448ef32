use thiserror::Error;
use redis::RedisError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("User with login '{0}' already exists")]
    DuplicateLogin(String),

    #[error("User {0} does not exist")]
    UnknownUser(i64),

    #[error("Stored record is corrupt: {0}")]
    Corrupt(String),

    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Corrupt(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
