// Copyright 2023 Remi Bernotavicius

use diesel::result::DatabaseErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("{entity} not found with id: {id}")]
    NotFound { entity: &'static str, id: i32 },

    #[error("storage error: {0}")]
    Storage(diesel::result::Error),

    #[error("couldn't connect to database: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("migration error: {0}")]
    Migration(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Constraint violations SQLite reports are the caller's fault, so they surface as validation
/// failures. Anything else stays a storage failure.
impl From<diesel::result::Error> for Error {
    fn from(e: diesel::result::Error) -> Self {
        use diesel::result::Error::DatabaseError;

        match e {
            DatabaseError(
                kind @ (DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::NotNullViolation
                | DatabaseErrorKind::CheckViolation),
                info,
            ) => Self::Validation(format!("{kind:?}: {}", info.message())),
            e => Self::Storage(e),
        }
    }
}
