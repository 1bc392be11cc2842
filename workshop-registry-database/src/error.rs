use diesel::result::DatabaseErrorKind;
use diesel_async::pooled_connection::deadpool;
use thiserror::Error;

pub const REGISTRATION_WORKSHOP_FKEY: &str = "registrations_workshop_fkey";
pub const REGISTRATION_USER_FKEY: &str = "registrations_user_fkey";
pub const ATTENDANCE_REGISTRATION_FKEY: &str = "attendance_registration_fkey";

/// The kind of row a foreign key pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Referenced {
    Workshop,
    User,
    Registration,
    Unknown,
}

impl Referenced {
    fn from_constraint(constraint: Option<&str>) -> Self {
        match constraint {
            Some(REGISTRATION_WORKSHOP_FKEY) => Self::Workshop,
            Some(REGISTRATION_USER_FKEY) => Self::User,
            Some(ATTENDANCE_REGISTRATION_FKEY) => Self::Registration,
            _ => Self::Unknown,
        }
    }
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to create database pool {0}")]
    PoolBuild(#[from] deadpool::BuildError),
    #[error("Database pool failed {0}")]
    Pool(#[from] deadpool::PoolError),
    #[error("Database query failed {0}")]
    Database(diesel::result::Error),
    #[error("Referenced {referenced:?} does not exist: {message}")]
    MissingReference {
        referenced: Referenced,
        message: String,
    },
    #[error("In-memory store lock was poisoned")]
    Poisoned,
}

impl From<diesel::result::Error> for DatabaseError {
    fn from(value: diesel::result::Error) -> Self {
        match value {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::MissingReference {
                    referenced: Referenced::from_constraint(info.constraint_name()),
                    message: info.message().to_owned(),
                }
            }
            other => Self::Database(other),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for DatabaseError {
    fn from(_value: std::sync::PoisonError<T>) -> Self {
        Self::Poisoned
    }
}
