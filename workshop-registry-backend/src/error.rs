use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::Serialize;
use tracing::error;
use workshop_registry_config::ConfigError;
use workshop_registry_database::DatabaseError;

/// Outcome of a domain operation that did not succeed.
///
/// Every variant is recoverable; callers decide how to surface it.
#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("user {0} not found")]
    UserNotFound(String),
    #[error("workshop {0} not found")]
    WorkshopNotFound(i64),
    #[error("no registration of {username} for workshop {workshop_id}")]
    RegistrationNotFound { workshop_id: i64, username: String },
    #[error("{username} is already registered for workshop {workshop_id}")]
    AlreadyRegistered { workshop_id: i64, username: String },
    #[error("material {0} not found")]
    MaterialNotFound(String),
    #[error("material storage failed: {0}")]
    MaterialStorage(#[from] std::io::Error),
    #[error("persistence failure: {0}")]
    Persistence(#[from] DatabaseError),
}

impl RegistryError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::UserNotFound(_)
            | Self::WorkshopNotFound(_)
            | Self::RegistrationNotFound { .. }
            | Self::MaterialNotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyRegistered { .. } => StatusCode::CONFLICT,
            Self::MaterialStorage(_) | Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("form upload error: {0}")]
    Multipart(#[from] MultipartError),
    #[error("invalid request body: {0}")]
    JsonBody(#[from] JsonRejection),
    #[error("invalid path parameter: {0}")]
    PathParam(#[from] PathRejection),
    #[error("invalid query string: {0}")]
    QueryParams(#[from] QueryRejection),
    #[error("invalid form upload: {0}")]
    MultipartForm(#[from] MultipartRejection),
    #[error("missing form field {0}")]
    MissingField(&'static str),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("IO error: {0}")]
    File(#[from] std::io::Error),
}

impl AppError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Registry(registry_error) => registry_error.status(),
            Self::Multipart(multipart_error) => multipart_error.status(),
            // a path that matched a route but lacks its parameters is our bug
            Self::PathParam(rejection) if rejection.status().is_server_error() => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::JsonBody(_)
            | Self::PathParam(_)
            | Self::QueryParams(_)
            | Self::MultipartForm(_)
            | Self::MissingField(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) | Self::Database(_) | Self::File(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{self}");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use workshop_registry_database::DatabaseError;

    use super::{AppError, RegistryError};

    #[test]
    fn domain_errors_map_to_distinct_statuses() {
        let cases = [
            (RegistryError::InvalidInput("x"), StatusCode::BAD_REQUEST),
            (
                RegistryError::UserNotFound("bob".to_owned()),
                StatusCode::NOT_FOUND,
            ),
            (RegistryError::WorkshopNotFound(4), StatusCode::NOT_FOUND),
            (
                RegistryError::RegistrationNotFound {
                    workshop_id: 4,
                    username: "bob".to_owned(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                RegistryError::AlreadyRegistered {
                    workshop_id: 4,
                    username: "bob".to_owned(),
                },
                StatusCode::CONFLICT,
            ),
            (
                RegistryError::Persistence(DatabaseError::Poisoned),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(AppError::from(error).status(), status);
        }
    }

    #[test]
    fn missing_form_field_is_a_client_error() {
        let error = AppError::MissingField("name");
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "missing form field name");
    }
}
