use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::CatalogError;

/// Failures that escape a page handler and become a generic error response.
///
/// Expected branches such as a stale title id or invalid form input never
/// reach this type; the handlers recover from those themselves.
#[derive(Debug)]
pub enum PageError {
    NotFound(String),

    DatabaseError(String),

    InvalidData(String),

    InternalError(String),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::NotFound(msg) => write!(f, "Not found: {}", msg),
            PageError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            PageError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            PageError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for PageError {}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            PageError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            PageError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            PageError::InvalidData(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            PageError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<CatalogError> for PageError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => PageError::NotFound(format!("Title {} not found", id)),
            CatalogError::Database(msg) => PageError::DatabaseError(msg),
            CatalogError::InvalidData(msg) => PageError::InvalidData(msg),
        }
    }
}

impl From<tower_sessions::session::Error> for PageError {
    fn from(err: tower_sessions::session::Error) -> Self {
        PageError::InternalError(format!("Session error: {err}"))
    }
}

impl From<anyhow::Error> for PageError {
    fn from(err: anyhow::Error) -> Self {
        PageError::InternalError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TitleId;

    #[test]
    fn catalog_errors_map_to_statuses() {
        let cases = [
            (CatalogError::NotFound(TitleId::new(3)), StatusCode::NOT_FOUND),
            (
                CatalogError::Database("disk full".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                CatalogError::InvalidData("unknown genre".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, status) in cases {
            let response = PageError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[test]
    fn not_found_message_names_the_title() {
        let err = PageError::from(CatalogError::NotFound(TitleId::new(12)));
        assert_eq!(err.to_string(), "Not found: Title 12 not found");
    }
}
