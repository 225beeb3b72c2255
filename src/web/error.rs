use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::database::RegistryError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Email is required")]
    MissingEmail,

    #[error("{0}")]
    InvalidRequest(String),
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Registry(RegistryError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Registry(RegistryError::AlreadyRegistered)
            | ApiError::Registry(RegistryError::NotRegistered)
            | ApiError::Registry(RegistryError::ActivityFull)
            | ApiError::MissingEmail
            | ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "detail": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_errors_map_to_client_statuses() {
        let cases = [
            (RegistryError::NotFound, StatusCode::NOT_FOUND, "not found"),
            (
                RegistryError::AlreadyRegistered,
                StatusCode::BAD_REQUEST,
                "already signed up",
            ),
            (
                RegistryError::NotRegistered,
                StatusCode::BAD_REQUEST,
                "not registered",
            ),
            (RegistryError::ActivityFull, StatusCode::BAD_REQUEST, "full"),
        ];
        for (err, status, needle) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status(), status);
            assert!(api.to_string().to_lowercase().contains(needle), "{api}");
        }
    }

    #[test]
    fn invalid_request_keeps_rejection_text() {
        let api = ApiError::InvalidRequest("duplicate field `email`".to_string());
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.to_string(), "duplicate field `email`");
    }

    #[test]
    fn missing_email_is_bad_request() {
        let response = ApiError::MissingEmail.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
