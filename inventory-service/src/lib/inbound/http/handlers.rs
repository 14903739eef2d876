use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::inventory::errors::InventoryError;
use crate::inventory::errors::ResourceNameError;
use crate::session::errors::SessionError;

pub mod auth;
pub mod distros;
pub mod resources;

/// Message returned for every authentication failure.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Unauthorized,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE.to_string()),
        };

        (status, Json(ApiErrorData { message })).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match &err {
            SessionError::Storage(_) | SessionError::Password(_) => {
                tracing::error!(error = %err, "Authentication backend failure")
            }
            _ => tracing::warn!(error = %err, "Authentication rejected"),
        }
        ApiError::Unauthorized
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            InventoryError::InvalidResource(_)
            | InventoryError::NoImagePaths
            | InventoryError::Provisioning(_) => ApiError::BadRequest(err.to_string()),
            InventoryError::Storage(_) => {
                tracing::error!(error = %err, "Inventory backend failure");
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}

impl From<ResourceNameError> for ApiError {
    fn from(err: ResourceNameError) -> Self {
        ApiError::BadRequest(format!("Invalid name: {}", err))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::errors::ResourceValidationError;

    #[test]
    fn test_session_errors_collapse_to_unauthorized() {
        let errors = [
            SessionError::InvalidCredentials,
            SessionError::InvalidToken,
            SessionError::ReverificationRequired,
            SessionError::OwnerMismatch {
                owner: "admin".to_string(),
                username: "operator".to_string(),
            },
            SessionError::Storage("connection refused".to_string()),
        ];

        for err in errors {
            assert_eq!(ApiError::from(err), ApiError::Unauthorized);
        }
    }

    #[test]
    fn test_inventory_error_mapping() {
        assert_eq!(
            ApiError::from(InventoryError::NotFound {
                kind: "OSimage",
                name: "compute".to_string()
            }),
            ApiError::NotFound("OSimage compute not found".to_string())
        );
        assert_eq!(
            ApiError::from(InventoryError::NoImagePaths),
            ApiError::BadRequest("Image not found".to_string())
        );
        assert_eq!(
            ApiError::from(InventoryError::InvalidResource(
                ResourceValidationError::MissingSpec
            )),
            ApiError::BadRequest("Missing 'spec' section".to_string())
        );
    }

    #[test]
    fn test_error_response_status() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ApiError::NotFound("gone".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
