use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use domain::DomainError;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

/// Errors a handler can return. Converted to an [`ErrorResponse`] body.
#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    /// Missing or rejected Basic credentials. Answered with a `WWW-Authenticate` challenge.
    Unauthorized(&'static str),
    /// Authenticated, but the role does not allow the operation.
    Forbidden(&'static str),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message.to_string())
            }
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, "FORBIDDEN", message.to_string()),
            ApiError::Domain(err) => match err {
                DomainError::Validation { message, .. } => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message.clone())
                }
                DomainError::InvalidStatus(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_STATUS", err.to_string())
                }
                DomainError::Conflict(message) => (StatusCode::BAD_REQUEST, "CONFLICT", message.clone()),
                DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                DomainError::UserNotFound(_) => {
                    (StatusCode::NOT_FOUND, "USER_NOT_FOUND", "User not found".to_string())
                }
                DomainError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    "Invalid credentials".to_string(),
                ),
                DomainError::Forbidden(message) => (StatusCode::FORBIDDEN, "FORBIDDEN", message.clone()),
                DomainError::Database(_) | DomainError::PasswordHash(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        match &self {
            ApiError::Domain(err) if err.is_internal() => error!("Request failed: {}", err),
            _ => warn!("Request rejected with {}: {}", status, message),
        }

        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
            success: false,
        });

        let mut response = (status, body).into_response();
        if matches!(self, ApiError::Unauthorized(_)) {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"servicedesk\""),
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_domain_errors_map_to_http_status() {
        assert_eq!(
            status_of(DomainError::validation("category", "too short").into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::InvalidStatus("bogus".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::Conflict("Username already exists".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::not_found("Service request", 7).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::UserNotFound("ghost".into()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(DomainError::Forbidden("not yours".into()).into()),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(DomainError::PasswordHash("corrupt".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let (_, code, message) =
            ApiError::Domain(DomainError::Database(sea_orm::DbErr::Custom("disk on fire".into()))).parts();
        assert_eq!(code, "INTERNAL_ERROR");
        assert_eq!(message, "Internal server error");
    }

    #[test]
    fn test_unauthorized_carries_basic_challenge() {
        let response = ApiError::Unauthorized("Authentication required").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let challenge = response.headers().get(header::WWW_AUTHENTICATE).unwrap();
        assert!(challenge.to_str().unwrap().starts_with("Basic"));
    }
}
