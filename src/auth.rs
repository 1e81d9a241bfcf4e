use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use domain::DomainError;
use model::entities::user::Role;
use tracing::debug;

use crate::error::ApiError;
use crate::schemas::AppState;

/// The caller, authenticated from an `Authorization: Basic` header.
///
/// Use `Principal` directly on endpoints that require a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}

/// Split a `Basic` header value into username and password.
fn decode_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized("Authentication required"))?;

        let (username, password) =
            decode_basic(header_value).ok_or(ApiError::Unauthorized("Invalid authorization header format"))?;

        match state.auth.authenticate(&username, &password).await {
            Ok(user) => Ok(Principal {
                username: user.username,
                role: user.role,
            }),
            Err(DomainError::UserNotFound(_) | DomainError::InvalidCredentials) => {
                debug!("Rejected Basic credentials for '{}'", username);
                Err(ApiError::Unauthorized("Invalid credentials"))
            }
            Err(other) => Err(other.into()),
        }
    }
}

/// Gate for the administrative endpoints.
///
/// Lets everyone through unless `security.enforce_admin_role` is set, in which
/// case the caller must authenticate and hold the ADMIN role.
#[derive(Debug, Clone)]
pub struct AdminAccess(pub Option<Principal>);

#[async_trait]
impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if !state.access.enforce_admin_role {
            return Ok(AdminAccess(None));
        }

        let principal = Principal::from_request_parts(parts, state).await?;
        if principal.role != Role::Admin {
            debug!("'{}' lacks the ADMIN role", principal.username);
            return Err(ApiError::Forbidden("Administrator role required"));
        }
        Ok(AdminAccess(Some(principal)))
    }
}
