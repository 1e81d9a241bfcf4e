use chrono::NaiveDateTime;
use domain::{AuthService, RequestService};
use model::entities::{
    service_request::{self, Status},
    user::{self, Role},
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::config::{AccessPolicy, HttpSettings};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection, used directly only by the health check
    pub db: DatabaseConnection,
    pub auth: AuthService,
    pub requests: RequestService,
    pub access: AccessPolicy,
    pub http: HttpSettings,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Body of `POST /api/login`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /api/users/register`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// 3 to 100 characters, unique
    pub username: String,
    /// Unique
    pub email: String,
    /// 6 to 128 characters
    pub password: String,
}

/// Non-sensitive view of a user. The password hash never leaves the service.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
}

impl From<user::Model> for UserSummary {
    fn from(model: user::Model) -> Self {
        Self {
            username: model.username,
            email: model.email,
            role: model.role,
        }
    }
}

/// Body of `POST /api/requests`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateServiceRequest {
    /// 2 to 100 characters
    pub category: String,
    /// 5 to 255 characters
    pub description: String,
}

/// A service request as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestResponse {
    pub id: i32,
    pub category: String,
    pub description: String,
    pub status: Status,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<service_request::Model> for ServiceRequestResponse {
    fn from(model: service_request::Model) -> Self {
        Self {
            id: model.id,
            category: model.category,
            description: model.description,
            status: model.status,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Query string of the status update endpoints
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusQuery {
    /// Status name, case-insensitive (e.g. `in_progress`)
    pub status: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::login,
        crate::handlers::auth::current_role,
        crate::handlers::auth::register,
        crate::handlers::requests::create_request,
        crate::handlers::requests::list_requests,
        crate::handlers::requests::list_my_requests,
        crate::handlers::requests::update_request_status,
        crate::handlers::requests::delete_request,
        crate::handlers::admin::list_all_requests,
        crate::handlers::admin::update_status,
    ),
    components(
        schemas(
            ApiResponse<UserSummary>,
            ApiResponse<ServiceRequestResponse>,
            ApiResponse<Vec<ServiceRequestResponse>>,
            ErrorResponse,
            HealthResponse,
            LoginRequest,
            RegisterRequest,
            UserSummary,
            CreateServiceRequest,
            ServiceRequestResponse,
            StatusQuery,
            Status,
            Role,
        )
    ),
    modifiers(&BasicAuthAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Login and registration"),
        (name = "requests", description = "Service request lifecycle"),
        (name = "admin", description = "Administrative views of all requests"),
    ),
    info(
        title = "Service Desk API",
        description = "Submit service requests and track them through their lifecycle",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;

/// Registers the `basic_auth` security scheme referenced by protected paths.
pub struct BasicAuthAddon;

impl utoipa::Modify for BasicAuthAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
            );
        }
    }
}
