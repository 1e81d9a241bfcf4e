use axum::{extract::State, response::Json};
use domain::Registration;
use tracing::{info, instrument};

use crate::auth::Principal;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, LoginRequest, RegisterRequest, UserSummary};

/// Log in with a username and password in the body
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = ApiResponse<UserSummary>),
        (status = 401, description = "Wrong password", body = ErrorResponse),
        (status = 404, description = "Unknown username", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<UserSummary>>, ApiError> {
    let user = state
        .auth
        .authenticate(&request.username, &request.password)
        .await?;

    info!("User '{}' logged in", user.username);
    Ok(Json(ApiResponse::ok(UserSummary::from(user), "Login successful")))
}

/// Role of the caller authenticated through HTTP Basic, as plain text
#[utoipa::path(
    get,
    path = "/api/users/login",
    tag = "auth",
    responses(
        (status = 200, description = "Role name, `ADMIN` or `USER`", body = String, content_type = "text/plain"),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("basic_auth" = []))
)]
#[instrument(skip(state))]
pub async fn current_role(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<String, ApiError> {
    let user = state.auth.resolve_current_user(&principal.username).await?;
    Ok(user.role.as_str().to_string())
}

/// Register a new account with role USER
#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = ApiResponse<UserSummary>),
        (status = 400, description = "Validation failed or username/email taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<UserSummary>>, ApiError> {
    let user = state
        .auth
        .register(Registration {
            username: request.username,
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok(Json(ApiResponse::ok(
        UserSummary::from(user),
        "User registered successfully",
    )))
}
