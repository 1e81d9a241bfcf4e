use crate::handlers::{
    admin::{list_all_requests, update_status},
    auth::{current_role, login, register},
    health::health_check,
    requests::{create_request, delete_request, list_my_requests, list_requests, update_request_status},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let cors = match &state.http.cors_allowed_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.clone())
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };
    let timeout = state.http.request_timeout;

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Authentication
        .route("/api/login", post(login))
        .route("/api/users/login", get(current_role))
        .route("/api/users/register", post(register))
        // Service requests
        .route("/api/requests", post(create_request))
        .route("/api/requests", get(list_requests))
        .route("/api/requests/user", get(list_my_requests))
        .route("/api/user/requests", get(list_my_requests))
        .route("/api/requests/:id/status", put(update_request_status))
        .route("/api/requests/:id", delete(delete_request))
        // Administration
        .route("/api/admin/requests", get(list_all_requests))
        .route("/api/admin/requests/:id/status", put(update_status))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(timeout))
                .layer(cors),
        )
        .with_state(state)
}
