use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use domain::RequestDraft;
use tracing::{debug, info, instrument};

use crate::auth::{AdminAccess, Principal};
use crate::error::ApiError;
use crate::schemas::{
    ApiResponse, AppState, CreateServiceRequest, ServiceRequestResponse, StatusQuery,
};

fn to_responses(models: Vec<model::entities::service_request::Model>) -> Vec<ServiceRequestResponse> {
    models.into_iter().map(ServiceRequestResponse::from).collect()
}

/// Submit a service request as the authenticated caller
#[utoipa::path(
    post,
    path = "/api/requests",
    tag = "requests",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Request created with status PENDING", body = ApiResponse<ServiceRequestResponse>),
        (status = 400, description = "Category or description out of bounds", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("basic_auth" = []))
)]
#[instrument(skip(state, request))]
pub async fn create_request(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceRequestResponse>>), ApiError> {
    let created = state
        .requests
        .create(
            RequestDraft {
                category: request.category,
                description: request.description,
            },
            &principal.username,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            ServiceRequestResponse::from(created),
            "Service request created successfully",
        )),
    ))
}

/// List every service request
#[utoipa::path(
    get,
    path = "/api/requests",
    tag = "requests",
    responses(
        (status = 200, description = "All requests, ordered by id", body = ApiResponse<Vec<ServiceRequestResponse>>),
        (status = 401, description = "Not authenticated while admin role is enforced", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security((), ("basic_auth" = []))
)]
#[instrument(skip(state, _access))]
pub async fn list_requests(
    State(state): State<AppState>,
    _access: AdminAccess,
) -> Result<Json<ApiResponse<Vec<ServiceRequestResponse>>>, ApiError> {
    let all = state.requests.list_all().await?;
    Ok(Json(ApiResponse::ok(
        to_responses(all),
        "Service requests retrieved successfully",
    )))
}

/// List the caller's own service requests
#[utoipa::path(
    get,
    path = "/api/requests/user",
    tag = "requests",
    responses(
        (status = 200, description = "Requests created by the caller", body = ApiResponse<Vec<ServiceRequestResponse>>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("basic_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_my_requests(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<ApiResponse<Vec<ServiceRequestResponse>>>, ApiError> {
    let owned = state.requests.list_by_owner(&principal.username).await?;
    debug!("'{}' owns {} requests", principal.username, owned.len());
    Ok(Json(ApiResponse::ok(
        to_responses(owned),
        "Service requests retrieved successfully",
    )))
}

/// Set the status of a service request
#[utoipa::path(
    put,
    path = "/api/requests/{id}/status",
    tag = "requests",
    params(
        ("id" = i32, Path, description = "Service request ID"),
        ("status" = String, Query, description = "New status, case-insensitive"),
    ),
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ServiceRequestResponse>),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 401, description = "Not authenticated while admin role is enforced", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "Service request not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security((), ("basic_auth" = []))
)]
#[instrument(skip(state, _access))]
pub async fn update_request_status(
    State(state): State<AppState>,
    _access: AdminAccess,
    Path(id): Path<i32>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<ApiResponse<ServiceRequestResponse>>, ApiError> {
    let updated = state.requests.update_status(id, &query.status).await?;
    Ok(Json(ApiResponse::ok(
        ServiceRequestResponse::from(updated),
        "Status updated successfully",
    )))
}

/// Delete one of the caller's own service requests
#[utoipa::path(
    delete,
    path = "/api/requests/{id}",
    tag = "requests",
    params(
        ("id" = i32, Path, description = "Service request ID"),
    ),
    responses(
        (status = 200, description = "Request deleted; `data` is the deleted id", body = ApiResponse<i32>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller does not own the request", body = ErrorResponse),
        (status = 404, description = "Service request not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("basic_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    principal: Principal,
) -> Result<Json<ApiResponse<i32>>, ApiError> {
    state.requests.delete(id, &principal.username).await?;
    info!("Service request {} removed", id);
    Ok(Json(ApiResponse::ok(id, "Request deleted successfully")))
}
