use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use tracing::{debug, instrument};

use crate::auth::AdminAccess;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ServiceRequestResponse, StatusQuery};

/// List every service request (administrative view)
#[utoipa::path(
    get,
    path = "/api/admin/requests",
    tag = "admin",
    responses(
        (status = 200, description = "All requests, ordered by id", body = ApiResponse<Vec<ServiceRequestResponse>>),
        (status = 401, description = "Not authenticated, when the admin role is enforced", body = ErrorResponse),
        (status = 403, description = "Not an administrator, when the admin role is enforced", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security((), ("basic_auth" = []))
)]
#[instrument(skip(state, access))]
pub async fn list_all_requests(
    State(state): State<AppState>,
    access: AdminAccess,
) -> Result<Json<ApiResponse<Vec<ServiceRequestResponse>>>, ApiError> {
    if let AdminAccess(Some(admin)) = &access {
        debug!("Admin listing requested by '{}'", admin.username);
    }

    let all = state.requests.list_all().await?;
    let data: Vec<ServiceRequestResponse> = all.into_iter().map(ServiceRequestResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Service requests retrieved successfully")))
}

/// Set the status of any service request (administrative view)
#[utoipa::path(
    put,
    path = "/api/admin/requests/{id}/status",
    tag = "admin",
    params(
        ("id" = i32, Path, description = "Service request ID"),
        ("status" = String, Query, description = "New status, case-insensitive"),
    ),
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ServiceRequestResponse>),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 401, description = "Not authenticated, when the admin role is enforced", body = ErrorResponse),
        (status = 403, description = "Not an administrator, when the admin role is enforced", body = ErrorResponse),
        (status = 404, description = "Service request not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security((), ("basic_auth" = []))
)]
#[instrument(skip(state, _access))]
pub async fn update_status(
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
