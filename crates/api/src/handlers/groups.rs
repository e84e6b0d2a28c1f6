use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use bastion_dns_domain::DomainError;
use tracing::{debug, error};

use crate::{
    dto::{CreateGroupRequest, GroupResponse, UpdateGroupRequest},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/groups", get(get_all_groups))
        .route("/api/groups", post(create_group))
        .route("/api/groups/:id", get(get_group_by_id))
        .route("/api/groups/:id", put(update_group))
        .route("/api/groups/:id", delete(delete_group))
}

async fn get_all_groups(State(state): State<AppState>) -> Json<Vec<GroupResponse>> {
    match state.get_groups.get_all().await {
        Ok(groups) => {
            debug!(count = groups.len(), "Groups retrieved successfully");
            Json(groups.into_iter().map(GroupResponse::from_group).collect())
        }
        Err(e) => {
            error!(error = %e, "Failed to retrieve groups");
            Json(vec![])
        }
    }
}

async fn get_group_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<GroupResponse>, (StatusCode, String)> {
    match state.get_groups.get_by_id(id).await {
        Ok(Some(group)) => Ok(Json(GroupResponse::from_group(group))),
        Ok(None) => Err((StatusCode::NOT_FOUND, format!("Group {} not found", id))),
        Err(e) => {
            error!(error = %e, "Failed to retrieve group");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

async fn create_group(
    State(state): State<AppState>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), (StatusCode, String)> {
    match state.create_group.execute(req.name, req.comment).await {
        Ok(group) => Ok((StatusCode::CREATED, Json(GroupResponse::from_group(group)))),
        Err(DomainError::InvalidGroupName(msg)) => Err((StatusCode::CONFLICT, msg)),
        Err(e) => {
            error!(error = %e, "Failed to create group");
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateGroupRequest>,
) -> Result<Json<GroupResponse>, (StatusCode, String)> {
    match state
        .update_group
        .execute(id, req.name, req.enabled, req.comment)
        .await
    {
        Ok(group) => Ok(Json(GroupResponse::from_group(group))),
        Err(DomainError::GroupNotFound(msg)) => Err((StatusCode::NOT_FOUND, msg)),
        Err(DomainError::ProtectedGroupCannotBeDisabled) => Err((
            StatusCode::BAD_REQUEST,
            "Cannot disable the default group".to_string(),
        )),
        Err(DomainError::InvalidGroupName(msg)) => Err((StatusCode::CONFLICT, msg)),
        Err(e) => {
            error!(error = %e, "Failed to update group");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.delete_group.execute(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(DomainError::GroupNotFound(msg)) => Err((StatusCode::NOT_FOUND, msg)),
        Err(DomainError::ProtectedGroupCannotBeDeleted) => Err((
            StatusCode::FORBIDDEN,
            "Cannot delete the default group".to_string(),
        )),
        Err(DomainError::GroupHasAssignedClients(count)) => Err((
            StatusCode::CONFLICT,
            format!("Cannot delete group with {} assigned subnets", count),
        )),
        Err(e) => {
            error!(error = %e, "Failed to delete group");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
