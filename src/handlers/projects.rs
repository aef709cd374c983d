//! Project CRUD endpoints.
//!
//! Every route requires a session. Lookups by id are scoped to the caller,
//! so another user's project id answers exactly like a missing one (404).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::auth::AuthContext;
use crate::db;
use crate::domain::{Project, ProjectPayload};
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::state::AppState;

/// GET /api/projects
pub async fn list_projects(
    auth: AuthContext,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Project>>> {
    let conn = db::try_lock(&state.db)?;
    let projects = db::list_projects(&conn, auth.user_id())?;
    Ok(Json(projects))
}

/// GET /api/projects/{id}
pub async fn get_project(
    auth: AuthContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    let conn = db::try_lock(&state.db)?;
    let project = db::get_project(&conn, &id, auth.user_id())?.ok_or(ApiError::NotFound)?;
    Ok(Json(project))
}

/// POST /api/projects
pub async fn create_project(
    auth: AuthContext,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ProjectPayload>,
) -> ApiResult<impl IntoResponse> {
    let new_project = payload.into_new_project();

    let conn = db::try_lock(&state.db)?;
    let project = db::create_project(&conn, auth.user_id(), &new_project)?;
    tracing::debug!(
        "Created project {} ({} files) for user {}",
        project.id,
        project.files.len(),
        project.user
    );

    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /api/projects/{id}
///
/// Only the fields present in the body are changed. Omitting `files` keeps
/// the stored files; `files: []` clears them.
pub async fn update_project(
    auth: AuthContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<ProjectPayload>,
) -> ApiResult<Json<Project>> {
    let changes = payload.into_changes().map_err(ApiError::BadRequest)?;

    let conn = db::try_lock(&state.db)?;
    let project =
        db::update_project(&conn, &id, auth.user_id(), &changes)?.ok_or(ApiError::NotFound)?;
    Ok(Json(project))
}

/// DELETE /api/projects/{id}
pub async fn delete_project(
    auth: AuthContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let conn = db::try_lock(&state.db)?;
    if !db::delete_project(&conn, &id, auth.user_id())? {
        return Err(ApiError::NotFound);
    }
    tracing::debug!("Deleted project {} for user {}", id, auth.user_id());
    Ok(Json(serde_json::json!({ "message": "Project removed" })))
}
