//! REST surface: handlers and router assembly.
//!
//! Handlers stay thin: extract the identity, parse path ids, delegate to
//! the engine or a service, and wrap the result under its named JSON key.
//! All policy decisions live below this layer, except the admin gates that
//! are purely route-level (task creation, user administration).

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::json;

use crewtask_proto::leave::{LeaveDraft, LeaveId, LeaveReview};
use crewtask_proto::project::{ProjectDraft, ProjectId};
use crewtask_proto::task::{TaskDraft, TaskId, TaskPatch};
use crewtask_proto::team::{TeamDraft, TeamId};
use crewtask_proto::user::User;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::server::AppState;
use crate::ws;

/// Parses a path segment into a typed id, mapping failure to 400.
fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::validation(format!("malformed {what} id")))
}

/// Builds the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        // Literal segment registered alongside the capture; axum prefers it.
        .route("/tasks/stats", get(task_stats))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/users", get(list_users).put(upsert_user))
        .route("/leaves", get(list_leaves).post(submit_leave))
        .route("/leaves/stats", get(leave_stats))
        .route("/leaves/{id}/status", put(review_leave))
        .route("/teams", get(list_teams).post(create_team))
        .route(
            "/teams/{id}",
            get(get_team).put(update_team).delete(delete_team),
        )
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
}

// --- tasks ---

async fn list_tasks(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = state.engine.list_for(&user).await;
    Ok(Json(json!({ "tasks": tasks })))
}

async fn create_task(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(draft): Json<TaskDraft>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    let task = state.engine.create(&user, draft).await?;
    Ok((StatusCode::CREATED, Json(json!({ "task": task }))))
}

async fn task_stats(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.engine.stats(&user).await;
    Ok(Json(json!({ "stats": stats })))
}

async fn get_task(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: TaskId = parse_id(&id, "task")?;
    let task = state.engine.get(&user, id).await?;
    Ok(Json(json!({ "task": task })))
}

async fn update_task(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let id: TaskId = parse_id(&id, "task")?;
    let task = state.engine.update(&user, id, patch).await?;
    Ok(Json(json!({ "task": task })))
}

async fn delete_task(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: TaskId = parse_id(&id, "task")?;
    let deleted = state.engine.delete(&user, id).await?;
    Ok(Json(json!({ "taskId": deleted })))
}

// --- users ---

async fn list_users(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    let users = state.directory.all().await;
    Ok(Json(json!({ "users": users })))
}

async fn upsert_user(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(record): Json<User>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    if record.name.trim().is_empty() {
        return Err(ApiError::validation("name is required"));
    }
    state.directory.upsert(record.clone()).await;
    tracing::info!(target_id = %record.id, user_id = %user.id, "user record upserted");
    Ok(Json(json!({ "user": record })))
}

// --- leaves ---

async fn list_leaves(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let leaves = state.leaves.list_for(&user).await;
    Ok(Json(json!({ "leaves": leaves })))
}

async fn submit_leave(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(draft): Json<LeaveDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let leave = state.leaves.submit(&user, draft).await?;
    Ok((StatusCode::CREATED, Json(json!({ "leave": leave }))))
}

async fn leave_stats(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.leaves.stats_for(&user).await;
    Ok(Json(json!({ "stats": stats })))
}

async fn review_leave(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(review): Json<LeaveReview>,
) -> Result<impl IntoResponse, ApiError> {
    let id: LeaveId = parse_id(&id, "leave")?;
    let leave = state.leaves.review(&user, id, review).await?;
    Ok(Json(json!({ "leave": leave })))
}

// --- teams ---

async fn list_teams(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let teams = state.teams.all().await;
    Ok(Json(json!({ "teams": teams })))
}

async fn create_team(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(draft): Json<TeamDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let team = state.teams.create(&user, draft).await?;
    Ok((StatusCode::CREATED, Json(json!({ "team": team }))))
}

async fn get_team(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: TeamId = parse_id(&id, "team")?;
    let team = state.teams.get(id).await?;
    Ok(Json(json!({ "team": team })))
}

async fn update_team(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<TeamDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let id: TeamId = parse_id(&id, "team")?;
    let team = state.teams.update(&user, id, draft).await?;
    Ok(Json(json!({ "team": team })))
}

async fn delete_team(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: TeamId = parse_id(&id, "team")?;
    state.teams.delete(&user, id).await?;
    Ok(Json(json!({ "teamId": id })))
}

// --- projects ---

async fn list_projects(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let projects = state.projects.all().await;
    Ok(Json(json!({ "projects": projects })))
}

async fn create_project(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ProjectDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let project = state.projects.create(&user, draft).await?;
    Ok((StatusCode::CREATED, Json(json!({ "project": project }))))
}

async fn get_project(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: ProjectId = parse_id(&id, "project")?;
    let project = state.projects.get(id).await?;
    Ok(Json(json!({ "project": project })))
}

async fn update_project(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<ProjectDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let id: ProjectId = parse_id(&id, "project")?;
    let project = state.projects.update(&user, id, draft).await?;
    Ok(Json(json!({ "project": project })))
}

async fn delete_project(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: ProjectId = parse_id(&id, "project")?;
    state.projects.delete(&user, id).await?;
    Ok(Json(json!({ "projectId": id })))
}
