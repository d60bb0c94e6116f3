//! Route handlers.

use super::server::AppState;
use super::session::CurrentUser;
use crate::auth;
use crate::error::{ErrorCode, TodoError, TodoResult};
use crate::types::{ListId, NewTask, TaskId, TaskNode, TaskUpdate};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};

type ApiResult = TodoResult<(StatusCode, Json<Value>)>;

/// Unwrap a JSON body, turning malformed or mistyped input into a validation error.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> TodoResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| TodoError::new(ErrorCode::ValidationError, rejection.body_text()))
}

/// Unwrap a numeric id from the URL, turning a non-integer segment into a validation error.
fn path_id(path: Result<Path<i64>, PathRejection>) -> TodoResult<i64> {
    path
        .map(|Path(id)| id)
        .map_err(|rejection| TodoError::new(ErrorCode::ValidationError, rejection.body_text()))
}

fn ok(value: Value) -> ApiResult {
    Ok((StatusCode::OK, Json(value)))
}

fn created(value: Value) -> ApiResult {
    Ok((StatusCode::CREATED, Json(value)))
}

#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub struct NameRequest {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
pub struct MoveRequest {
    list_id: Option<ListId>,
}

// =============================================================================
// Accounts
// =============================================================================

pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult {
    let req = body(payload)?;
    if req.password.is_empty() {
        return Err(TodoError::missing_field("password"));
    }
    let password = req.password;
    let hash = tokio::task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .map_err(TodoError::internal)?
        .map_err(TodoError::internal)?;
    let user = state.db.create_user(&req.username, &req.email, &hash)?;

    created(json!({ "message": "User created successfully", "user": user }))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult {
    let req = body(payload)?;
    let invalid = || TodoError::new(ErrorCode::Unauthenticated, "Invalid credentials");

    let user = state.db.find_user_by_email(&req.email)?.ok_or_else(invalid)?;
    let (password, hash) = (req.password, user.password_hash.clone());
    let verified = tokio::task::spawn_blocking(move || auth::verify_password(&password, &hash))
        .await
        .map_err(TodoError::internal)?
        .map_err(TodoError::internal)?;
    if !verified {
        return Err(invalid());
    }

    let session = state.db.create_session(user.id, state.session.ttl())?;
    ok(json!({
        "message": "Login successful",
        "token": session.token,
        "expires_at": session.expires_at,
        "user": user,
    }))
}

pub async fn logout(State(state): State<AppState>, caller: CurrentUser) -> ApiResult {
    state.db.delete_session(&caller.token)?;
    ok(json!({ "message": "Logout successful" }))
}

pub async fn delete_account(State(state): State<AppState>, caller: CurrentUser) -> ApiResult {
    state.db.delete_user(caller.user_id)?;
    ok(json!({ "message": "Account deleted successfully" }))
}

// =============================================================================
// Tasks
// =============================================================================

pub async fn get_tasks(State(state): State<AppState>, caller: CurrentUser) -> ApiResult {
    let lists = state.db.get_board(caller.user_id)?;
    ok(json!({ "lists": lists }))
}

pub async fn add_task(
    State(state): State<AppState>,
    caller: CurrentUser,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> ApiResult {
    let task = state.db.insert_task(caller.user_id, body(payload)?)?;
    created(json!({
        "message": "Task added successfully",
        "task": TaskNode::from(&task),
    }))
}

pub async fn update_task(
    State(state): State<AppState>,
    caller: CurrentUser,
    task_id: Result<Path<TaskId>, PathRejection>,
    payload: Result<Json<TaskUpdate>, JsonRejection>,
) -> ApiResult {
    let task_id = path_id(task_id)?;
    let task = state.db.update_task(caller.user_id, task_id, body(payload)?)?;
    ok(json!({ "message": "Task updated successfully", "task": task }))
}

pub async fn delete_task(
    State(state): State<AppState>,
    caller: CurrentUser,
    task_id: Result<Path<TaskId>, PathRejection>,
) -> ApiResult {
    let task_id = path_id(task_id)?;
    let summary = state.db.delete_task(caller.user_id, task_id)?;
    ok(json!({ "message": "Task deleted successfully", "removed": summary.removed }))
}

pub async fn move_task(
    State(state): State<AppState>,
    caller: CurrentUser,
    task_id: Result<Path<TaskId>, PathRejection>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> ApiResult {
    let task_id = path_id(task_id)?;
    let list_id = body(payload)?
        .list_id
        .ok_or_else(|| TodoError::missing_field("list_id"))?;
    let task = state.db.move_task(caller.user_id, task_id, list_id)?;
    ok(json!({ "message": "Task moved successfully", "task": task }))
}

pub async fn toggle_task(
    State(state): State<AppState>,
    caller: CurrentUser,
    task_id: Result<Path<TaskId>, PathRejection>,
) -> ApiResult {
    let task_id = path_id(task_id)?;
    let task = state.db.toggle_task(caller.user_id, task_id)?;
    ok(json!({ "message": "Task toggled successfully", "task": task }))
}

// =============================================================================
// Lists
// =============================================================================

pub async fn add_list(
    State(state): State<AppState>,
    caller: CurrentUser,
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> ApiResult {
    let list = state.db.create_list(caller.user_id, &body(payload)?.name)?;
    created(json!({ "message": "List added successfully", "list": list }))
}

pub async fn update_list(
    State(state): State<AppState>,
    caller: CurrentUser,
    list_id: Result<Path<ListId>, PathRejection>,
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> ApiResult {
    let list_id = path_id(list_id)?;
    let list = state
        .db
        .rename_list(caller.user_id, list_id, &body(payload)?.name)?;
    ok(json!({ "message": "List updated successfully", "list": list }))
}

pub async fn delete_list(
    State(state): State<AppState>,
    caller: CurrentUser,
    list_id: Result<Path<ListId>, PathRejection>,
) -> ApiResult {
    let list_id = path_id(list_id)?;
    let removed = state.db.delete_list(caller.user_id, list_id)?;
    ok(json!({
        "message": "List and associated tasks deleted successfully",
        "tasks_removed": removed,
    }))
}

pub async fn delete_all_lists(State(state): State<AppState>, caller: CurrentUser) -> ApiResult {
    let removed = state.db.delete_all_lists_for_user(caller.user_id)?;
    ok(json!({ "message": "All lists deleted successfully", "lists_removed": removed }))
}

pub async fn toggle_list(
    State(state): State<AppState>,
    caller: CurrentUser,
    list_id: Result<Path<ListId>, PathRejection>,
) -> ApiResult {
    let list_id = path_id(list_id)?;
    let completed = state.db.toggle_list(caller.user_id, list_id)?;
    ok(json!({ "message": "List toggled successfully", "completed": completed }))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy", "version": env!("CARGO_PKG_VERSION") }))
}
