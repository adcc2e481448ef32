use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::{
    CreateTaskForm, NewTask, Role, StatusUpdateForm, TaskFilter, TaskListQuery, TaskSnapshot,
    TaskStatus,
};
use crate::services::transition::{authorize_transition, Requester};
use super::{AppJson, AppQuery, parse_role, require_admin, required};

pub async fn list_tasks(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TaskListQuery>,
) -> AppResult<Response> {
    let (Some(user_id), Some(role)) = (query.user_id, required(query.role)) else {
        return Err(AppError::BadRequest("user_id and role are required".into()));
    };

    let filter = match parse_role(&role)? {
        Role::Admin => TaskFilter::All,
        Role::Intern => TaskFilter::AssignedTo(user_id),
    };

    tracing::debug!("Listing tasks for user {} with filter {:?}", user_id, filter);
    let tasks = state.store.list_tasks(filter).await?;

    Ok(Json(tasks).into_response())
}

pub async fn create_task(
    State(state): State<AppState>,
    AppJson(form): AppJson<CreateTaskForm>,
) -> AppResult<Response> {
    require_admin(form.role.as_deref(), "create tasks")?;

    let (Some(title), Some(assigned_to)) = (required(form.title), form.assigned_to) else {
        return Err(AppError::BadRequest("Title and assignee are required".into()));
    };

    let new_task = NewTask {
        title,
        description: form.description.unwrap_or_default(),
        due_date: required(form.due_date),
        assigned_to,
    };

    let task = state.store.create_task(new_task).await?;
    tracing::info!("Created task {} assigned to user {}", task.id, assigned_to);

    Ok(Json(json!({ "message": "Task created", "id": task.id })).into_response())
}

pub async fn update_task_status(
    State(state): State<AppState>,
    AppJson(form): AppJson<StatusUpdateForm>,
) -> AppResult<Response> {
    let (Some(task_id), Some(status), Some(user_id), Some(role)) = (
        form.task_id,
        required(form.status),
        form.user_id,
        required(form.role),
    ) else {
        return Err(AppError::BadRequest(
            "task_id, status, user_id and role are required".into(),
        ));
    };

    let requester = Requester { id: user_id, role: parse_role(&role)? };
    let target: TaskStatus = status
        .parse()
        .map_err(|_| AppError::UnknownStatus(status.clone()))?;

    let current = state.store.get_task(task_id).await?;
    let new_status = authorize_transition(requester, current.as_ref().map(TaskSnapshot::from), target)
        .map_err(|e| {
            tracing::warn!("Rejected status change of task {} by user {}: {}", task_id, user_id, e);
            AppError::from(e)
        })?;

    if !state.store.update_status(task_id, new_status).await? {
        // Deleted between lookup and write
        return Err(AppError::NotFound("Task not found".into()));
    }

    tracing::info!("Task {} moved to {} by {} {}", task_id, new_status, requester.role, user_id);
    Ok(Json(json!({ "message": "Task status updated", "status": new_status })).into_response())
}
