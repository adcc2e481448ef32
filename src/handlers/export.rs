use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use crate::app::AppState;
use crate::errors::AppResult;
use crate::models::{RoleQuery, TaskFilter};
use crate::services::export::tasks_to_csv;
use super::{require_admin, AppQuery};

pub async fn export_tasks(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RoleQuery>,
) -> AppResult<Response> {
    require_admin(query.role.as_deref(), "export tasks")?;

    let tasks = state.store.list_tasks(TaskFilter::All).await?;
    let csv_data = tasks_to_csv(&tasks)?;

    tracing::info!("Exported {} tasks as CSV", tasks.len());
    Ok(Json(json!({ "csv_data": csv_data })).into_response())
}
