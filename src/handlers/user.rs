use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::{CreateUserForm, Role, RoleQuery, UserSummary};
use super::{AppJson, AppQuery, require_admin, required};

pub async fn create_user(
    State(state): State<AppState>,
    AppJson(form): AppJson<CreateUserForm>,
) -> AppResult<Response> {
    require_admin(form.role.as_deref(), "create users")?;

    let (Some(login), Some(password)) = (required(form.login), required(form.password)) else {
        return Err(AppError::BadRequest("Login and password are required".into()));
    };

    // Accounts created here are always interns
    let user = state.store.create_user(&login, &password, Role::Intern).await?;
    tracing::info!("Created intern {} (id {})", user.login, user.id);

    Ok(Json(json!({ "message": "User created", "id": user.id })).into_response())
}

pub async fn list_interns(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RoleQuery>,
) -> AppResult<Response> {
    require_admin(query.role.as_deref(), "list interns")?;

    let interns: Vec<UserSummary> = state
        .store
        .list_users(Role::Intern)
        .await?
        .iter()
        .map(UserSummary::from)
        .collect();

    tracing::debug!("Listing {} interns", interns.len());
    Ok(Json(interns).into_response())
}
