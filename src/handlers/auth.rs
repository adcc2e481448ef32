use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::LoginForm;
use super::{required, AppJson};

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(form): AppJson<LoginForm>,
) -> AppResult<Response> {
    let (Some(login), Some(password)) = (required(form.login), required(form.password)) else {
        return Err(AppError::BadRequest("Login and password are required".into()));
    };

    tracing::info!("Login attempt for user: {}", login);

    let user = state
        .store
        .authenticate(&login, &password)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Invalid credentials for user: {}", login);
            AppError::Unauthorized("Invalid login or password".into())
        })?;

    tracing::info!("User {} logged in as {}", user.id, user.role);
    Ok(Json(json!({ "id": user.id, "role": user.role })).into_response())
}
