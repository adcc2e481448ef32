mod auth;
mod task;
mod user;
mod export;
mod extract;

pub use auth::{handle_login, health_check};
pub use task::{list_tasks, create_task, update_task_status};
pub use user::{create_user, list_interns};
pub use export::export_tasks;
pub use extract::{AppJson, AppQuery};

use crate::errors::{AppError, AppResult};
use crate::models::Role;

// A present, non-blank string field
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_role(role: &str) -> AppResult<Role> {
    role.parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown role: {}", role)))
}

// Admin-only endpoints reject anything but an explicit admin role
fn require_admin(role: Option<&str>, action: &str) -> AppResult<()> {
    match role.map(str::parse::<Role>) {
        Some(Ok(Role::Admin)) => Ok(()),
        _ => {
            tracing::warn!("Rejected non-admin attempt to {}", action);
            Err(AppError::Forbidden(format!("Only an admin may {}", action)))
        }
    }
}
