use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use crate::config::SeedConfig;
use crate::errors::StoreResult;
use crate::models::{NewTask, Role, Task, TaskFilter, TaskStatus, TaskView, User};

/// Persistence boundary for users and tasks.
///
/// Handlers receive an implementation through application state, so the
/// backend can be swapped for [`MemoryStore`](super::MemoryStore) in tests.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>>;

    async fn find_user_by_login(&self, login: &str) -> StoreResult<Option<User>>;

    /// Fails with `DuplicateLogin` when the login is taken.
    async fn create_user(&self, login: &str, password: &str, role: Role) -> StoreResult<User>;

    /// Users holding `role`, ordered by id.
    async fn list_users(&self, role: Role) -> StoreResult<Vec<User>>;

    /// Fails with `UnknownUser` when the assignee does not exist.
    async fn create_task(&self, task: NewTask) -> StoreResult<Task>;

    async fn get_task(&self, id: i64) -> StoreResult<Option<Task>>;

    /// Tasks joined with their assignee's login, newest first.
    async fn list_tasks(&self, filter: TaskFilter) -> StoreResult<Vec<TaskView>>;

    /// Returns `false` when the task does not exist.
    async fn update_status(&self, id: i64, status: TaskStatus) -> StoreResult<bool>;

    /// Plaintext credential check.
    async fn authenticate(&self, login: &str, password: &str) -> StoreResult<Option<User>> {
        Ok(self
            .find_user_by_login(login)
            .await?
            .filter(|user| user.password == password))
    }
}

/// Creates the configured admin and intern accounts if they are missing.
pub async fn seed_accounts(store: &dyn TaskStore, seed: &SeedConfig) -> StoreResult<()> {
    if store.list_users(Role::Admin).await?.is_empty() {
        let admin = store
            .create_user(&seed.admin_login, &seed.admin_password, Role::Admin)
            .await?;
        tracing::info!("Seeded admin account '{}' (id {})", admin.login, admin.id);
    }

    if store.find_user_by_login(&seed.intern_login).await?.is_none() {
        let intern = store
            .create_user(&seed.intern_login, &seed.intern_password, Role::Intern)
            .await?;
        tracing::info!("Seeded intern account '{}' (id {})", intern.login, intern.id);
    }

    Ok(())
}

// Shared by every backend so listings agree on order
pub(crate) fn sort_newest_first(tasks: &mut [TaskView]) {
    tasks.sort_by(|a, b| {
        b.task
            .created_at
            .cmp(&a.task.created_at)
            .then(b.task.id.cmp(&a.task.id))
    });
}

// Timestamps are kept at whole seconds, the precision they serialize with
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}
