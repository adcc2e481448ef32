use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::errors::{StoreError, StoreResult};
use crate::models::{NewTask, Role, Task, TaskFilter, TaskStatus, TaskView, User};
use super::store::{now, sort_newest_first, TaskStore};

/// In-process store, used by tests and for running without Redis.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
    last_user_id: i64,
    last_task_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_login(&self, login: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.login == login).cloned())
    }

    async fn create_user(&self, login: &str, password: &str, role: Role) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.login == login) {
            return Err(StoreError::DuplicateLogin(login.to_string()));
        }

        state.last_user_id += 1;
        let user = User {
            id: state.last_user_id,
            login: login.to_string(),
            password: password.to_string(),
            role,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_users(&self, role: Role) -> StoreResult<Vec<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().filter(|u| u.role == role).cloned().collect())
    }

    async fn create_task(&self, task: NewTask) -> StoreResult<Task> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&task.assigned_to) {
            return Err(StoreError::UnknownUser(task.assigned_to));
        }

        state.last_task_id += 1;
        let task = Task {
            id: state.last_task_id,
            title: task.title,
            description: task.description,
            status: TaskStatus::Backlog,
            due_date: task.due_date,
            assigned_to: Some(task.assigned_to),
            created_at: now(),
        };
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: i64) -> StoreResult<Option<Task>> {
        Ok(self.state.read().await.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, filter: TaskFilter) -> StoreResult<Vec<TaskView>> {
        let state = self.state.read().await;
        let mut views: Vec<TaskView> = state
            .tasks
            .values()
            .filter(|task| match filter {
                TaskFilter::All => true,
                TaskFilter::AssignedTo(user_id) => task.assigned_to == Some(user_id),
            })
            .map(|task| TaskView {
                task: task.clone(),
                assigned_login: task
                    .assigned_to
                    .and_then(|id| state.users.get(&id))
                    .map(|u| u.login.clone()),
            })
            .collect();

        sort_newest_first(&mut views);
        Ok(views)
    }

    async fn update_status(&self, id: i64, status: TaskStatus) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        match state.tasks.get_mut(&id) {
            Some(task) => {
                task.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
