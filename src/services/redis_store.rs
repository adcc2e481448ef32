use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use crate::errors::{StoreError, StoreResult};
use crate::models::{NewTask, Role, Task, TaskFilter, TaskStatus, TaskView, User};
use super::store::{now, sort_newest_first, TaskStore};

// Key layout:
//   user:{id}             JSON user
//   user_login:{login}    id, claimed with SET NX
//   users:role:{role}     set of ids
//   task:{id}             JSON task
//   tasks                 set of all task ids
//   tasks:assigned:{id}   set of task ids per assignee
const USER_SEQ: &str = "users:next_id";
const TASK_SEQ: &str = "tasks:next_id";
const TASK_IDS: &str = "tasks";

fn user_key(id: i64) -> String {
    format!("user:{}", id)
}

fn login_key(login: &str) -> String {
    format!("user_login:{}", login)
}

fn role_key(role: Role) -> String {
    format!("users:role:{}", role)
}

fn task_key(id: i64) -> String {
    format!("task:{}", id)
}

fn assigned_key(user_id: i64) -> String {
    format!("tasks:assigned:{}", user_id)
}

fn encode_record<T: Serialize>(record: &T) -> StoreResult<String> {
    Ok(serde_json::to_string(record)?)
}

fn decode_record<T: DeserializeOwned>(data: Option<String>) -> StoreResult<Option<T>> {
    data.map(|data| serde_json::from_str(&data).map_err(StoreError::from))
        .transpose()
}

/// Redis-backed store. Commands share one multiplexed, auto-reconnecting
/// connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(client: Client) -> StoreResult<Self> {
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    async fn load_user(conn: &mut ConnectionManager, id: i64) -> StoreResult<Option<User>> {
        let user_data: Option<String> = conn.get(user_key(id)).await?;
        decode_record(user_data)
    }

    async fn load_task(conn: &mut ConnectionManager, id: i64) -> StoreResult<Option<Task>> {
        let task_data: Option<String> = conn.get(task_key(id)).await?;
        decode_record(task_data)
    }

    // Drops a login claim whose user record was never written
    async fn release_stale_claim(conn: &mut ConnectionManager, login: &str) -> StoreResult<()> {
        let claim = login_key(login);
        let owner: Option<i64> = conn.get(&claim).await?;
        let Some(owner) = owner else {
            return Ok(());
        };

        let owner_exists: bool = conn.exists(user_key(owner)).await?;
        if owner_exists {
            return Err(StoreError::DuplicateLogin(login.to_string()));
        }

        tracing::warn!("Releasing login '{}' claimed by missing user {}", login, owner);
        conn.del::<_, ()>(&claim).await?;
        Ok(())
    }
}

#[async_trait]
impl TaskStore for RedisStore {
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let mut conn = self.conn.clone();
        Self::load_user(&mut conn, id).await
    }

    async fn find_user_by_login(&self, login: &str) -> StoreResult<Option<User>> {
        let mut conn = self.conn.clone();
        let id: Option<i64> = conn.get(login_key(login)).await?;
        match id {
            Some(id) => Self::load_user(&mut conn, id).await,
            None => Ok(None),
        }
    }

    async fn create_user(&self, login: &str, password: &str, role: Role) -> StoreResult<User> {
        let mut conn = self.conn.clone();
        Self::release_stale_claim(&mut conn, login).await?;

        let id: i64 = conn.incr(USER_SEQ, 1).await?;
        let claim = login_key(login);
        let claimed: bool = conn.set_nx(&claim, id).await?;
        if !claimed {
            return Err(StoreError::DuplicateLogin(login.to_string()));
        }

        let user = User {
            id,
            login: login.to_string(),
            password: password.to_string(),
            role,
        };
        let record = encode_record(&user)?;

        let written: redis::RedisResult<()> = redis::pipe()
            .atomic()
            .set(user_key(id), record)
            .ignore()
            .sadd(role_key(role), id)
            .ignore()
            .query_async(&mut conn)
            .await;

        if let Err(e) = written {
            if let Err(release) = conn.del::<_, ()>(&claim).await {
                tracing::error!("Failed to release login '{}' after write error: {}", login, release);
            }
            return Err(e.into());
        }

        tracing::debug!("Stored user {} with role {}", id, role);
        Ok(user)
    }

    async fn list_users(&self, role: Role) -> StoreResult<Vec<User>> {
        let mut conn = self.conn.clone();
        let mut ids: Vec<i64> = conn.smembers(role_key(role)).await?;
        ids.sort_unstable();

        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            match Self::load_user(&mut conn, id).await? {
                Some(user) => users.push(user),
                None => tracing::warn!("User {} indexed under role {} but missing", id, role),
            }
        }
        Ok(users)
    }

    async fn create_task(&self, task: NewTask) -> StoreResult<Task> {
        let mut conn = self.conn.clone();
        let assignee_exists: bool = conn.exists(user_key(task.assigned_to)).await?;
        if !assignee_exists {
            return Err(StoreError::UnknownUser(task.assigned_to));
        }

        let id: i64 = conn.incr(TASK_SEQ, 1).await?;
        let assigned_to = task.assigned_to;
        let task = Task {
            id,
            title: task.title,
            description: task.description,
            status: TaskStatus::Backlog,
            due_date: task.due_date,
            assigned_to: Some(assigned_to),
            created_at: now(),
        };

        redis::pipe()
            .atomic()
            .set(task_key(id), encode_record(&task)?)
            .ignore()
            .sadd(TASK_IDS, id)
            .ignore()
            .sadd(assigned_key(assigned_to), id)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;

        tracing::debug!("Stored task {}", id);
        Ok(task)
    }

    async fn get_task(&self, id: i64) -> StoreResult<Option<Task>> {
        let mut conn = self.conn.clone();
        Self::load_task(&mut conn, id).await
    }

    async fn list_tasks(&self, filter: TaskFilter) -> StoreResult<Vec<TaskView>> {
        let mut conn = self.conn.clone();
        let ids: Vec<i64> = match filter {
            TaskFilter::All => conn.smembers(TASK_IDS).await?,
            TaskFilter::AssignedTo(user_id) => conn.smembers(assigned_key(user_id)).await?,
        };

        let mut logins: HashMap<i64, Option<String>> = HashMap::new();
        let mut views = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(task) = Self::load_task(&mut conn, id).await? else {
                tracing::warn!("Task {} indexed but missing", id);
                continue;
            };

            let assigned_login = match task.assigned_to {
                Some(user_id) => {
                    if !logins.contains_key(&user_id) {
                        let login = Self::load_user(&mut conn, user_id).await?.map(|u| u.login);
                        logins.insert(user_id, login);
                    }
                    logins.get(&user_id).cloned().flatten()
                }
                None => None,
            };
            views.push(TaskView { task, assigned_login });
        }

        sort_newest_first(&mut views);
        Ok(views)
    }

    async fn update_status(&self, id: i64, status: TaskStatus) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let Some(mut task) = Self::load_task(&mut conn, id).await? else {
            return Ok(false);
        };

        task.status = status;
        conn.set::<_, _, ()>(task_key(id), encode_record(&task)?).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_documented_layout() {
        assert_eq!(user_key(3), "user:3");
        assert_eq!(login_key("intern1"), "user_login:intern1");
        assert_eq!(role_key(Role::Intern), "users:role:intern");
        assert_eq!(task_key(9), "task:9");
        assert_eq!(assigned_key(3), "tasks:assigned:3");
    }

    #[test]
    fn user_record_reads_back() {
        let user = User {
            id: 1,
            login: "admin".to_string(),
            password: "admin123".to_string(),
            role: Role::Admin,
        };

        let data = encode_record(&user).unwrap();
        let back: Option<User> = decode_record(Some(data)).unwrap();
        assert_eq!(back, Some(user));
    }

    #[test]
    fn missing_record_decodes_to_none() {
        let back: Option<Task> = decode_record(None).unwrap();
        assert_eq!(back, None);
    }

    #[test]
    fn corrupt_record_is_reported() {
        let err = decode_record::<User>(Some("{\"id\":".to_string())).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    // Needs a disposable Redis database; run with
    // REDIS_TEST_URL=redis://127.0.0.1/15 cargo test -- --ignored
    async fn live_store() -> (RedisStore, ConnectionManager) {
        let url = std::env::var("REDIS_TEST_URL")
            .unwrap_or_else(|_| "redis://127.0.0.1/15".to_string());
        let client = Client::open(url).unwrap();
        let store = RedisStore::connect(client).await.unwrap();
        let mut conn = store.conn.clone();
        redis::cmd("FLUSHDB").query_async::<_, ()>(&mut conn).await.unwrap();
        (store, conn)
    }

    #[tokio::test]
    #[ignore]
    async fn live_users_and_tasks_round_trip() {
        let (store, _) = live_store().await;

        let intern = store.create_user("anna", "pw", Role::Intern).await.unwrap();
        let err = store.create_user("anna", "pw", Role::Intern).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateLogin(_)));
        assert_eq!(store.authenticate("anna", "pw").await.unwrap(), Some(intern.clone()));

        let task = store
            .create_task(NewTask {
                title: "Live".to_string(),
                description: String::new(),
                due_date: None,
                assigned_to: intern.id,
            })
            .await
            .unwrap();
        assert!(store.update_status(task.id, TaskStatus::InProgress).await.unwrap());

        let listed = store.list_tasks(TaskFilter::AssignedTo(intern.id)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].task.status, TaskStatus::InProgress);
        assert_eq!(listed[0].assigned_login.as_deref(), Some("anna"));
    }

    #[tokio::test]
    #[ignore]
    async fn live_stale_login_claim_is_recovered() {
        let (store, mut conn) = live_store().await;
        conn.set::<_, _, ()>(login_key("intern1"), 999).await.unwrap();

        assert_eq!(store.find_user_by_login("intern1").await.unwrap(), None);
        let user = store.create_user("intern1", "intern123", Role::Intern).await.unwrap();

        assert_eq!(store.find_user_by_login("intern1").await.unwrap(), Some(user));
    }
}
