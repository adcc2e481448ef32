#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use taskboard::app::{router, AppState};
use taskboard::config::Config;
use taskboard::models::{NewTask, Role, Task, User};
use taskboard::services::{seed_accounts, MemoryStore, TaskStore};
use tower::ServiceExt;

/// A router over a seeded in-memory store, plus direct access to the store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config::in_memory();
        let store = Arc::new(MemoryStore::new());
        seed_accounts(store.as_ref(), &config.seed).await.unwrap();

        let router = router(AppState::new(store.clone(), config));
        Self { router, store }
    }

    pub async fn admin(&self) -> User {
        self.store.find_user_by_login("admin").await.unwrap().unwrap()
    }

    pub async fn intern(&self) -> User {
        self.store.find_user_by_login("intern1").await.unwrap().unwrap()
    }

    pub async fn add_intern(&self, login: &str) -> User {
        self.store.create_user(login, "pw", Role::Intern).await.unwrap()
    }

    pub async fn add_task(&self, title: &str, assigned_to: i64) -> Task {
        self.store
            .create_task(NewTask {
                title: title.to_string(),
                description: String::new(),
                due_date: None,
                assigned_to,
            })
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body).into_owned())
            })
        };
        (status, value)
    }
}
