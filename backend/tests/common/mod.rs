//! Shared helpers for the endpoint tests.

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use taskboard_server::{
    app_state::AppState,
    data_access::{
        memory_store::MemoryStore,
        task_repository::TaskRepository,
        task_store::{StoreError, TaskStore},
    },
    map_routes,
    task::Task,
    task_list_query::{TaskFilter, TaskPage},
};
use tower::ServiceExt;
use uuid::Uuid;

/// Wraps a `MemoryStore` and counts every call that reaches the store.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl TaskStore for CountingStore {
    fn get(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        self.hit();
        self.inner.get(id)
    }

    fn put(&self, task: &Task) -> Result<(), StoreError> {
        self.hit();
        self.inner.put(task)
    }

    fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.hit();
        self.inner.delete(id)
    }

    fn scan(&self, filter: &TaskFilter) -> Result<TaskPage, StoreError> {
        self.hit();
        self.inner.scan(filter)
    }
}

/// A store whose every call fails, for the 500 path.
pub struct BrokenStore;

impl TaskStore for BrokenStore {
    fn get(&self, _: Uuid) -> Result<Option<Task>, StoreError> {
        Err(StoreError::Redb("table is corrupt at page 7".into()))
    }

    fn put(&self, _: &Task) -> Result<(), StoreError> {
        Err(StoreError::Redb("table is corrupt at page 7".into()))
    }

    fn delete(&self, _: Uuid) -> Result<bool, StoreError> {
        Err(StoreError::Redb("table is corrupt at page 7".into()))
    }

    fn scan(&self, _: &TaskFilter) -> Result<TaskPage, StoreError> {
        Err(StoreError::Redb("table is corrupt at page 7".into()))
    }
}

pub struct TestContext {
    pub app: Router,
    pub store: Arc<CountingStore>,
}

pub fn app_with_store(store: Arc<dyn TaskStore>, default_page_size: usize) -> Router {
    map_routes(Arc::new(AppState {
        tasks: TaskRepository::new(store),
        default_page_size,
        max_page_size: 1000,
    }))
}

pub fn setup() -> TestContext {
    setup_with_page_size(100)
}

pub fn setup_with_page_size(default_page_size: usize) -> TestContext {
    let store = Arc::new(CountingStore::default());
    let app = app_with_store(store.clone(), default_page_size);
    TestContext { app, store }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    read(response).await
}

pub async fn send_raw(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    read(response).await
}

async fn read(response: Response<Body>) -> TestResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    TestResponse { status, headers, body }
}

pub async fn create(app: &Router, body: Value) -> Value {
    let response = send(app, Method::POST, "/tasks", Some(body)).await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.body
}
