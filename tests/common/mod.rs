//! Shared helpers for router-level tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use registry_api::config::load_with;
use registry_api::{app, apply_migrations, connect_pool, connect_pool_lazy, AppState, ServerConfig};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub fn config(database_url: &str, schema: &str) -> ServerConfig {
    let database_url = database_url.to_string();
    let schema = schema.to_string();
    load_with(move |key| match key {
        "DATABASE_URL" => Some(database_url.clone()),
        "REGISTRY_SCHEMA" => Some(schema.clone()),
        "REGISTRY_MAX_CONNECTIONS" => Some("2".into()),
        _ => None,
    })
    .unwrap()
}

/// Router over a pool that never connects. Only requests rejected before any
/// query runs give meaningful answers.
pub fn offline_app() -> Router {
    let config = config("postgres://registry@127.0.0.1:1/registry_offline", "public");
    let pool = connect_pool_lazy(&config).unwrap();
    app(AppState::new(pool, config.query))
}

pub struct TestDb {
    pub app: Router,
    pub pool: PgPool,
    pub schema: String,
}

impl TestDb {
    /// Fresh schema in `TEST_DATABASE_URL`, or `None` when the variable is unset.
    pub async fn start() -> Option<TestDb> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let schema = format!("reg_test_{}", uuid::Uuid::new_v4().simple());
        let config = config(&url, &schema);
        let pool = connect_pool(&config).await.unwrap();
        apply_migrations(&pool, &schema).await.unwrap();
        let app = app(AppState::new(pool.clone(), config.query));
        Some(TestDb { app, pool, schema })
    }

    pub async fn stop(self) {
        sqlx::query(&format!("DROP SCHEMA \"{}\" CASCADE", self.schema))
            .execute(&self.pool)
            .await
            .unwrap();
        self.pool.close().await;
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = send(&self.app, Method::GET, uri, None).await;
        (status, body)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, HeaderMap, Value) {
        send(&self.app, Method::POST, uri, Some(body)).await
    }

    /// POST a new row and return its id.
    pub async fn create(&self, uri: &str, body: Value) -> i64 {
        let (status, _, body) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().unwrap()
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = send(&self.app, Method::DELETE, uri, None).await;
        (status, body)
    }
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, HeaderMap, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, headers, value)
}

pub fn ids(list: &Value, key: &str) -> Vec<i64> {
    list[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect()
}

pub fn names(list: &Value) -> Vec<String> {
    list["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap().to_string())
        .collect()
}
