//! 集成测试公共工具
//!
//! 使用 `build_app` + `tower::ServiceExt::oneshot` 直接驱动路由，不绑定端口。

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use booking_server::core::{BackgroundTasks, build_app};
use booking_server::store::seed_demo_data;
use booking_server::utils::time::today;
use booking_server::{Config, ServerState};

pub const DEMO_PASSWORD: &str = "demo1234";
pub const ADMIN: &str = "admin@salon.local";
pub const CLIENT: &str = "lucia@example.com";
pub const CLIENT2: &str = "marco@example.com";
pub const PRO: &str = "carmen@salon.local";
pub const PRO2: &str = "diego@salon.local";

pub struct TestApp {
    pub state: ServerState,
    pub app: Router,
    /// 审计 worker + 通知中心
    pub tasks: BackgroundTasks,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut config = Config::from_env();
        config.slot_minutes = 30;
        config.enable_audit_log = true;
        let state = ServerState::new(config);
        seed_demo_data(&state.store, DEMO_PASSWORD)
            .await
            .expect("seed demo data");
        let tasks = state.start_background_tasks();
        let app = build_app(state.clone());
        Self { state, app, tasks }
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send("GET", uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, Some(token), None).await
    }

    /// 登录并返回 token
    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": DEMO_PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login {} failed: {}", email, body);
        body["token"].as_str().expect("token").to_string()
    }

    /// 按名称查找 id (列表接口)
    pub async fn id_by_name(&self, uri: &str, token: &str, name: &str) -> i64 {
        let (status, list) = self.get(uri, token).await;
        assert_eq!(status, StatusCode::OK);
        list.as_array()
            .and_then(|items| items.iter().find(|i| i["name"] == name))
            .and_then(|i| i["id"].as_i64())
            .unwrap_or_else(|| panic!("{} not found in {}", name, uri))
    }
}

/// 今天之后的下一个指定星期几
pub fn next(weekday: Weekday) -> NaiveDate {
    let mut date = today() + Days::new(1);
    while date.weekday() != weekday {
        date = date + Days::new(1);
    }
    date
}
