//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{Router, middleware};
use http::{HeaderName, HeaderValue};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::audit::AuditAction;
use crate::auth::require_auth;
use crate::core::{Config, Result, ServerError, ServerState};

/// 请求 ID 生成器
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    tracing::info!(target: "http_access", elapsed_ms, "{} {} {}", method, uri, status);

    response
}

/// 注册所有路由 (无中间件、无状态)
pub fn build_router() -> Router<ServerState> {
    Router::<ServerState>::new()
        // 公共 / 会话
        .merge(crate::api::health::router())
        .merge(crate::api::auth::router())
        .merge(crate::api::navigation::router())
        .merge(crate::api::notifications::router())
        .merge(crate::api::profile::router())
        .merge(crate::api::upload::router())
        // 目录
        .merge(crate::api::services::router())
        .merge(crate::api::products::router())
        .merge(crate::api::branches::router())
        .merge(crate::api::professionals::router())
        // 预约
        .merge(crate::api::appointments::router())
        .merge(crate::api::dashboard::router())
        .merge(crate::api::schedule::router())
        .merge(crate::api::waiting_list::router())
        // 管理
        .merge(crate::api::users::router())
        .merge(crate::api::audit_log::router())
        .merge(crate::api::sync::router())
}

/// 构建完整应用 (路由 + 中间件 + 状态)
///
/// HTTP 服务器与集成测试 (oneshot) 共用
pub fn build_app(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    build_router()
        // JWT 认证 - require_auth 内部跳过公共路由，注入 CurrentUser
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        // ========== Tower HTTP Middleware (自外向内) ==========
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    HeaderName::from_static("x-request-id"),
                    XRequestId,
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(log_request))
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::with_status_code(
                    http::StatusCode::REQUEST_TIMEOUT,
                    timeout,
                )),
        )
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// 使用已有状态创建服务器 (与 oneshot 共享)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let tasks = state.start_background_tasks();
        let app = build_app(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Booking server starting on {}", addr);

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        let grace = Duration::from_millis(self.config.shutdown_timeout_ms);
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
            shutdown_handle.graceful_shutdown(Some(grace));
        });

        let served = axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await;

        state.message_bus.shutdown();
        tasks.shutdown().await;

        if let Err(e) = state.audit_service.log_sync(
            AuditAction::SystemShutdown,
            "system",
            "server",
            serde_json::json!({ "epoch": &state.epoch }),
        ) {
            tracing::error!(error = %e, "Failed to record shutdown audit entry");
        }

        served.map_err(ServerError::Io)?;
        tracing::info!("Server stopped");
        Ok(())
    }
}
