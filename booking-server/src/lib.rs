//! Booking Server - 美容院 / 诊所预约服务
//!
//! # 架构概述
//!
//! 面向客户、服务人员和管理员的预约管理 HTTP/JSON 服务：
//!
//! - **数据存储** (`store`): 内存数据表 + 演示数据
//! - **认证** (`auth`): JWT + Argon2 认证体系，按权限 / 角色授权
//! - **排期** (`booking`): 可用时段、状态流转、时段封锁、工作台统计
//! - **通知** (`notifications`): 新预约 / 取消 / 空位通知，未读计数
//! - **消息总线** (`message`): 进程内广播
//! - **审计** (`audit`): SHA256 哈希链审计日志
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! booking-server/src/
//! ├── core/           # 配置、状态、服务器、后台任务
//! ├── auth/           # JWT 认证、权限
//! ├── store/          # 内存存储、仓库、演示数据
//! ├── booking/        # 排期规则
//! ├── notifications/  # 通知中心
//! ├── message/        # 消息总线
//! ├── audit/          # 审计日志
//! ├── navigation.rs   # 导航菜单
//! ├── api/            # HTTP 路由和处理器
//! └── utils/          # 工具函数
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod booking;
pub mod core;
pub mod message;
pub mod navigation;
pub mod notifications;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use message::{BusMessage, EventType, MessageBus};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ErrorBody, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 审计日志宏
///
/// ```ignore
/// audit_log!(
///     state.audit_service,
///     AuditAction::ServiceCreated,
///     "service", &id,
///     operator_id = Some(current_user.id.to_string()),
///     operator_name = Some(current_user.name.clone()),
///     details = create_snapshot(&service, "service")
/// );
/// ```
#[macro_export]
macro_rules! audit_log {
    (
        $service:expr,
        $action:expr,
        $resource_type:expr, $resource_id:expr,
        operator_id = $operator_id:expr,
        operator_name = $operator_name:expr,
        details = $details:expr $(,)?
    ) => {
        $service
            .log(
                $action,
                $resource_type,
                $resource_id,
                $operator_id,
                $operator_name,
                $details,
            )
            .await
    };
}

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境
///
/// 1. 加载 `.env`
/// 2. 初始化日志 (`LOG_LEVEL` / `LOG_DIR`，生产环境使用 JSON 格式)
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    init_logger_with_file(
        &config.log_level,
        config.is_production(),
        config.log_dir.as_deref(),
    )
}

pub fn print_banner() {
    println!(
        r#"
    ____              __   _
   / __ )____  ____  / /__(_)___  ____ _
  / __  / __ \/ __ \/ //_/ / __ \/ __ `/
 / /_/ / /_/ / /_/ / ,< / / / / / /_/ /
/_____/\____/\____/_/|_/_/_/ /_/\__, /
                               /____/
    "#
    );
}
