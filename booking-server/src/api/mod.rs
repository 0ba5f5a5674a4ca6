//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录 / 会话 / 登出
//! - [`navigation`] - 导航菜单
//! - [`notifications`] - 通知摘要与 SSE 推送
//! - [`profile`] - 个人资料、偏好、密码、头像
//! - [`upload`] - 图片上传
//! - [`services`] - 服务目录
//! - [`products`] - 商品与库存
//! - [`branches`] - 门店
//! - [`professionals`] - 专业人员与排班
//! - [`appointments`] - 预约
//! - [`dashboard`] - 专业人员工作台
//! - [`schedule`] - 时段封锁
//! - [`waiting_list`] - 等候名单
//! - [`users`] - 用户管理
//! - [`audit_log`] - 审计日志
//! - [`sync`] - 同步状态

pub mod auth;
pub mod health;
pub mod navigation;
pub mod notifications;
pub mod profile;
pub mod upload;

// Catalog
pub mod branches;
pub mod products;
pub mod professionals;
pub mod services;

// Booking
pub mod appointments;
pub mod dashboard;
pub mod schedule;
pub mod waiting_list;

// Administration
pub mod audit_log;
pub mod sync;
pub mod users;

use shared::error::ErrorCode;

use crate::auth::CurrentUser;
use crate::utils::{AppError, AppResult};

/// 解析操作目标的专业人员
///
/// - 管理员: 必须通过 `requested` 指定
/// - 专业人员: 只能是自己 (`requested` 省略或等于自己的档案 ID)
pub(crate) fn target_professional(user: &CurrentUser, requested: Option<i64>) -> AppResult<i64> {
    if user.is_admin() {
        if let Some(id) = requested.or(user.professional_id) {
            return Ok(id);
        }
        return Err(AppError::validation("professional_id is required"));
    }

    let own = user
        .professional_id
        .ok_or_else(|| AppError::new(ErrorCode::NotAProfessional))?;
    match requested {
        Some(id) if id != own => Err(AppError::permission_denied(
            "Professionals can only manage their own schedule",
        )),
        _ => Ok(own),
    }
}
