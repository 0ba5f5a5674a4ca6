//! 统一错误处理
//!
//! 错误类型定义在 `shared::error`，此处重新导出并补充服务端专用的转换：
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Service 42"))
//!
//! // 返回成功响应
//! Ok(Json(service))
//! ```

use axum::extract::multipart::MultipartError;

pub use shared::error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};

/// Multipart 解析错误 → 验证错误
///
/// `AppError` 定义在 shared crate，无法在这里实现 `From<MultipartError>`。
pub fn multipart_error(e: MultipartError) -> AppError {
    AppError::validation(format!("Multipart error: {}", e))
}
