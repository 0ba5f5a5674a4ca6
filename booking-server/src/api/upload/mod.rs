//! Upload Routes
//!
//! 图片上传：返回 data URL，不落盘。

mod handler;

pub use handler::{ProcessedImage, process_image, read_file_field};

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Build upload router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/upload", post(handler::upload))
}
