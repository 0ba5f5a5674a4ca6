//! Audit Log API Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::audit::{AuditChainVerification, AuditListResponse, AuditQuery};
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/audit - 查询审计日志
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<AuditListResponse>> {
    Ok(Json(state.audit_service.query(&query)))
}

/// 审计链验证查询参数
#[derive(Debug, serde::Deserialize)]
pub struct VerifyQuery {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

/// GET /api/audit/verify - 验证审计链完整性
pub async fn verify_chain(
    State(state): State<ServerState>,
    Query(query): Query<VerifyQuery>,
) -> AppResult<Json<AuditChainVerification>> {
    let verification = state.audit_service.verify_chain(query.from, query.to)?;
    Ok(Json(verification))
}
