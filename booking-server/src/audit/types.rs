//! 审计日志类型定义
//!
//! 所有条目不可变、不可删除，支持 SHA256 哈希链防篡改。

use serde::{Deserialize, Serialize};

/// 审计操作类型（枚举，非自由文本）
///
/// 按领域分组，确保每个敏感操作都有明确的类型标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // ═══ 系统生命周期 ═══
    /// 系统启动
    SystemStartup,
    /// 系统关闭
    SystemShutdown,

    // ═══ 认证 ═══
    /// 登录成功
    LoginSuccess,
    /// 登录失败
    LoginFailed,
    /// 登出
    Logout,
    /// 修改密码
    PasswordChanged,

    // ═══ 服务目录 ═══
    ServiceCreated,
    ServiceUpdated,
    ServiceDeleted,
    /// 服务价格变更
    ServicePriceChanged,

    // ═══ 商品 ═══
    ProductCreated,
    ProductUpdated,
    ProductDeleted,
    /// 商品价格变更
    ProductPriceChanged,
    /// 库存调整
    StockAdjusted,

    // ═══ 预约 ═══
    /// 新预约
    AppointmentCreated,
    /// 预约状态变更
    AppointmentStatusChanged,
    /// 时段封锁
    ScheduleBlocked,
    /// 解除封锁
    ScheduleUnblocked,
    /// 工作时间表变更
    ScheduleChanged,

    // ═══ 管理操作 ═══
    ProfessionalCreated,
    ProfessionalUpdated,
    ProfessionalDeleted,
    BranchCreated,
    BranchUpdated,
    BranchDeleted,
    /// 管理员创建账号
    UserCreated,
    /// 用户角色 / 权限 / 状态变更
    UserUpdated,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 审计日志条目（不可变）
///
/// - `prev_hash`: 前一条记录的哈希
/// - `curr_hash`: 当前记录的哈希（包含 prev_hash + 所有字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// 全局递增序列号（唯一标识）
    pub id: u64,
    /// 时间戳（Unix 毫秒）
    pub timestamp: i64,
    /// 操作类型
    pub action: AuditAction,
    /// 资源类型（如 "appointment", "service", "system"）
    pub resource_type: String,
    /// 资源 ID
    pub resource_id: String,
    /// 操作人 ID（系统事件为 None）
    pub operator_id: Option<String>,
    /// 操作人名称
    pub operator_name: Option<String>,
    /// 结构化详情（JSON）
    pub details: serde_json::Value,
    /// 前一条审计日志哈希
    pub prev_hash: String,
    /// 当前记录哈希（SHA256）
    pub curr_hash: String,
}

/// 审计日志查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    /// 起始时间（Unix 毫秒，含）
    pub from: Option<i64>,
    /// 截止时间（Unix 毫秒，含）
    pub to: Option<i64>,
    /// 操作类型过滤
    pub action: Option<AuditAction>,
    /// 操作人 ID 过滤
    pub operator_id: Option<String>,
    /// 资源类型过滤
    pub resource_type: Option<String>,
    /// 分页偏移
    #[serde(default)]
    pub offset: usize,
    /// 分页大小（默认 50）
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// 审计日志列表响应
#[derive(Debug, Serialize, Deserialize)]
pub struct AuditListResponse {
    pub items: Vec<AuditEntry>,
    pub total: u64,
}

/// 审计链验证结果
#[derive(Debug, Serialize, Deserialize)]
pub struct AuditChainVerification {
    /// 验证的记录总数
    pub total_entries: u64,
    /// 链是否完整
    pub chain_intact: bool,
    /// 断裂点列表
    pub breaks: Vec<AuditChainBreak>,
}

/// 审计链断裂点
#[derive(Debug, Serialize, Deserialize)]
pub struct AuditChainBreak {
    /// 断裂处的序列号
    pub entry_id: u64,
    /// 期望的 prev_hash
    pub expected_prev_hash: String,
    /// 实际的 prev_hash
    pub actual_prev_hash: String,
    /// 记录内容与 curr_hash 不符（记录被改写）
    #[serde(default)]
    pub hash_mismatch: bool,
}
