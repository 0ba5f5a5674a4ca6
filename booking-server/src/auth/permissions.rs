//! Permission Definitions
//!
//! Role + permission-profile model.
//!
//! ## 设计原则
//! - 客户和专业人员的日常操作 (预约、排班、个人资料) 由角色控制，无需权限
//! - 管理类操作按模块授权 (`<module>:manage`)
//! - `all` 和 admin 角色拥有所有权限

use shared::models::Role;

pub const SERVICES_MANAGE: &str = "services:manage";
pub const PRODUCTS_MANAGE: &str = "products:manage";
pub const PROFESSIONALS_MANAGE: &str = "professionals:manage";
pub const BRANCHES_MANAGE: &str = "branches:manage";
pub const USERS_MANAGE: &str = "users:manage";
pub const WAITING_LIST_MANAGE: &str = "waiting_list:manage";
pub const AUDIT_VIEW: &str = "audit:view";

/// Super permission
pub const ALL: &str = "all";

/// 可配置权限列表
pub const ALL_PERMISSIONS: &[&str] = &[
    SERVICES_MANAGE,
    PRODUCTS_MANAGE,
    PROFESSIONALS_MANAGE,
    BRANCHES_MANAGE,
    USERS_MANAGE,
    WAITING_LIST_MANAGE,
    AUDIT_VIEW,
];

// ── Role groups for `require_role` ──────────────────────────────────

pub const CLIENTS: &[Role] = &[Role::Client];
pub const PROFESSIONALS: &[Role] = &[Role::Professional];
pub const STAFF: &[Role] = &[Role::Professional, Role::Admin];

/// Default permission profile for a role
pub fn defaults_for(role: Role) -> Vec<String> {
    match role {
        Role::Admin => vec![ALL.to_string()],
        Role::Professional | Role::Client => vec![],
    }
}

/// Validate if a permission string is valid
pub fn is_valid_permission(permission: &str) -> bool {
    permission == ALL
        || ALL_PERMISSIONS.contains(&permission)
        || permission
            .strip_suffix(":*")
            .is_some_and(|prefix| ALL_PERMISSIONS.iter().any(|p| p.starts_with(&format!("{prefix}:"))))
}
