//! 导航菜单
//!
//! 每个菜单项声明允许的角色和可选的权限；返回调用者可见的菜单项。

use shared::models::{NavItem, Role};

use crate::auth::CurrentUser;
use crate::auth::permissions::{
    AUDIT_VIEW, BRANCHES_MANAGE, CLIENTS, PRODUCTS_MANAGE, PROFESSIONALS, PROFESSIONALS_MANAGE,
    SERVICES_MANAGE, STAFF, USERS_MANAGE, WAITING_LIST_MANAGE,
};

const EVERYONE: &[Role] = &[Role::Client, Role::Professional, Role::Admin];

/// 菜单项定义
struct MenuEntry {
    key: &'static str,
    label: &'static str,
    path: &'static str,
    roles: &'static [Role],
    permission: Option<&'static str>,
}

const MENU: &[MenuEntry] = &[
    MenuEntry { key: "book", label: "Book an appointment", path: "/book", roles: CLIENTS, permission: None },
    MenuEntry { key: "my_appointments", label: "My appointments", path: "/appointments", roles: CLIENTS, permission: None },
    MenuEntry { key: "waiting_list", label: "Waiting list", path: "/waiting-list", roles: CLIENTS, permission: None },
    MenuEntry { key: "dashboard", label: "Dashboard", path: "/dashboard", roles: STAFF, permission: None },
    MenuEntry { key: "schedule", label: "My schedule", path: "/settings/schedule", roles: PROFESSIONALS, permission: None },
    MenuEntry { key: "services", label: "Services", path: "/admin/services", roles: EVERYONE, permission: Some(SERVICES_MANAGE) },
    MenuEntry { key: "products", label: "Products", path: "/admin/products", roles: EVERYONE, permission: Some(PRODUCTS_MANAGE) },
    MenuEntry { key: "professionals", label: "Professionals", path: "/admin/professionals", roles: EVERYONE, permission: Some(PROFESSIONALS_MANAGE) },
    MenuEntry { key: "branches", label: "Branches", path: "/admin/branches", roles: EVERYONE, permission: Some(BRANCHES_MANAGE) },
    MenuEntry { key: "waiting_list_admin", label: "Waiting lists", path: "/admin/waiting-list", roles: EVERYONE, permission: Some(WAITING_LIST_MANAGE) },
    MenuEntry { key: "users", label: "Users", path: "/admin/users", roles: EVERYONE, permission: Some(USERS_MANAGE) },
    MenuEntry { key: "audit", label: "Audit log", path: "/admin/audit", roles: EVERYONE, permission: Some(AUDIT_VIEW) },
    MenuEntry { key: "profile", label: "Profile", path: "/profile", roles: EVERYONE, permission: None },
];

impl MenuEntry {
    fn visible_to(&self, user: &CurrentUser) -> bool {
        user.has_role(self.roles) && self.permission.is_none_or(|p| user.has_permission(p))
    }
}

/// 调用者可见的菜单项 (定义顺序)
pub fn menu_for(user: &CurrentUser) -> Vec<NavItem> {
    MENU.iter()
        .filter(|entry| entry.visible_to(user))
        .map(|entry| NavItem {
            key: entry.key.to_string(),
            label: entry.label.to_string(),
            path: entry.path.to_string(),
        })
        .collect()
}
