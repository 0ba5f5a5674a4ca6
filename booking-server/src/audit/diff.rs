//! 审计日志 JSON diff 计算
//!
//! 比较更新前后的 JSON 值，生成 `{"changes": [{field, from, to}]}`。
//! 嵌套对象按 `a.b` 路径递归展开，数组整体比较。

use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeSet;

/// 字段变更记录
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub from: Value,
    pub to: Value,
}

/// 审计快照配置
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// 要排除的字段（如 "id", "password_hash"）
    pub exclude_fields: &'static [&'static str],
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            exclude_fields: &["id"],
        }
    }
}

/// 获取资源的审计配置
pub fn get_config(resource_type: &str) -> AuditConfig {
    match resource_type {
        "user" => AuditConfig {
            exclude_fields: &["id", "password_hash", "avatar", "created_at"],
        },
        "appointment" => AuditConfig {
            exclude_fields: &["id", "created_at", "updated_at"],
        },
        "schedule_block" => AuditConfig {
            exclude_fields: &["id", "created_at"],
        },
        _ => AuditConfig::default(),
    }
}

fn diff_json_recursive(from: &Value, to: &Value, path: &str, changes: &mut Vec<FieldChange>) {
    match (from, to) {
        (Value::Object(from_obj), Value::Object(to_obj)) => {
            // BTreeSet 保证输出顺序稳定
            let keys: BTreeSet<&String> = from_obj.keys().chain(to_obj.keys()).collect();
            for key in keys {
                let field_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                let f = from_obj.get(key).unwrap_or(&Value::Null);
                let t = to_obj.get(key).unwrap_or(&Value::Null);
                diff_json_recursive(f, t, &field_path, changes);
            }
        }
        (f, t) => {
            if f != t {
                changes.push(FieldChange {
                    field: path.to_string(),
                    from: f.clone(),
                    to: t.clone(),
                });
            }
        }
    }
}

fn filtered_value<T: Serialize>(value: &T, exclude: &[&str]) -> Result<Value, serde_json::Error> {
    let mut json = serde_json::to_value(value)?;
    if let Value::Object(obj) = &mut json {
        for field in exclude {
            obj.remove(*field);
        }
    }
    Ok(json)
}

/// 创建 CREATE 操作的审计详情（过滤后的完整快照）
pub fn create_snapshot<T: Serialize>(value: &T, resource_type: &str) -> Value {
    let config = get_config(resource_type);
    filtered_value(value, config.exclude_fields).unwrap_or_else(|e| {
        tracing::error!("Failed to serialize audit snapshot: {:?}", e);
        json!({"error": "serialization_failed"})
    })
}

/// 创建 UPDATE 操作的审计详情（差异）
///
/// 返回 `{"changes": [{"field": "name", "from": "A", "to": "B"}, ...]}`
pub fn create_diff<T: Serialize>(from: &T, to: &T, resource_type: &str) -> Value {
    let config = get_config(resource_type);
    let (from_json, to_json) = match (
        filtered_value(from, config.exclude_fields),
        filtered_value(to, config.exclude_fields),
    ) {
        (Ok(f), Ok(t)) => (f, t),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!("Failed to serialize value for diff: {:?}", e);
            return json!({"error": "serialization_failed"});
        }
    };

    let mut changes = Vec::new();
    diff_json_recursive(&from_json, &to_json, "", &mut changes);

    if changes.is_empty() {
        json!({"changes": [], "note": "no_changes_detected"})
    } else {
        json!({"changes": changes})
    }
}

/// 创建 DELETE 操作的审计详情
pub fn create_delete_details(name: &str) -> Value {
    json!({"name": name})
}
