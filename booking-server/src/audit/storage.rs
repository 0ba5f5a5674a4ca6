//! 审计日志内存存储层
//!
//! Append-only 设计，没有任何删除/更新接口。
//! SHA256 哈希链确保防篡改。

use std::sync::Arc;

use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::types::{AuditAction, AuditChainBreak, AuditChainVerification, AuditEntry, AuditQuery};

/// 哈希链起点
const GENESIS_HASH: &str = "genesis";

/// 存储错误
#[derive(Debug, Error)]
pub enum AuditStorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AuditStorageResult<T> = Result<T, AuditStorageError>;

impl From<AuditStorageError> for shared::error::AppError {
    fn from(err: AuditStorageError) -> Self {
        shared::error::AppError::internal(err.to_string())
    }
}

/// 审计日志存储
///
/// Append-only 设计：
/// - 仅提供 `append` / `query` / `verify_chain`
/// - 没有 delete/update 接口
/// - 写锁内完成 读取尾部 → 计算哈希 → 追加，序列号不会冲突
#[derive(Clone, Default)]
pub struct AuditStorage {
    entries: Arc<RwLock<Vec<AuditEntry>>>,
}

impl AuditStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条审计日志
    pub fn append(
        &self,
        action: AuditAction,
        resource_type: String,
        resource_id: String,
        operator_id: Option<String>,
        operator_name: Option<String>,
        details: serde_json::Value,
    ) -> AuditStorageResult<AuditEntry> {
        let mut entries = self.entries.write();

        let (id, prev_hash) = match entries.last() {
            Some(last) => (last.id + 1, last.curr_hash.clone()),
            None => (1, GENESIS_HASH.to_string()),
        };

        let timestamp = shared::util::now_millis();
        let mut entry = AuditEntry {
            id,
            timestamp,
            action,
            resource_type,
            resource_id,
            operator_id,
            operator_name,
            details,
            prev_hash,
            curr_hash: String::new(),
        };
        entry.curr_hash = compute_audit_hash(&entry)?;

        entries.push(entry.clone());
        Ok(entry)
    }

    /// 查询审计日志（倒序，最新在前）
    pub fn query(&self, q: &AuditQuery) -> (Vec<AuditEntry>, u64) {
        let entries = self.entries.read();
        let matched: Vec<&AuditEntry> = entries
            .iter()
            .rev()
            .filter(|e| q.from.is_none_or(|from| e.timestamp >= from))
            .filter(|e| q.to.is_none_or(|to| e.timestamp <= to))
            .filter(|e| q.action.is_none_or(|a| e.action == a))
            .filter(|e| {
                q.operator_id
                    .as_deref()
                    .is_none_or(|op| e.operator_id.as_deref() == Some(op))
            })
            .filter(|e| {
                q.resource_type
                    .as_deref()
                    .is_none_or(|rt| e.resource_type == rt)
            })
            .collect();

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(q.offset)
            .take(q.limit)
            .cloned()
            .collect();
        (items, total)
    }

    /// 验证哈希链
    ///
    /// 检查每条记录的 prev_hash 是否等于前一条的 curr_hash，
    /// 并重新计算 curr_hash。`from`/`to` 按时间戳限定验证范围。
    pub fn verify_chain(
        &self,
        from: Option<i64>,
        to: Option<i64>,
    ) -> AuditStorageResult<AuditChainVerification> {
        let entries = self.entries.read();
        let mut breaks = Vec::new();
        let mut total_entries = 0u64;
        let mut expected_prev = GENESIS_HASH.to_string();

        for entry in entries.iter() {
            let in_range = from.is_none_or(|f| entry.timestamp >= f)
                && to.is_none_or(|t| entry.timestamp <= t);

            if in_range {
                total_entries += 1;
                let hash_mismatch = compute_audit_hash(entry)? != entry.curr_hash;
                if entry.prev_hash != expected_prev || hash_mismatch {
                    breaks.push(AuditChainBreak {
                        entry_id: entry.id,
                        expected_prev_hash: expected_prev.clone(),
                        actual_prev_hash: entry.prev_hash.clone(),
                        hash_mismatch,
                    });
                }
            }
            expected_prev = entry.curr_hash.clone();
        }

        Ok(AuditChainVerification {
            total_entries,
            chain_intact: breaks.is_empty(),
            breaks,
        })
    }

    /// 当前条目数
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    #[cfg(test)]
    pub(crate) fn tamper(&self, id: u64, f: impl FnOnce(&mut AuditEntry)) {
        if let Some(entry) = self.entries.write().iter_mut().find(|e| e.id == id) {
            f(entry);
        }
    }
}

/// 计算审计条目的 SHA256 哈希
///
/// 所有存储字段参与哈希，任何修改都会导致不匹配。
/// - 变长字段间用 `\x00` 分隔，防止 `("ab","cd")` 与 `("abc","d")` 碰撞
/// - 定长字段（u64/i64）用 LE 字节序
/// - Optional 字段用 `\x00`=None / `\x01`+bytes=Some 区分
/// - action 使用 serde 序列化（snake_case）
fn compute_audit_hash(entry: &AuditEntry) -> AuditStorageResult<String> {
    let mut hasher = Sha256::new();

    hasher.update(entry.prev_hash.as_bytes());
    hasher.update(b"\x00");

    hasher.update(entry.id.to_le_bytes());
    hasher.update(entry.timestamp.to_le_bytes());

    let action_str = serde_json::to_string(&entry.action)?;
    hasher.update(action_str.as_bytes());
    hasher.update(b"\x00");

    hasher.update(entry.resource_type.as_bytes());
    hasher.update(b"\x00");
    hasher.update(entry.resource_id.as_bytes());
    hasher.update(b"\x00");

    hash_optional(&mut hasher, entry.operator_id.as_deref());
    hash_optional(&mut hasher, entry.operator_name.as_deref());

    let details_json = serde_json::to_string(&entry.details)?;
    hasher.update(details_json.as_bytes());
    hasher.update(b"\x00");

    Ok(hex::encode(hasher.finalize()))
}

/// Optional 字段哈希：`\x00` = None, `\x01` + bytes + `\x00` = Some
fn hash_optional(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update(b"\x01");
            hasher.update(v.as_bytes());
        }
        None => {
            hasher.update(b"\x00");
        }
    }
    hasher.update(b"\x00");
}
