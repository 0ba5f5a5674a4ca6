//! 内存数据存储
//!
//! 每个实体一张 [`Table`]（`parking_lot::RwLock<BTreeMap>`），提供模拟 API 的
//! 异步访问函数：`list` / `get` / `insert` / `modify` / `delete`。
//!
//! 新记录只能通过 `insert` 写入，已占用的 id 返回 [`RepoError::Duplicate`]，
//! 已有记录只能通过 `modify` 修改。
//!
//! # 并发
//!
//! - 表锁是同步锁，只在单个访问函数内部持有，从不跨越 `.await`
//! - "先检查再写入" 的预约 / 封锁 / 删除流程通过 [`Store::schedule_lock`] 串行化

pub mod repository;
pub mod seed;

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use parking_lot::RwLock;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Appointment, Branch, Product, Professional, ScheduleBlock, Service, User, WaitingListEntry,
};
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

pub use seed::seed_demo_data;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{table} {id} not found")]
    NotFound {
        table: &'static str,
        id: i64,
        code: ErrorCode,
    },

    #[error("Duplicate: {message}")]
    Duplicate { code: ErrorCode, message: String },

    #[error("Conflict: {message}")]
    Conflict { code: ErrorCode, message: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl RepoError {
    pub fn duplicate(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Duplicate {
            code,
            message: message.into(),
        }
    }

    pub fn conflict(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { id, code, .. } => AppError::not_found_with(code, id),
            RepoError::Duplicate { code, message } | RepoError::Conflict { code, message } => {
                AppError::with_message(code, message)
            }
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// 可存入 [`Table`] 的实体
pub trait Entity: Clone + Send + Sync + 'static {
    /// 表名 (日志 / 错误信息)
    const TABLE: &'static str;
    /// 记录不存在时的错误码
    const NOT_FOUND: ErrorCode;

    fn id(&self) -> i64;
}

macro_rules! entity {
    ($ty:ty, $table:literal, $code:expr) => {
        impl Entity for $ty {
            const TABLE: &'static str = $table;
            const NOT_FOUND: ErrorCode = $code;

            fn id(&self) -> i64 {
                self.id
            }
        }
    };
}

entity!(User, "user", ErrorCode::UserNotFound);
entity!(Branch, "branch", ErrorCode::BranchNotFound);
entity!(Professional, "professional", ErrorCode::ProfessionalNotFound);
entity!(Service, "service", ErrorCode::ServiceNotFound);
entity!(Product, "product", ErrorCode::ProductNotFound);
entity!(Appointment, "appointment", ErrorCode::AppointmentNotFound);
entity!(ScheduleBlock, "schedule_block", ErrorCode::BlockNotFound);
entity!(WaitingListEntry, "waiting_list", ErrorCode::WaitingEntryNotFound);

/// 单个实体表 (按 id 排序)
pub struct Table<T> {
    rows: RwLock<BTreeMap<i64, T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<T: Entity> Table<T> {
    /// 全部记录
    pub async fn list(&self) -> Vec<T> {
        self.rows.read().values().cloned().collect()
    }

    /// 按 id 查询
    pub async fn get(&self, id: i64) -> Option<T> {
        self.rows.read().get(&id).cloned()
    }

    /// 按 id 查询，不存在时返回 [`RepoError::NotFound`]
    pub async fn require(&self, id: i64) -> RepoResult<T> {
        self.get(id).await.ok_or(RepoError::NotFound {
            table: T::TABLE,
            id,
            code: T::NOT_FOUND,
        })
    }

    /// 插入新记录，id 已存在时拒绝写入
    pub async fn insert(&self, row: T) -> RepoResult<T> {
        let id = row.id();
        match self.rows.write().entry(id) {
            Entry::Occupied(_) => Err(RepoError::duplicate(
                ErrorCode::AlreadyExists,
                format!("{} {} already exists", T::TABLE, id),
            )),
            Entry::Vacant(slot) => Ok(slot.insert(row).clone()),
        }
    }

    /// 删除并返回被删除的记录
    pub async fn delete(&self, id: i64) -> RepoResult<T> {
        self.rows.write().remove(&id).ok_or(RepoError::NotFound {
            table: T::TABLE,
            id,
            code: T::NOT_FOUND,
        })
    }

    /// 在写锁内原地修改一条记录
    ///
    /// 闭包返回错误时记录保持不变。
    pub async fn modify<F>(&self, id: i64, f: F) -> RepoResult<T>
    where
        F: FnOnce(&mut T) -> RepoResult<()>,
    {
        let mut rows = self.rows.write();
        let row = rows.get_mut(&id).ok_or(RepoError::NotFound {
            table: T::TABLE,
            id,
            code: T::NOT_FOUND,
        })?;
        let mut draft = row.clone();
        f(&mut draft)?;
        *row = draft.clone();
        Ok(draft)
    }

    /// 第一条满足条件的记录
    pub async fn find<P>(&self, pred: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows.read().values().find(|r| pred(r)).cloned()
    }

    /// 所有满足条件的记录
    pub async fn filter<P>(&self, pred: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows.read().values().filter(|r| pred(r)).cloned().collect()
    }

    /// 是否存在满足条件的记录
    pub async fn any<P>(&self, pred: P) -> bool
    where
        P: Fn(&T) -> bool,
    {
        self.rows.read().values().any(pred)
    }

    /// 删除所有满足条件的记录，返回被删除的记录
    pub async fn remove_where<P>(&self, pred: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        let mut rows = self.rows.write();
        let ids: Vec<i64> = rows.values().filter(|r| pred(r)).map(Entity::id).collect();
        ids.into_iter().filter_map(|id| rows.remove(&id)).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

/// 内存数据存储
#[derive(Default)]
pub struct Store {
    pub users: Table<User>,
    pub branches: Table<Branch>,
    pub professionals: Table<Professional>,
    pub services: Table<Service>,
    pub products: Table<Product>,
    pub appointments: Table<Appointment>,
    pub blocks: Table<ScheduleBlock>,
    pub waiting_list: Table<WaitingListEntry>,
    /// 串行化预约 / 封锁的 检查→写入 流程
    schedule_lock: Mutex<()>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取排期锁
    ///
    /// 持有期间其他预约 / 封锁请求等待，保证冲突检查与写入的原子性。
    pub async fn schedule_lock(&self) -> MutexGuard<'_, ()> {
        self.schedule_lock.lock().await
    }
}
