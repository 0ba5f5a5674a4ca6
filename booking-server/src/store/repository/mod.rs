//! Repository Module
//!
//! 实体级 CRUD 与领域查询。通用的 list/get/insert/modify/delete 由 [`Table`](super::Table)
//! 提供，这里补充需要跨表检查或业务规则的操作。

pub mod appointment;
pub mod branch;
pub mod product;
pub mod professional;
pub mod schedule_block;
pub mod service;
pub mod user;
pub mod waiting_list;
