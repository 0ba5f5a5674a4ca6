//! 预约引擎
//!
//! - [`availability`] - 可用时段计算 (分钟区间运算)
//! - [`transitions`] - 预约状态流转表
//! - [`blocks`] - 时段封锁规划 (全有或全无)
//! - [`dashboard`] - 专业人员日视图与统计
//! - [`history`] - 客户预约列表 (即将到来 / 历史)
//! - [`scheduler`] - 基于存储的预约 / 取消 / 状态变更 / 封锁流程

pub mod availability;
pub mod blocks;
pub mod dashboard;
pub mod history;
pub mod scheduler;
pub mod transitions;

pub use scheduler::{Booked, StatusChange};
