//! Data models
//!
//! Shared between booking-server and its clients (via API).
//! All IDs are `i64` snowflake ids, money is `Decimal`,
//! dates are `YYYY-MM-DD` and times of day are `HH:MM`.

pub mod appointment;
pub mod branch;
pub mod dashboard;
pub mod hhmm;
pub mod navigation;
pub mod notification;
pub mod product;
pub mod professional;
pub mod schedule_block;
pub mod service;
pub mod sync;
pub mod user;
pub mod waiting_list;

// Re-exports
pub use appointment::*;
pub use branch::*;
pub use dashboard::*;
pub use navigation::*;
pub use notification::*;
pub use product::*;
pub use professional::*;
pub use schedule_block::*;
pub use service::*;
pub use sync::*;
pub use user::*;
pub use waiting_list::*;
