//! 通知模块
//!
//! [`NotificationCenter`] 把预约事件转换为按用户投递的通知。

pub mod center;

pub use center::NotificationCenter;
