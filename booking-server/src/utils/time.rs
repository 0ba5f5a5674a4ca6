//! 时间工具函数
//!
//! 日期统一为 `YYYY-MM-DD`，时间统一为 `HH:MM`，使用服务器本地时区。

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析时间字符串 (HH:MM)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    shared::models::hhmm::parse(time)
        .ok_or_else(|| AppError::validation(format!("Invalid time format: {}", time)))
}

/// 当前本地日期时间
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

/// 今天 (本地时区)
pub fn today() -> NaiveDate {
    now_local().date()
}

/// 验证日期范围 from <= to
pub fn validate_range(from: NaiveDate, to: NaiveDate) -> AppResult<()> {
    if from > to {
        return Err(AppError::validation(format!(
            "Invalid range: {} is after {}",
            from, to
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso() {
        assert_eq!(
            parse_date("2026-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
        assert!(parse_date("01/03/2026").is_err());
    }

    #[test]
    fn parse_time_accepts_hhmm() {
        assert_eq!(
            parse_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn range_must_be_ordered() {
        let a = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        assert!(validate_range(a, b).is_ok());
        assert!(validate_range(b, a).is_err());
    }
}
