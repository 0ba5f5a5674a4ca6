//! Schedule Block Repository

use chrono::NaiveDate;
use shared::models::ScheduleBlock;

use crate::store::Store;

/// Blocks of a professional on a date, sorted by time
pub async fn find_by_professional_date(
    store: &Store,
    professional_id: i64,
    date: NaiveDate,
) -> Vec<ScheduleBlock> {
    let mut list = store
        .blocks
        .filter(|b| b.professional_id == professional_id && b.date == date)
        .await;
    list.sort_by_key(|b| b.time);
    list
}

/// Remove every block of a professional on a date
pub async fn delete_day(
    store: &Store,
    professional_id: i64,
    date: NaiveDate,
) -> Vec<ScheduleBlock> {
    store
        .blocks
        .remove_where(|b| b.professional_id == professional_id && b.date == date)
        .await
}
