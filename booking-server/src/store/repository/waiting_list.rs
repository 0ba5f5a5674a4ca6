//! Waiting List Repository

use chrono::NaiveDate;
use shared::error::ErrorCode;
use shared::models::{WaitingListEntry, WaitingListJoin, WaitingStatus};

use crate::store::{RepoError, RepoResult, Store};

/// Entries for a date, oldest first
pub async fn find_by_date(store: &Store, date: NaiveDate) -> Vec<WaitingListEntry> {
    let mut list = store.waiting_list.filter(|e| e.date == date).await;
    list.sort_by_key(|e| e.created_at);
    list
}

/// Entries of a client, newest date first
pub async fn find_by_client(store: &Store, client_id: i64) -> Vec<WaitingListEntry> {
    let mut list = store
        .waiting_list
        .filter(|e| e.client_id == client_id)
        .await;
    list.sort_by(|a, b| b.date.cmp(&a.date).then(a.created_at.cmp(&b.created_at)));
    list
}

/// Join the waiting list; one active entry per client, date and professional
pub async fn join(
    store: &Store,
    client_id: i64,
    data: WaitingListJoin,
) -> RepoResult<WaitingListEntry> {
    let duplicate = store
        .waiting_list
        .any(|e| {
            e.client_id == client_id
                && e.date == data.date
                && e.professional_id == data.professional_id
                && e.status.is_active()
        })
        .await;
    if duplicate {
        return Err(RepoError::duplicate(
            ErrorCode::WaitingEntryExists,
            format!("Already on the waiting list for {}", data.date),
        ));
    }

    let entry = WaitingListEntry {
        id: shared::util::snowflake_id(),
        client_id,
        date: data.date,
        professional_id: data.professional_id,
        service_id: data.service_id,
        notes: data.notes,
        status: WaitingStatus::Waiting,
        created_at: shared::util::now_millis(),
    };
    store.waiting_list.insert(entry).await
}

/// Mark WAITING entries matching a freed slot as NOTIFIED, returning them
///
/// Entries that left the WAITING state since the lookup are skipped.
pub async fn notify_matching(
    store: &Store,
    date: NaiveDate,
    professional_id: i64,
) -> Vec<WaitingListEntry> {
    let matching = store
        .waiting_list
        .filter(|e| e.status == WaitingStatus::Waiting && e.matches(date, professional_id))
        .await;

    let mut notified = Vec::with_capacity(matching.len());
    for entry in matching {
        match notify_entry(store, entry.id).await {
            Ok(updated) => notified.push(updated),
            Err(e) => {
                tracing::debug!(entry_id = entry.id, error = %e, "Waiting list entry skipped");
            }
        }
    }
    notified
}

/// WAITING -> NOTIFIED for one entry, re-checked under the table lock
async fn notify_entry(store: &Store, id: i64) -> RepoResult<WaitingListEntry> {
    store
        .waiting_list
        .modify(id, |e| {
            if e.status != WaitingStatus::Waiting {
                return Err(RepoError::conflict(
                    ErrorCode::WaitingEntryNotFound,
                    format!("Waiting list entry {} is {:?}", e.id, e.status),
                ));
            }
            e.status = WaitingStatus::Notified;
            Ok(())
        })
        .await
}

/// A booking by the client fulfils their active entries for that date
pub async fn mark_booked(
    store: &Store,
    client_id: i64,
    date: NaiveDate,
    professional_id: i64,
) -> RepoResult<Vec<WaitingListEntry>> {
    let matching = store
        .waiting_list
        .filter(|e| e.client_id == client_id && e.status.is_active() && e.matches(date, professional_id))
        .await;

    let mut booked = Vec::with_capacity(matching.len());
    for entry in matching {
        booked.push(
            store
                .waiting_list
                .modify(entry.id, |e| {
                    e.status = WaitingStatus::Booked;
                    Ok(())
                })
                .await?,
        );
    }
    Ok(booked)
}

/// Client leaves the waiting list
pub async fn cancel(store: &Store, id: i64) -> RepoResult<WaitingListEntry> {
    store
        .waiting_list
        .modify(id, |e| {
            e.status = WaitingStatus::Cancelled;
            Ok(())
        })
        .await
}
