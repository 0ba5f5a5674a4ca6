//! Professional Repository

use shared::error::ErrorCode;
use shared::models::{
    Professional, ProfessionalCreate, ProfessionalUpdate, WeeklySchedule,
};

use crate::store::{RepoError, RepoResult, Store};

/// Professional linked to a user account
pub async fn find_by_user(store: &Store, user_id: i64) -> Option<Professional> {
    store.professionals.find(|p| p.user_id == user_id).await
}

/// All professionals, optionally only active ones
pub async fn find_all(store: &Store, include_inactive: bool) -> Vec<Professional> {
    store
        .professionals
        .filter(|p| include_inactive || p.is_active)
        .await
}

/// Create a professional profile linked to an existing user
pub async fn create(store: &Store, data: ProfessionalCreate) -> RepoResult<Professional> {
    store.users.require(data.user_id).await?;
    if find_by_user(store, data.user_id).await.is_some() {
        return Err(RepoError::duplicate(
            ErrorCode::AlreadyExists,
            format!("User {} already has a professional profile", data.user_id),
        ));
    }
    for service_id in &data.services {
        store.services.require(*service_id).await?;
    }

    let professional = Professional {
        id: shared::util::snowflake_id(),
        user_id: data.user_id,
        name: data.name,
        specialty: data.specialty,
        services: data.services,
        schedule: data.schedule.unwrap_or_default(),
        is_active: true,
    };
    store.professionals.insert(professional).await
}

/// Update a professional profile
pub async fn update(store: &Store, id: i64, data: ProfessionalUpdate) -> RepoResult<Professional> {
    if let Some(ref services) = data.services {
        for service_id in services {
            store.services.require(*service_id).await?;
        }
    }

    store
        .professionals
        .modify(id, |p| {
            if let Some(name) = data.name {
                p.name = name;
            }
            if data.specialty.is_some() {
                p.specialty = data.specialty;
            }
            if let Some(services) = data.services {
                p.services = services;
            }
            if let Some(schedule) = data.schedule {
                p.schedule = schedule;
            }
            if let Some(is_active) = data.is_active {
                p.is_active = is_active;
            }
            Ok(())
        })
        .await
}

/// Replace the weekly schedule
pub async fn set_schedule(
    store: &Store,
    id: i64,
    schedule: WeeklySchedule,
) -> RepoResult<Professional> {
    store
        .professionals
        .modify(id, |p| {
            p.schedule = schedule;
            Ok(())
        })
        .await
}

/// Hard delete a professional
///
/// Rejected while pending or confirmed appointments exist; blocks go with it.
pub async fn delete(store: &Store, id: i64) -> RepoResult<Professional> {
    let _guard = store.schedule_lock().await;
    store.professionals.require(id).await?;

    let busy = store
        .appointments
        .any(|a| a.professional_id == id && a.status.is_live())
        .await;
    if busy {
        return Err(RepoError::conflict(
            ErrorCode::ProfessionalInUse,
            format!("Professional {} has live appointments", id),
        ));
    }

    store.blocks.remove_where(|b| b.professional_id == id).await;
    store.professionals.delete(id).await
}
