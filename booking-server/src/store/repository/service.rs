//! Service Repository

use shared::error::ErrorCode;
use shared::models::{Service, ServiceCreate, ServiceUpdate};

use crate::store::{RepoError, RepoResult, Store};

/// Find all services (inactive ones only when asked)
pub async fn find_all(store: &Store, include_inactive: bool) -> Vec<Service> {
    let mut services = store
        .services
        .filter(|s| include_inactive || s.is_active)
        .await;
    services.sort_by(|a, b| a.name.cmp(&b.name));
    services
}

/// Find service by name
pub async fn find_by_name(store: &Store, name: &str) -> Option<Service> {
    store.services.find(|s| s.name == name).await
}

/// Create a new service
pub async fn create(store: &Store, data: ServiceCreate) -> RepoResult<Service> {
    if find_by_name(store, &data.name).await.is_some() {
        return Err(RepoError::duplicate(
            ErrorCode::AlreadyExists,
            format!("Service '{}' already exists", data.name),
        ));
    }

    let service = Service {
        id: shared::util::snowflake_id(),
        name: data.name,
        description: data.description,
        category: data.category,
        price: data.price,
        duration_minutes: data.duration_minutes,
        commission: data.commission,
        loyalty: data.loyalty.unwrap_or_default(),
        is_active: true,
    };
    store.services.insert(service).await
}

/// Update a service, returning `(before, after)`
pub async fn update(
    store: &Store,
    id: i64,
    data: ServiceUpdate,
) -> RepoResult<(Service, Service)> {
    let existing = store.services.require(id).await?;

    if let Some(ref new_name) = data.name
        && new_name != &existing.name
        && find_by_name(store, new_name).await.is_some()
    {
        return Err(RepoError::duplicate(
            ErrorCode::AlreadyExists,
            format!("Service '{}' already exists", new_name),
        ));
    }

    let updated = store
        .services
        .modify(id, |s| {
            if let Some(name) = data.name {
                s.name = name;
            }
            if data.description.is_some() {
                s.description = data.description;
            }
            if data.category.is_some() {
                s.category = data.category;
            }
            if let Some(price) = data.price {
                s.price = price;
            }
            if let Some(duration) = data.duration_minutes {
                s.duration_minutes = duration;
            }
            if let Some(commission) = data.commission {
                s.commission = commission;
            }
            if let Some(loyalty) = data.loyalty {
                s.loyalty = loyalty;
            }
            if let Some(is_active) = data.is_active {
                s.is_active = is_active;
            }
            Ok(())
        })
        .await?;
    Ok((existing, updated))
}

/// Hard delete a service
///
/// Rejected while a pending or confirmed appointment references it, or
/// while it is the only service a professional lists (an empty list
/// means "offers every service").
pub async fn delete(store: &Store, id: i64) -> RepoResult<Service> {
    let _guard = store.schedule_lock().await;
    store.services.require(id).await?;

    let in_use = store
        .appointments
        .any(|a| a.service_id == id && a.status.is_live())
        .await;
    if in_use {
        return Err(RepoError::conflict(
            ErrorCode::ServiceInUse,
            format!("Service {} has pending or confirmed appointments", id),
        ));
    }

    if let Some(sole) = store
        .professionals
        .find(|p| p.services == [id])
        .await
    {
        return Err(RepoError::conflict(
            ErrorCode::ServiceInUse,
            format!("Service {} is the only service offered by {}", id, sole.name),
        ));
    }

    // Drop from professionals' explicit service lists
    for professional in store.professionals.filter(|p| p.services.contains(&id)).await {
        store
            .professionals
            .modify(professional.id, |p| {
                p.services.retain(|s| *s != id);
                Ok(())
            })
            .await?;
    }

    store.services.delete(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal_macros::dec;
    use shared::models::{Appointment, AppointmentStatus, Professional, WeeklySchedule};

    fn create_req(name: &str) -> ServiceCreate {
        ServiceCreate {
            name: name.to_string(),
            description: None,
            category: None,
            price: dec!(25),
            duration_minutes: 30,
            commission: dec!(40),
            loyalty: None,
        }
    }

    async fn professional(store: &Store, id: i64, services: Vec<i64>) -> Professional {
        store
            .professionals
            .insert(Professional {
                id,
                user_id: id * 10,
                name: format!("Pro {id}"),
                specialty: None,
                services,
                schedule: WeeklySchedule::default(),
                is_active: true,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn delete_refuses_sole_offered_service() {
        let store = Store::new();
        let haircut = create(&store, create_req("Haircut")).await.unwrap();
        let beard = create(&store, create_req("Beard trim")).await.unwrap();
        let only_haircut = professional(&store, 1, vec![haircut.id]).await;
        professional(&store, 2, vec![haircut.id, beard.id]).await;

        let err = delete(&store, haircut.id).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict { code: ErrorCode::ServiceInUse, .. }));
        let kept = store.professionals.require(only_haircut.id).await.unwrap();
        assert_eq!(kept.services, vec![haircut.id]);
        assert!(!kept.offers(beard.id));

        // beard is never the only listed service, so it can go
        delete(&store, beard.id).await.unwrap();
        assert_eq!(
            store.professionals.require(2).await.unwrap().services,
            vec![haircut.id]
        );
    }

    #[tokio::test]
    async fn delete_refuses_service_with_live_appointment() {
        let store = Store::new();
        let haircut = create(&store, create_req("Haircut")).await.unwrap();
        store
            .appointments
            .insert(Appointment {
                id: 1,
                client_id: 100,
                professional_id: 1,
                service_id: haircut.id,
                branch_id: None,
                date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
                time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                duration_minutes: 30,
                status: AppointmentStatus::Confirmed,
                price: dec!(25),
                rating: None,
                notes: None,
                created_at: 0,
                updated_at: 0,
            })
            .await
            .unwrap();

        let err = delete(&store, haircut.id).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict { code: ErrorCode::ServiceInUse, .. }));
        assert!(store.services.get(haircut.id).await.is_some());
    }

    #[tokio::test]
    async fn delete_waits_for_schedule_lock() {
        let store = std::sync::Arc::new(Store::new());
        let beard = create(&store, create_req("Beard trim")).await.unwrap();

        let guard = store.schedule_lock().await;
        let pending = tokio::spawn({
            let store = store.clone();
            async move { delete(&store, beard.id).await }
        });
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());
        assert!(store.services.get(beard.id).await.is_some());

        drop(guard);
        pending.await.unwrap().unwrap();
        assert!(store.services.get(beard.id).await.is_none());
    }
}
