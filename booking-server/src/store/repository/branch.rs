//! Branch Repository

use shared::error::ErrorCode;
use shared::models::{Branch, BranchCreate, BranchUpdate};

use crate::store::{RepoError, RepoResult, Store};

/// Find branch by name
pub async fn find_by_name(store: &Store, name: &str) -> Option<Branch> {
    store.branches.find(|b| b.name == name).await
}

/// Create a new branch
pub async fn create(store: &Store, data: BranchCreate) -> RepoResult<Branch> {
    if find_by_name(store, &data.name).await.is_some() {
        return Err(RepoError::duplicate(
            ErrorCode::AlreadyExists,
            format!("Branch '{}' already exists", data.name),
        ));
    }

    let branch = Branch {
        id: shared::util::snowflake_id(),
        name: data.name,
        address: data.address,
        phone: data.phone,
        is_active: true,
    };
    store.branches.insert(branch).await
}

/// Update a branch
pub async fn update(store: &Store, id: i64, data: BranchUpdate) -> RepoResult<Branch> {
    if let Some(ref new_name) = data.name
        && let Some(other) = find_by_name(store, new_name).await
        && other.id != id
    {
        return Err(RepoError::duplicate(
            ErrorCode::AlreadyExists,
            format!("Branch '{}' already exists", new_name),
        ));
    }

    store
        .branches
        .modify(id, |branch| {
            if let Some(name) = data.name {
                branch.name = name;
            }
            if let Some(address) = data.address {
                branch.address = address;
            }
            if data.phone.is_some() {
                branch.phone = data.phone;
            }
            if let Some(is_active) = data.is_active {
                branch.is_active = is_active;
            }
            Ok(())
        })
        .await
}

/// Hard delete a branch
///
/// Rejected while any professional's weekly schedule still works there.
pub async fn delete(store: &Store, id: i64) -> RepoResult<Branch> {
    store.branches.require(id).await?;

    let in_use = store
        .professionals
        .any(|p| {
            p.schedule
                .days()
                .iter()
                .any(|(_, day)| day.active && day.branch_id == Some(id))
        })
        .await;
    if in_use {
        return Err(RepoError::conflict(
            ErrorCode::BranchInUse,
            format!("Branch {} is used by a professional schedule", id),
        ));
    }

    store.branches.delete(id).await
}

/// Require an existing, active branch
pub async fn require_active(store: &Store, id: i64) -> RepoResult<Branch> {
    let branch = store.branches.require(id).await?;
    if !branch.is_active {
        return Err(RepoError::conflict(
            ErrorCode::BranchInactive,
            format!("Branch {} is inactive", id),
        ));
    }
    Ok(branch)
}
