//! User Repository

use shared::error::ErrorCode;
use shared::models::{Preferences, ProfileUpdate, Role, User, UserCreate, UserUpdate};

use crate::store::{RepoError, RepoResult, Store};

/// Find user by email (case-insensitive)
pub async fn find_by_email(store: &Store, email: &str) -> Option<User> {
    let email = email.trim().to_lowercase();
    store.users.find(|u| u.email == email).await
}

/// All active administrators
pub async fn find_admins(store: &Store) -> Vec<User> {
    store
        .users
        .filter(|u| u.role == Role::Admin && u.is_active)
        .await
}

/// Create a new user with an already hashed password
pub async fn create(store: &Store, data: UserCreate, password_hash: String) -> RepoResult<User> {
    let email = data.email.trim().to_lowercase();
    if find_by_email(store, &email).await.is_some() {
        return Err(RepoError::duplicate(
            ErrorCode::EmailExists,
            format!("Email '{}' is already registered", email),
        ));
    }

    let user = User {
        id: shared::util::snowflake_id(),
        name: data.name.trim().to_string(),
        email,
        phone: data.phone,
        role: data.role,
        permissions: data.permissions,
        preferences: Preferences::default(),
        avatar: None,
        loyalty_points: 0,
        is_active: true,
        password_hash,
        created_at: shared::util::now_millis(),
    };
    store.users.insert(user).await
}

/// Update own profile (name / email / phone)
pub async fn update_profile(store: &Store, id: i64, data: ProfileUpdate) -> RepoResult<User> {
    let new_email = data.email.map(|e| e.trim().to_lowercase());

    if let Some(ref email) = new_email
        && let Some(other) = find_by_email(store, email).await
        && other.id != id
    {
        return Err(RepoError::duplicate(
            ErrorCode::EmailExists,
            format!("Email '{}' is already registered", email),
        ));
    }

    store
        .users
        .modify(id, |user| {
            if let Some(name) = data.name {
                user.name = name.trim().to_string();
            }
            if let Some(email) = new_email {
                user.email = email;
            }
            if data.phone.is_some() {
                user.phone = data.phone;
            }
            Ok(())
        })
        .await
}

/// Admin update of role / permissions / active flag
pub async fn update_access(store: &Store, id: i64, data: UserUpdate) -> RepoResult<User> {
    store
        .users
        .modify(id, |user| {
            if let Some(role) = data.role {
                user.role = role;
            }
            if let Some(permissions) = data.permissions {
                user.permissions = permissions;
            }
            if let Some(is_active) = data.is_active {
                user.is_active = is_active;
            }
            Ok(())
        })
        .await
}

/// Add loyalty points (saturating)
pub async fn add_loyalty_points(store: &Store, id: i64, points: u32) -> RepoResult<User> {
    store
        .users
        .modify(id, |user| {
            user.loyalty_points = user.loyalty_points.saturating_add(points);
            Ok(())
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req(email: &str) -> UserCreate {
        UserCreate {
            name: "Ana".to_string(),
            email: email.to_string(),
            phone: None,
            password: "secret-password".to_string(),
            role: Role::Client,
            permissions: vec![],
        }
    }

    #[tokio::test]
    async fn email_is_unique_and_case_insensitive() {
        let store = Store::new();
        let user = create(&store, create_req("Ana@Example.com"), "hash".into())
            .await
            .unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert!(find_by_email(&store, "ANA@example.com").await.is_some());

        let err = create(&store, create_req("ana@example.com"), "hash".into())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate { code: ErrorCode::EmailExists, .. }));
    }

    #[tokio::test]
    async fn profile_email_change_checks_other_users() {
        let store = Store::new();
        let ana = create(&store, create_req("ana@example.com"), "h".into()).await.unwrap();
        create(&store, create_req("bea@example.com"), "h".into()).await.unwrap();

        // keeping own email is fine
        let same = ProfileUpdate {
            email: Some("ana@example.com".into()),
            ..Default::default()
        };
        assert!(update_profile(&store, ana.id, same).await.is_ok());

        let taken = ProfileUpdate {
            email: Some("bea@example.com".into()),
            ..Default::default()
        };
        assert!(update_profile(&store, ana.id, taken).await.is_err());
    }
}
