//! Authentication Handlers
//!
//! Handles login, session restore and logout

use std::time::Duration;

use axum::{Extension, Json, extract::State};

use crate::AppError;
use crate::audit::AuditAction;
use crate::auth::CurrentUser;
use crate::auth::password::verify_password;
use crate::core::ServerState;
use crate::store::repository::{professional, user};

use shared::ErrorCode;
use shared::client::{LoginRequest, LoginResponse, SessionResponse, SessionSnapshot, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Login handler
///
/// Authenticates user credentials and returns a JWT token carrying the
/// `{id, role}` session snapshot
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = req.email.trim().to_lowercase();
    let account = user::find_by_email(&state.store, &email).await;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Check authentication result - unified error message to prevent email enumeration
    let account = match account {
        Some(u) => {
            let password_valid = verify_password(&req.password, &u.password_hash)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                state.audit_service.log(
                    AuditAction::LoginFailed, "auth", format!("user:{}", email),
                    None, None,
                    serde_json::json!({"reason": "invalid_credentials"}),
                ).await;
                tracing::warn!(email = %email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            // Only reported to callers holding the right password
            if !u.is_active {
                state.audit_service.log(
                    AuditAction::LoginFailed, "auth", format!("user:{}", email),
                    Some(u.id.to_string()), Some(u.name.clone()),
                    serde_json::json!({"reason": "account_disabled"}),
                ).await;
                tracing::warn!(email = %email, "Login rejected - account disabled");
                return Err(AppError::new(ErrorCode::AccountDisabled));
            }

            u
        }
        None => {
            state.audit_service.log(
                AuditAction::LoginFailed, "auth", format!("user:{}", email),
                None, None,
                serde_json::json!({"reason": "user_not_found"}),
            ).await;
            tracing::warn!(email = %email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .jwt_service()
        .generate_token(&account)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    let professional_id = professional::find_by_user(&state.store, account.id)
        .await
        .map(|p| p.id);

    // Log successful login
    state.audit_service.log(
        AuditAction::LoginSuccess, "auth", format!("user:{}", account.id),
        Some(account.id.to_string()), Some(account.name.clone()),
        serde_json::json!({"email": &account.email, "role": account.role}),
    ).await;

    tracing::info!(
        user_id = account.id,
        email = %account.email,
        role = %account.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        session: SessionSnapshot {
            id: account.id,
            role: account.role,
        },
        user: UserInfo::from_user(&account, professional_id),
    }))
}

/// Restore the session behind the presented token
///
/// The middleware already re-read the account; this returns the fresh view
/// so permission and preference changes apply without a new login.
pub async fn session(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<SessionResponse>, AppError> {
    let account = state.store.users.require(current_user.id).await?;

    Ok(Json(SessionResponse {
        session: SessionSnapshot {
            id: account.id,
            role: account.role,
        },
        user: UserInfo::from_user(&account, current_user.professional_id),
    }))
}

/// Logout handler
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<()>, AppError> {
    state.audit_service.log(
        AuditAction::Logout, "auth", format!("user:{}", current_user.id),
        Some(current_user.id.to_string()), Some(current_user.name.clone()),
        serde_json::json!({"role": current_user.role}),
    ).await;

    tracing::info!(
        user_id = current_user.id,
        name = %current_user.name,
        "User logged out"
    );

    Ok(Json(()))
}
