//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use std::sync::LazyLock;

use rust_decimal::Decimal;
use validator::ValidateEmail;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: service, product, branch, professional, user, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, block reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, category, specialty
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Service duration bounds (minutes)
pub const MIN_SERVICE_MINUTES: u32 = 5;
pub const MAX_SERVICE_MINUTES: u32 = 480;

static HUNDRED: LazyLock<Decimal> = LazyLock::new(|| Decimal::from(100));

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

/// Validate an email address (syntax + length).
pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    if !email.validate_email() {
        return Err(AppError::validation(format!("Invalid email address: {email}")));
    }
    Ok(())
}

/// Validate a new password.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(AppError::new(shared::error::ErrorCode::PasswordTooShort)
            .with_detail("min_length", MIN_PASSWORD_LEN));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN})"
        )));
    }
    Ok(())
}

/// Validate that a money amount is not negative.
pub fn validate_price(value: Decimal, field: &str) -> Result<(), AppError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::validation(format!("{field} must not be negative")));
    }
    Ok(())
}

/// Validate a percentage in 0..=100.
pub fn validate_percent(value: Decimal, field: &str) -> Result<(), AppError> {
    if value < Decimal::ZERO || value > *HUNDRED {
        return Err(AppError::validation(format!(
            "{field} must be between 0 and 100"
        )));
    }
    Ok(())
}

/// Validate a service duration.
pub fn validate_duration(minutes: u32) -> Result<(), AppError> {
    if !(MIN_SERVICE_MINUTES..=MAX_SERVICE_MINUTES).contains(&minutes) {
        return Err(AppError::validation(format!(
            "duration_minutes must be between {MIN_SERVICE_MINUTES} and {MAX_SERVICE_MINUTES}"
        )));
    }
    Ok(())
}
