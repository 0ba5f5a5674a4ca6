//! Appointment Status Transitions
//!
//! ```text
//! PENDING   -> CONFIRMED | CANCELLED
//! CONFIRMED -> COMPLETED | CANCELLED
//! CANCELLED, COMPLETED: terminal
//! ```

use shared::error::{AppError, ErrorCode};
use shared::models::AppointmentStatus;

/// Statuses reachable from `from`
pub fn allowed_targets(from: AppointmentStatus) -> &'static [AppointmentStatus] {
    use AppointmentStatus::*;
    match from {
        Pending => &[Confirmed, Cancelled],
        Confirmed => &[Completed, Cancelled],
        Cancelled | Completed => &[],
    }
}

pub fn can_transition(from: AppointmentStatus, to: AppointmentStatus) -> bool {
    allowed_targets(from).contains(&to)
}

/// Reject transitions outside the table
pub fn check_transition(from: AppointmentStatus, to: AppointmentStatus) -> Result<(), AppError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!("Cannot change status from {} to {}", from, to),
        )
        .with_detail("from", from.as_str())
        .with_detail("to", to.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AppointmentStatus::*;

    #[test]
    fn test_forward_transitions() {
        assert!(can_transition(Pending, Confirmed));
        assert!(can_transition(Pending, Cancelled));
        assert!(can_transition(Confirmed, Completed));
        assert!(can_transition(Confirmed, Cancelled));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!can_transition(Pending, Completed));
        assert!(!can_transition(Pending, Pending));
        assert!(!can_transition(Completed, Cancelled));
        assert!(!can_transition(Cancelled, Confirmed));
        let err = check_transition(Completed, Pending).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
    }
}
