//! Unified error codes for the booking service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Appointment errors
//! - 4xxx: Catalog errors
//! - 5xxx: Professional / branch errors
//! - 6xxx: Waiting list / upload errors
//! - 7xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session no longer valid (user removed or disabled)
    SessionExpired = 1005,
    /// Account is disabled
    AccountDisabled = 1007,
    /// Password too short
    PasswordTooShort = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Cannot modify own admin account (demote / deactivate self)
    CannotModifySelf = 2004,

    // ==================== 3xxx: Appointment ====================
    /// Appointment not found
    AppointmentNotFound = 3001,
    /// Requested slot overlaps an appointment or block
    SlotUnavailable = 3002,
    /// Status change not allowed from the current status
    InvalidStatusTransition = 3003,
    /// Requested time outside the professional's working hours
    OutsideWorkingHours = 3004,
    /// Requested date/time is in the past
    AppointmentInPast = 3005,
    /// Rating not allowed (not completed or already rated)
    RatingNotAllowed = 3006,
    /// Professional does not work on the requested day
    ProfessionalUnavailable = 3007,
    /// Schedule block not found
    BlockNotFound = 3101,
    /// Block range overlaps a live appointment
    BlockConflict = 3102,

    // ==================== 4xxx: Catalog ====================
    /// Service not found
    ServiceNotFound = 4001,
    /// Service is inactive
    ServiceInactive = 4002,
    /// Service is referenced by live appointments
    ServiceInUse = 4003,
    /// Service not offered by the professional
    ServiceNotOffered = 4004,
    /// Product not found
    ProductNotFound = 4101,
    /// Stock would become negative
    InsufficientStock = 4102,

    // ==================== 5xxx: Professional ====================
    /// Professional not found
    ProfessionalNotFound = 5001,
    /// Professional is inactive
    ProfessionalInactive = 5002,
    /// Weekly schedule is invalid
    ScheduleInvalid = 5003,
    /// Caller is not linked to a professional profile
    NotAProfessional = 5004,
    /// Professional still has live appointments
    ProfessionalInUse = 5005,
    /// Branch not found
    BranchNotFound = 5101,
    /// Branch is inactive
    BranchInactive = 5102,
    /// Branch referenced by schedules
    BranchInUse = 5103,

    // ==================== 6xxx: Waiting list ====================
    /// Waiting list entry not found
    WaitingEntryNotFound = 6001,
    /// Client already waiting for that date/professional
    WaitingEntryExists = 6002,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Invalid/corrupted image file
    InvalidImageFile = 6503,
    /// No file provided in request
    NoFileProvided = 6504,
    /// Empty file provided
    EmptyFile = 6505,
    /// No filename provided
    NoFilename = 6506,
    /// Image processing failed
    ImageProcessingFailed = 6508,

    // ==================== 7xxx: User ====================
    /// User not found
    UserNotFound = 7001,
    /// Email already registered
    EmailExists = 7002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
}

impl ErrorCode {
    /// Get the numeric code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session is no longer valid",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::CannotModifySelf => "Cannot demote or deactivate own account",

            // Appointment
            ErrorCode::AppointmentNotFound => "Appointment not found",
            ErrorCode::SlotUnavailable => "Requested time slot is not available",
            ErrorCode::InvalidStatusTransition => "Status change is not allowed",
            ErrorCode::OutsideWorkingHours => "Requested time is outside working hours",
            ErrorCode::AppointmentInPast => "Requested time is in the past",
            ErrorCode::RatingNotAllowed => "Appointment cannot be rated",
            ErrorCode::ProfessionalUnavailable => "Professional does not work on that day",
            ErrorCode::BlockNotFound => "Schedule block not found",
            ErrorCode::BlockConflict => "Block overlaps an existing appointment",

            // Catalog
            ErrorCode::ServiceNotFound => "Service not found",
            ErrorCode::ServiceInactive => "Service is not available",
            ErrorCode::ServiceInUse => "Service has upcoming appointments",
            ErrorCode::ServiceNotOffered => "Service is not offered by this professional",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::InsufficientStock => "Insufficient stock",

            // Professional
            ErrorCode::ProfessionalNotFound => "Professional not found",
            ErrorCode::ProfessionalInactive => "Professional is not available",
            ErrorCode::ScheduleInvalid => "Weekly schedule is invalid",
            ErrorCode::NotAProfessional => "Account is not linked to a professional",
            ErrorCode::ProfessionalInUse => "Professional has pending or confirmed appointments",
            ErrorCode::BranchNotFound => "Branch not found",
            ErrorCode::BranchInactive => "Branch is not active",
            ErrorCode::BranchInUse => "Branch is used by professional schedules",

            // Waiting list
            ErrorCode::WaitingEntryNotFound => "Waiting list entry not found",
            ErrorCode::WaitingEntryExists => "Already on the waiting list",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::NoFilename => "No filename provided",
            ErrorCode::ImageProcessingFailed => "Image processing failed",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmailExists => "Email already registered",

            // System
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 to [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1007 => Ok(ErrorCode::AccountDisabled),
            1008 => Ok(ErrorCode::PasswordTooShort),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),
            2004 => Ok(ErrorCode::CannotModifySelf),

            // Appointment
            3001 => Ok(ErrorCode::AppointmentNotFound),
            3002 => Ok(ErrorCode::SlotUnavailable),
            3003 => Ok(ErrorCode::InvalidStatusTransition),
            3004 => Ok(ErrorCode::OutsideWorkingHours),
            3005 => Ok(ErrorCode::AppointmentInPast),
            3006 => Ok(ErrorCode::RatingNotAllowed),
            3007 => Ok(ErrorCode::ProfessionalUnavailable),
            3101 => Ok(ErrorCode::BlockNotFound),
            3102 => Ok(ErrorCode::BlockConflict),

            // Catalog
            4001 => Ok(ErrorCode::ServiceNotFound),
            4002 => Ok(ErrorCode::ServiceInactive),
            4003 => Ok(ErrorCode::ServiceInUse),
            4004 => Ok(ErrorCode::ServiceNotOffered),
            4101 => Ok(ErrorCode::ProductNotFound),
            4102 => Ok(ErrorCode::InsufficientStock),

            // Professional
            5001 => Ok(ErrorCode::ProfessionalNotFound),
            5002 => Ok(ErrorCode::ProfessionalInactive),
            5003 => Ok(ErrorCode::ScheduleInvalid),
            5004 => Ok(ErrorCode::NotAProfessional),
            5005 => Ok(ErrorCode::ProfessionalInUse),
            5101 => Ok(ErrorCode::BranchNotFound),
            5102 => Ok(ErrorCode::BranchInactive),
            5103 => Ok(ErrorCode::BranchInUse),

            // Waiting list
            6001 => Ok(ErrorCode::WaitingEntryNotFound),
            6002 => Ok(ErrorCode::WaitingEntryExists),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6504 => Ok(ErrorCode::NoFileProvided),
            6505 => Ok(ErrorCode::EmptyFile),
            6506 => Ok(ErrorCode::NoFilename),
            6508 => Ok(ErrorCode::ImageProcessingFailed),

            // User
            7001 => Ok(ErrorCode::UserNotFound),
            7002 => Ok(ErrorCode::EmailExists),

            // System
            9001 => Ok(ErrorCode::InternalError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
