//! Shared types for the booking service
//!
//! Wire types used by the server and its clients: error codes and the
//! unified response envelope, domain models, message bus payloads and
//! session DTOs.

pub mod client;
pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

// Message bus re-exports (for convenient access)
pub use message::{BookingEvent, BusMessage, EventType};

// Error re-exports
pub use error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
