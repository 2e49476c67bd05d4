//! Unified error codes for the Lineup framework
//!
//! This module defines all error codes used across the server and clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 4xxx: Queue errors
//! - 6xxx: Catalog errors (shops, services, workers)
//! - 7xxx: Notification errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 2xxx: Permission ====================
    /// Requester is not allowed to perform this operation
    NotAuthorized = 2001,

    // ==================== 4xxx: Queue ====================
    /// Queue entry not found
    EntryNotFound = 4001,
    /// Status transition is not permitted from the current status
    InvalidTransition = 4002,
    /// Entry is already at the last position of its partition
    AlreadyLast = 4003,
    /// Position allocation conflicted with a concurrent writer
    AllocationConflict = 4004,
    /// Public code generation exhausted its retry budget
    CodeSpaceExhausted = 4005,

    // ==================== 6xxx: Catalog ====================
    /// Shop not found
    ShopNotFound = 6001,
    /// Shop is not accepting walk-ins
    ShopClosed = 6002,
    /// Requested service is not offered by the shop
    UnofferedService = 6003,
    /// Worker not found
    WorkerNotFound = 6004,
    /// Worker is not available for queueing
    WorkerUnavailable = 6005,

    // ==================== 7xxx: Notification ====================
    /// No device token registered for the target user
    PushTokenMissing = 7001,
    /// Push delivery failed at the transport
    PushDeliveryFailed = 7002,
    /// Push dispatch queue is full, job dropped
    PushQueueFull = 7003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Network error
    NetworkError = 9004,
    /// Operation timed out
    TimeoutError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::RequiredField => "Required field missing",
            Self::ValueOutOfRange => "Value out of range",

            Self::NotAuthorized => "Not authorized to perform this operation",

            Self::EntryNotFound => "Queue entry not found",
            Self::InvalidTransition => "Status transition not permitted",
            Self::AlreadyLast => "Entry is already last in its queue",
            Self::AllocationConflict => "Queue position allocation conflict, retry the request",
            Self::CodeSpaceExhausted => "Could not generate a unique queue code",

            Self::ShopNotFound => "Shop not found",
            Self::ShopClosed => "Shop is not accepting walk-ins",
            Self::UnofferedService => "Service is not offered by this shop",
            Self::WorkerNotFound => "Worker not found",
            Self::WorkerUnavailable => "Worker is not available",

            Self::PushTokenMissing => "No device token registered",
            Self::PushDeliveryFailed => "Push notification delivery failed",
            Self::PushQueueFull => "Push dispatch queue is full",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
            Self::NetworkError => "Network error",
            Self::TimeoutError => "Operation timed out",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
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
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::InvalidFormat,
            7 => Self::RequiredField,
            8 => Self::ValueOutOfRange,

            2001 => Self::NotAuthorized,

            4001 => Self::EntryNotFound,
            4002 => Self::InvalidTransition,
            4003 => Self::AlreadyLast,
            4004 => Self::AllocationConflict,
            4005 => Self::CodeSpaceExhausted,

            6001 => Self::ShopNotFound,
            6002 => Self::ShopClosed,
            6003 => Self::UnofferedService,
            6004 => Self::WorkerNotFound,
            6005 => Self::WorkerUnavailable,

            7001 => Self::PushTokenMissing,
            7002 => Self::PushDeliveryFailed,
            7003 => Self::PushQueueFull,

            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::ConfigError,
            9004 => Self::NetworkError,
            9005 => Self::TimeoutError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
