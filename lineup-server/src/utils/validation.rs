//! Input validation helpers
//!
//! Centralized text length constants and validation functions for
//! request payloads. SurrealDB enforces no text length limits, so the
//! API boundary does.

use crate::utils::AppError;
use shared::queue::{Customer, ServiceLine};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: shop, worker, guest names
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: phone numbers, device platform tags
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate a customer variant on entry creation
///
/// Guests must carry usable contact details; registered customers a
/// non-empty user ref.
pub fn validate_customer(customer: &Customer) -> Result<(), AppError> {
    match customer {
        Customer::Registered { user } => {
            validate_required_text(user, "customer.user", MAX_SHORT_TEXT_LEN)
        }
        Customer::Guest { name, phone } => {
            validate_required_text(name, "customer.name", MAX_NAME_LEN)?;
            validate_required_text(phone, "customer.phone", MAX_SHORT_TEXT_LEN)
        }
    }
}

/// Validate a requested service list on entry creation
pub fn validate_services(services: &[ServiceLine]) -> Result<(), AppError> {
    if services.is_empty() {
        return Err(AppError::validation("at least one service is required"));
    }
    for line in services {
        validate_required_text(&line.service, "service", MAX_SHORT_TEXT_LEN)?;
        if line.quantity < 1 {
            return Err(AppError::validation(format!(
                "service {} quantity must be at least 1",
                line.service
            )));
        }
    }
    Ok(())
}
