//! Queue wire types
//!
//! Core vocabulary shared by the server and its clients: entry status,
//! customer variants, requested service lines, and requester identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a queue entry
///
/// ```text
/// pending → in_progress → completed
///    │            │
///    └────────────┴─────→ cancelled
/// ```
///
/// `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl QueueStatus {
    /// Whether the entry still occupies a position in the live queue
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    /// Whether this status admits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Check whether a transition to `target` is permitted
    pub fn can_transition_to(&self, target: QueueStatus) -> bool {
        match (self, target) {
            (Self::Pending, Self::InProgress) => true,
            (Self::Pending, Self::Completed) => true,
            (Self::InProgress, Self::Completed) => true,
            (Self::Pending, Self::Cancelled) => true,
            (Self::InProgress, Self::Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// The customer owning a queue entry
///
/// Exactly one variant is populated: either a registered user reference
/// or a walk-in guest's contact details. Guests receive no push
/// notifications (no device token to target).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Customer {
    Registered { user: String },
    Guest { name: String, phone: String },
}

impl Customer {
    /// Registered user reference, if any
    pub fn user(&self) -> Option<&str> {
        match self {
            Self::Registered { user } => Some(user),
            Self::Guest { .. } => None,
        }
    }

    /// Display name for queue views
    pub fn display_name(&self) -> &str {
        match self {
            Self::Registered { user } => user,
            Self::Guest { name, .. } => name,
        }
    }
}

/// One requested service with its quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLine {
    /// Shop service reference (rate card entry id)
    pub service: String,
    /// Requested quantity, at least 1
    pub quantity: u32,
}

impl ServiceLine {
    pub fn new(service: impl Into<String>, quantity: u32) -> Self {
        Self {
            service: service.into(),
            quantity,
        }
    }
}

/// Pre-verified identity of the caller of a mutation
///
/// Verifying the identity is the caller boundary's job; the queue core
/// only checks it against the entry's customer / worker / shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Requester {
    /// A registered customer acting on their own entry
    Customer { user: String },
    /// A shop worker acting on their assigned queue
    Worker { worker: String },
    /// The shop operator
    Operator { shop: String },
}
