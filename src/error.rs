//! Scheduling errors.
//!
//! Every failure is returned as a [`SchedulingError`]. Callers that only
//! care about the broad class of a failure (to retry, to show a form
//! error, to escalate) use [`SchedulingError::kind`].

use thiserror::Error;

use crate::models::{Permission, TimeInterval};
use crate::validation::PolicyViolation;

/// Broad classification of a [`SchedulingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An entity with the same identifier already exists.
    Duplicate,
    /// A booking race was lost; retry with a refreshed candidate list.
    Conflict,
    /// No room satisfies the constraints.
    NoRoomAvailable,
    /// A curricular unit breaks its evaluation policy.
    PolicyViolation,
    /// Malformed input (bad room data, inconsistent timing, empty interval).
    InvalidInput,
    /// The acting user lacks the required permission.
    Forbidden,
}

/// Errors returned by the registry, conflict index, engine and validator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulingError {
    #[error("room '{0}' is already registered")]
    DuplicateRoom(String),

    #[error("room '{code}' is invalid: {reason}")]
    InvalidRoom { code: String, reason: String },

    #[error("room '{0}' is not registered")]
    UnknownRoom(String),

    #[error("room '{room}' is already booked during {interval}")]
    Conflict { room: String, interval: TimeInterval },

    #[error("element '{0}' already holds a booking")]
    AlreadyBooked(String),

    #[error("cannot book room '{room}' for element '{element}': interval {interval} is empty")]
    EmptyInterval {
        room: String,
        element: String,
        interval: TimeInterval,
    },

    #[error(
        "no room available for element '{element}' \
         ({enrolled} students, computers needed: {needs_computer})"
    )]
    NoRoomAvailable {
        element: String,
        enrolled: u32,
        needs_computer: bool,
    },

    #[error("element '{element}' is already allocated to room '{room}'")]
    AlreadyAllocated { element: String, room: String },

    #[error("element '{element}' has inconsistent timing: {reason}")]
    InvalidTiming { element: String, reason: String },

    #[error("curricular unit '{unit}' violates {} evaluation rule(s)", .violations.len())]
    PolicyViolation {
        unit: String,
        violations: Vec<PolicyViolation>,
    },

    #[error("user '{user}' lacks permission {permission:?}")]
    Forbidden { user: String, permission: Permission },
}

impl SchedulingError {
    /// Broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateRoom(_) => ErrorKind::Duplicate,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::NoRoomAvailable { .. } => ErrorKind::NoRoomAvailable,
            Self::PolicyViolation { .. } => ErrorKind::PolicyViolation,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::InvalidRoom { .. }
            | Self::UnknownRoom(_)
            | Self::AlreadyBooked(_)
            | Self::EmptyInterval { .. }
            | Self::AlreadyAllocated { .. }
            | Self::InvalidTiming { .. } => ErrorKind::InvalidInput,
        }
    }

    /// Whether retrying the same request may succeed.
    #[inline]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    /// Policy violations carried by this error (empty for other kinds).
    pub fn violations(&self) -> &[PolicyViolation] {
        match self {
            Self::PolicyViolation { violations, .. } => violations,
            _ => &[],
        }
    }
}
