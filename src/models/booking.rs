//! Booking and allocation result models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::TimeInterval;

/// Reference to an evaluation element across all units.
///
/// Element ids are only unique within their unit, so bookings are keyed
/// by the pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementRef {
    /// Owning curricular unit name.
    pub unit: String,
    /// Element id within the unit.
    pub element: String,
}

impl ElementRef {
    /// Creates a new reference.
    pub fn new(unit: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            element: element.into(),
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.unit, self.element)
    }
}

/// A room held by an evaluation element during an interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Booking {
    /// Booked room code.
    pub room: String,
    /// Occupied interval [start, end).
    pub interval: TimeInterval,
    /// Element holding the room.
    pub element: ElementRef,
}

impl Booking {
    /// Creates a new booking.
    pub fn new(room: impl Into<String>, interval: TimeInterval, element: ElementRef) -> Self {
        Self {
            room: room.into(),
            interval,
            element,
        }
    }
}

/// Outcome of a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Allocation {
    /// A synchronous element got a room.
    Room(Booking),
    /// An asynchronous element only has a deadline; no room was touched.
    Deadline(NaiveDateTime),
}

impl Allocation {
    /// The booking, if a room was allocated.
    pub fn booking(&self) -> Option<&Booking> {
        match self {
            Self::Room(booking) => Some(booking),
            Self::Deadline(_) => None,
        }
    }

    /// The booked room code, if any.
    pub fn room(&self) -> Option<&str> {
        self.booking().map(|b| b.room.as_str())
    }
}
