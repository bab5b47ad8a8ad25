//! Room model.
//!
//! Rooms are the physical resources evaluation sessions are held in.
//! Each room has a seating capacity, a number of student computers,
//! and an administrative availability flag (maintenance, closures).
//!
//! The availability flag is independent of bookings: a room that is
//! fully booked is still "available", and marking a room unavailable
//! does not cancel sessions already booked in it.

use serde::{Deserialize, Serialize};

use crate::error::SchedulingError;

/// A room that evaluation sessions can be allocated to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room code (e.g., "B1.04").
    pub code: String,
    /// Number of seats. Must be positive.
    pub capacity: u32,
    /// Number of student computers. Never exceeds `capacity`.
    #[serde(default)]
    pub computers: u32,
    /// Administrative availability.
    #[serde(default = "available_by_default")]
    pub available: bool,
}

fn available_by_default() -> bool {
    true
}

impl Room {
    /// Creates an available room without computers.
    pub fn new(code: impl Into<String>, capacity: u32) -> Self {
        Self {
            code: code.into(),
            capacity,
            computers: 0,
            available: true,
        }
    }

    /// Sets the computer count.
    pub fn with_computers(mut self, computers: u32) -> Self {
        self.computers = computers;
        self
    }

    /// Sets the availability flag.
    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Whether the room has at least one student computer.
    #[inline]
    pub fn has_computers(&self) -> bool {
        self.computers > 0
    }

    /// Whether the room satisfies a seating and equipment requirement.
    ///
    /// Ignores the availability flag; see [`Room::is_candidate`].
    pub fn fits(&self, min_capacity: u32, needs_computer: bool) -> bool {
        self.capacity >= min_capacity && (!needs_computer || self.has_computers())
    }

    /// Whether the room is available and fits the requirement.
    pub fn is_candidate(&self, min_capacity: u32, needs_computer: bool) -> bool {
        self.available && self.fits(min_capacity, needs_computer)
    }

    /// Checks the structural invariants of the room.
    pub fn check(&self) -> Result<(), SchedulingError> {
        let reason = if self.code.trim().is_empty() {
            "room code is empty"
        } else if self.capacity == 0 {
            "capacity must be positive"
        } else if self.computers > self.capacity {
            "computer count exceeds capacity"
        } else {
            return Ok(());
        };
        Err(SchedulingError::InvalidRoom {
            code: self.code.clone(),
            reason: reason.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_builder() {
        let r = Room::new("B1.04", 40).with_computers(20);
        assert_eq!(r.code, "B1.04");
        assert_eq!(r.capacity, 40);
        assert_eq!(r.computers, 20);
        assert!(r.available);
        assert!(r.has_computers());
    }

    #[test]
    fn test_room_fits() {
        let lab = Room::new("LAB", 20).with_computers(10);
        let hall = Room::new("HALL", 30);

        assert!(lab.fits(20, true));
        assert!(!lab.fits(21, false));
        assert!(hall.fits(25, false));
        assert!(!hall.fits(25, true));
    }

    #[test]
    fn test_unavailable_room_is_not_candidate() {
        let r = Room::new("A", 50).with_availability(false);
        assert!(r.fits(10, false));
        assert!(!r.is_candidate(10, false));
    }

    #[test]
    fn test_room_check() {
        assert!(Room::new("A", 10).with_computers(10).check().is_ok());
        assert!(Room::new("A", 0).check().is_err());
        assert!(Room::new("A", 10).with_computers(11).check().is_err());
        assert!(Room::new("  ", 10).check().is_err());
    }

    #[test]
    fn test_room_deserialize_defaults() {
        let r: Room = serde_json::from_str(r#"{"code":"C2","capacity":25}"#).unwrap();
        assert_eq!(r.computers, 0);
        assert!(r.available);
    }
}
