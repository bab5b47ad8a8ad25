//! Conflict index: per-room bookings with overlap detection.
//!
//! # Locking
//! Each room has its own mutex around its booking list. The overlap check
//! and the insertion in [`ConflictIndex::book`] run under that mutex, so
//! two bookings for the same room can never both pass the check. A second
//! mutex maps elements, keyed by unit and element id, to the room they
//! hold; it is only ever acquired after a room lock (in `book`) or on its
//! own (in `release`), never the other way round.
//!
//! Zero-length intervals (asynchronous deadlines) are rejected and never
//! stored.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::debug;

use crate::error::SchedulingError;
use crate::models::{Booking, ElementRef, TimeInterval};

type RoomBookings = Arc<Mutex<Vec<Booking>>>;

/// Thread-safe index of room bookings.
#[derive(Debug, Default)]
pub struct ConflictIndex {
    rooms: RwLock<HashMap<String, RoomBookings>>,
    holders: Mutex<HashMap<ElementRef, String>>,
}

impl ConflictIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Booking list of a room, created on first use.
    fn room_slot(&self, room: &str) -> RoomBookings {
        if let Some(slot) = self
            .rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(room)
        {
            return Arc::clone(slot);
        }
        let mut rooms = self.rooms.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(rooms.entry(room.to_string()).or_default())
    }

    /// Whether any booking of `room` intersects `interval`.
    pub fn overlaps(&self, room: &str, interval: &TimeInterval) -> bool {
        let slot = match self
            .rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(room)
        {
            Some(slot) => Arc::clone(slot),
            None => return false,
        };
        let bookings = slot.lock().unwrap_or_else(PoisonError::into_inner);
        bookings.iter().any(|b| b.interval.overlaps(interval))
    }

    /// Books `room` for `element` during `interval`.
    ///
    /// The overlap check and the insertion are one atomic step.
    ///
    /// # Errors
    /// - [`SchedulingError::EmptyInterval`] for zero-length intervals.
    /// - [`SchedulingError::Conflict`] if the room is taken during `interval`.
    /// - [`SchedulingError::AlreadyBooked`] if `element` already holds a booking.
    pub fn book(
        &self,
        room: &str,
        interval: TimeInterval,
        element: &ElementRef,
    ) -> Result<Booking, SchedulingError> {
        if interval.is_empty() {
            return Err(SchedulingError::EmptyInterval {
                room: room.to_string(),
                element: element.to_string(),
                interval,
            });
        }

        let slot = self.room_slot(room);
        let mut bookings = slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = bookings.iter().find(|b| b.interval.overlaps(&interval)) {
            return Err(SchedulingError::Conflict {
                room: room.to_string(),
                interval: existing.interval,
            });
        }

        let mut holders = self.holders.lock().unwrap_or_else(PoisonError::into_inner);
        if holders.contains_key(element) {
            return Err(SchedulingError::AlreadyBooked(element.to_string()));
        }
        holders.insert(element.clone(), room.to_string());

        let booking = Booking::new(room, interval, element.clone());
        bookings.push(booking.clone());
        Ok(booking)
    }

    /// Removes the booking held by `element`.
    ///
    /// Returns the removed booking, or `None` if there was none. Releasing
    /// twice is a no-op.
    pub fn release(&self, element: &ElementRef) -> Option<Booking> {
        let room = self
            .holders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(element)?;

        let slot = self.room_slot(&room);
        let mut bookings = slot.lock().unwrap_or_else(PoisonError::into_inner);
        let pos = bookings.iter().position(|b| &b.element == element)?;
        let booking = bookings.swap_remove(pos);
        debug!(room = %booking.room, element = %booking.element, interval = %booking.interval, "booking released");
        Some(booking)
    }

    /// The booking currently held by `element`.
    pub fn booking_for(&self, element: &ElementRef) -> Option<Booking> {
        let room = self
            .holders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(element)
            .cloned()?;
        self.bookings_for_room(&room)
            .into_iter()
            .find(|b| &b.element == element)
    }

    /// Bookings of a room, sorted by start.
    pub fn bookings_for_room(&self, room: &str) -> Vec<Booking> {
        let slot = match self
            .rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(room)
        {
            Some(slot) => Arc::clone(slot),
            None => return Vec::new(),
        };
        let mut bookings = slot.lock().unwrap_or_else(PoisonError::into_inner).clone();
        bookings.sort_by_key(|b| b.interval.start);
        bookings
    }

    /// Total number of bookings.
    pub fn len(&self) -> usize {
        self.holders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is booked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
