//! Room registry.
//!
//! In-memory catalog of rooms keyed by code. Reads take a snapshot under a
//! shared lock; a room returned by [`RoomRegistry::find`] is a candidate,
//! not a reservation. The conflict index decides whether it can actually
//! be booked.
//!
//! # Candidate order
//! Ascending capacity, so the smallest sufficient room is tried first;
//! ties break by room code.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::info;

use crate::config::EngineConfig;
use crate::error::SchedulingError;
use crate::models::Room;

/// Thread-safe room catalog.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, Room>>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the configured startup rooms.
    pub fn from_config(config: &EngineConfig) -> Result<Self, SchedulingError> {
        let registry = Self::new();
        for room in &config.rooms {
            registry.register(room.clone())?;
        }
        Ok(registry)
    }

    /// Adds a room.
    ///
    /// # Errors
    /// - [`SchedulingError::InvalidRoom`] if the room breaks its invariants.
    /// - [`SchedulingError::DuplicateRoom`] if the code is already taken.
    pub fn register(&self, room: Room) -> Result<(), SchedulingError> {
        room.check()?;
        let mut rooms = self.rooms.write().unwrap_or_else(PoisonError::into_inner);
        if rooms.contains_key(&room.code) {
            return Err(SchedulingError::DuplicateRoom(room.code));
        }
        info!(
            room = %room.code,
            capacity = room.capacity,
            computers = room.computers,
            available = room.available,
            "room registered"
        );
        rooms.insert(room.code.clone(), room);
        Ok(())
    }

    /// Rooms with `capacity >= min_capacity` that are available and, when
    /// `needs_computer` is set, have at least one computer.
    ///
    /// The sequence is evaluated over a snapshot taken at call time.
    pub fn find(&self, min_capacity: u32, needs_computer: bool) -> impl Iterator<Item = Room> {
        let mut candidates: Vec<Room> = self
            .rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|r| r.is_candidate(min_capacity, needs_computer))
            .cloned()
            .collect();
        candidates.sort_by(|a, b| a.capacity.cmp(&b.capacity).then_with(|| a.code.cmp(&b.code)));
        candidates.into_iter()
    }

    /// Sets the administrative availability of a room.
    ///
    /// Existing bookings are not affected.
    pub fn set_availability(&self, code: &str, available: bool) -> Result<(), SchedulingError> {
        let mut rooms = self.rooms.write().unwrap_or_else(PoisonError::into_inner);
        let room = rooms
            .get_mut(code)
            .ok_or_else(|| SchedulingError::UnknownRoom(code.to_string()))?;
        if room.available != available {
            info!(room = %code, available, "room availability changed");
        }
        room.available = available;
        Ok(())
    }

    /// Returns a copy of the room with the given code.
    pub fn get(&self, code: &str) -> Option<Room> {
        self.rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(code)
            .cloned()
    }

    /// All rooms, ordered by code.
    pub fn rooms(&self) -> Vec<Room> {
        let mut rooms: Vec<Room> = self
            .rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        rooms.sort_by(|a, b| a.code.cmp(&b.code));
        rooms
    }

    /// Number of registered rooms.
    pub fn len(&self) -> usize {
        self.rooms.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no room is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
