//! Allocation engine: assigns evaluation sessions to rooms.
//!
//! # Algorithm
//!
//! 1. Asynchronous elements (deliverables) need no room; the deadline is
//!    returned as-is.
//! 2. For sessions, the registry yields available rooms with enough seats
//!    (and computers, if needed), smallest first.
//! 3. Rooms already booked during the session are dropped from that
//!    snapshot ([`AllocationEngine::candidates`]).
//! 4. Each remaining candidate is booked atomically in order; the first
//!    success wins ([`AllocationEngine::commit`]).
//!
//! Steps 2-3 are optimistic. If every candidate of the snapshot was taken
//! by a concurrent allocation before step 4 reached it, the call fails
//! with a retryable [`SchedulingError::Conflict`]; a retry sees a fresh
//! snapshot and either finds another room or fails with
//! [`SchedulingError::NoRoomAvailable`].
//!
//! Constraints are never relaxed: a smaller room or one without computers
//! is never substituted.
//!
//! # Complexity
//! O(r log r + r·b) per allocation, where r = rooms and b = bookings per room.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::conflict::ConflictIndex;
use crate::error::SchedulingError;
use crate::models::{
    Allocation, Booking, CurricularUnit, ElementTiming, EvaluationElement, Permission, Room,
    TimeInterval, User,
};
use crate::registry::RoomRegistry;

/// Snapshot of rooms that could host a session.
///
/// Produced by [`AllocationEngine::candidates`], consumed by
/// [`AllocationEngine::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    /// Seats the rooms were filtered for.
    pub enrolled: u32,
    /// Rooms in booking order.
    pub rooms: Vec<Room>,
}

impl Candidates {
    /// Whether no room qualified.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// Room allocation service.
///
/// Cheap to share: the registry and index are reference-counted and
/// internally synchronized, so one engine (or several engines over the
/// same registry and index) can serve concurrent callers.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chrono::NaiveDate;
/// use exam_schedule::conflict::ConflictIndex;
/// use exam_schedule::engine::AllocationEngine;
/// use exam_schedule::models::{EvaluationElement, EvaluationKind, Room};
/// use exam_schedule::registry::RoomRegistry;
///
/// let registry = Arc::new(RoomRegistry::new());
/// registry.register(Room::new("A", 30)).unwrap();
/// registry.register(Room::new("B", 20).with_computers(10)).unwrap();
/// let engine = AllocationEngine::new(registry, Arc::new(ConflictIndex::new()));
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let mut exam = EvaluationElement::session("E1", EvaluationKind::FinalExam, 0.6, start);
///
/// let allocation = engine.allocate(&mut exam, 25).unwrap();
/// assert_eq!(allocation.room(), Some("A"));
/// assert_eq!(exam.room.as_deref(), Some("A"));
/// ```
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    registry: Arc<RoomRegistry>,
    index: Arc<ConflictIndex>,
    default_session_minutes: u32,
}

impl AllocationEngine {
    /// Creates an engine over a registry and a conflict index.
    pub fn new(registry: Arc<RoomRegistry>, index: Arc<ConflictIndex>) -> Self {
        Self {
            registry,
            index,
            default_session_minutes: EngineConfig::default().default_session_minutes,
        }
    }

    /// Creates an engine with a fresh index and the configured rooms.
    pub fn from_config(config: &EngineConfig) -> Result<Self, SchedulingError> {
        let registry = RoomRegistry::from_config(config)?;
        Ok(Self::new(Arc::new(registry), Arc::new(ConflictIndex::new()))
            .with_default_session_minutes(config.default_session_minutes))
    }

    /// Sets the session length used for elements without a duration.
    pub fn with_default_session_minutes(mut self, minutes: u32) -> Self {
        self.default_session_minutes = minutes;
        self
    }

    /// The room registry.
    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// The conflict index.
    pub fn index(&self) -> &ConflictIndex {
        &self.index
    }

    /// Interval a session element occupies.
    fn session_interval(&self, element: &EvaluationElement) -> Result<TimeInterval, SchedulingError> {
        if !element.timing_matches_kind() {
            return Err(SchedulingError::InvalidTiming {
                element: element.id.clone(),
                reason: format!(
                    "{:?} is {:?} but has {:?} timing",
                    element.kind,
                    element.kind.category(),
                    element.timing.category()
                ),
            });
        }
        match element.interval(self.default_session_minutes) {
            Some(interval) if !interval.is_empty() => Ok(interval),
            Some(_) => Err(SchedulingError::InvalidTiming {
                element: element.id.clone(),
                reason: "session has zero duration".to_string(),
            }),
            None => Err(SchedulingError::InvalidTiming {
                element: element.id.clone(),
                reason: "session end is out of range".to_string(),
            }),
        }
    }

    fn ensure_unallocated(element: &EvaluationElement) -> Result<(), SchedulingError> {
        match &element.room {
            Some(room) => Err(SchedulingError::AlreadyAllocated {
                element: element.id.clone(),
                room: room.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Rooms that can host the session right now, smallest first.
    ///
    /// This is a snapshot: nothing is reserved.
    pub fn candidates(
        &self,
        element: &EvaluationElement,
        enrolled: u32,
    ) -> Result<Candidates, SchedulingError> {
        let interval = self.session_interval(element)?;
        let rooms: Vec<Room> = self
            .registry
            .find(enrolled, element.needs_computer)
            .filter(|room| !self.index.overlaps(&room.code, &interval))
            .collect();
        debug!(
            element = %element.id,
            enrolled,
            needs_computer = element.needs_computer,
            candidates = rooms.len(),
            "candidate rooms evaluated"
        );
        Ok(Candidates { enrolled, rooms })
    }

    /// Books the first candidate that is still free and records it on the
    /// element.
    ///
    /// # Errors
    /// - [`SchedulingError::NoRoomAvailable`] if there are no candidates.
    /// - [`SchedulingError::Conflict`] if every candidate was booked by
    ///   someone else in the meantime.
    pub fn commit(
        &self,
        element: &mut EvaluationElement,
        candidates: &Candidates,
    ) -> Result<Allocation, SchedulingError> {
        Self::ensure_unallocated(element)?;
        let interval = self.session_interval(element)?;
        let key = element.reference();

        let mut lost_race = None;
        for room in &candidates.rooms {
            match self.index.book(&room.code, interval, &key) {
                Ok(booking) => {
                    info!(
                        element = %key,
                        room = %booking.room,
                        interval = %booking.interval,
                        "room allocated"
                    );
                    element.room = Some(booking.room.clone());
                    return Ok(Allocation::Room(booking));
                }
                Err(err @ SchedulingError::Conflict { .. }) => {
                    debug!(element = %element.id, room = %room.code, "candidate taken concurrently");
                    lost_race = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        match lost_race {
            Some(conflict) => {
                warn!(element = %element.id, "every candidate room was taken concurrently");
                Err(conflict)
            }
            None => Err(SchedulingError::NoRoomAvailable {
                element: element.id.clone(),
                enrolled: candidates.enrolled,
                needs_computer: element.needs_computer,
            }),
        }
    }

    /// Allocates a room for `element` given `enrolled` students.
    ///
    /// Deliverables return their deadline without touching the registry.
    pub fn allocate(
        &self,
        element: &mut EvaluationElement,
        enrolled: u32,
    ) -> Result<Allocation, SchedulingError> {
        if !element.is_synchronous() {
            return match element.timing {
                ElementTiming::Deadline(deadline) => Ok(Allocation::Deadline(deadline)),
                ElementTiming::Session { .. } => Err(SchedulingError::InvalidTiming {
                    element: element.id.clone(),
                    reason: format!("{:?} needs a submission deadline", element.kind),
                }),
            };
        }

        Self::ensure_unallocated(element)?;
        let candidates = self.candidates(element, enrolled)?;
        self.commit(element, &candidates)
    }

    /// Frees the element's booking and clears its room. Idempotent.
    pub fn release(&self, element: &mut EvaluationElement) -> Option<Booking> {
        element.room = None;
        self.index.release(&element.reference())
    }

    /// The booking currently held by `element`, looked up by unit and id.
    pub fn booking_for(&self, element: &EvaluationElement) -> Option<Booking> {
        self.index.booking_for(&element.reference())
    }

    /// Releases the element's current booking, then allocates afresh.
    ///
    /// Not transactional: if the new allocation fails, the previous
    /// booking is gone and the element is left without a room.
    pub fn reallocate(
        &self,
        element: &mut EvaluationElement,
        enrolled: u32,
    ) -> Result<Allocation, SchedulingError> {
        let previous = self.release(element);
        self.allocate(element, enrolled).inspect_err(|err| {
            if let Some(previous) = &previous {
                warn!(
                    element = %element.id,
                    previous_room = %previous.room,
                    error = %err,
                    "reallocation failed, element left unscheduled"
                );
            }
        })
    }

    /// Allocates every element of a unit, in plan order.
    ///
    /// Elements are first marked as owned by `unit`, so equal ids in
    /// different units book independently.
    ///
    /// All or nothing: on the first failure, rooms booked by this call are
    /// released and the error is returned. Validation is the caller's job.
    pub fn allocate_unit(
        &self,
        unit: &mut CurricularUnit,
        enrolled: u32,
    ) -> Result<Vec<Allocation>, SchedulingError> {
        unit.adopt_elements();
        let mut allocations = Vec::with_capacity(unit.elements.len());
        for i in 0..unit.elements.len() {
            match self.allocate(&mut unit.elements[i], enrolled) {
                Ok(allocation) => allocations.push(allocation),
                Err(err) => {
                    warn!(unit = %unit.name, element = %unit.elements[i].id, error = %err,
                        "unit allocation failed, rolling back");
                    for (element, allocation) in unit.elements.iter_mut().zip(&allocations) {
                        if allocation.booking().is_some() {
                            self.release(element);
                        }
                    }
                    return Err(err);
                }
            }
        }
        Ok(allocations)
    }

    /// Administrative availability override; needs [`Permission::ManageRooms`].
    pub fn set_room_availability(
        &self,
        actor: &User,
        code: &str,
        available: bool,
    ) -> Result<(), SchedulingError> {
        actor.ensure(Permission::ManageRooms)?;
        self.registry.set_availability(code, available)
    }
}
