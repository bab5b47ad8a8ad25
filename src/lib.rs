//! Evaluation scheduling and room allocation for academic courses.
//!
//! Assigns evaluation sessions (tests, exams, presentations) to rooms
//! while respecting seating capacity, computer needs, administrative room
//! availability and existing bookings. Deliverables with only a deadline
//! pass through without a room.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Room`, `EvaluationElement`,
//!   `CurricularUnit`, `Course`, `Semester`, `ExamPeriod`, `Booking`, `User`
//! - **`registry`**: Thread-safe room catalog with smallest-first search
//! - **`conflict`**: Per-room booking index with atomic check-and-book
//! - **`engine`**: Allocation engine (allocate, commit, release, reallocate)
//! - **`validation`**: Evaluation-policy checks for curricular units
//! - **`config`**: Engine configuration (TOML file + environment)
//! - **`error`**: `SchedulingError` and its `ErrorKind` classification
//!
//! # Data flow
//!
//! `CurriculumValidator::validate` → `AllocationEngine::allocate` per element
//! → `RoomRegistry::find` → `ConflictIndex::book`.

pub mod config;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod models;
pub mod registry;
pub mod validation;

pub use error::{ErrorKind, SchedulingError};
