//! Evaluation element model.
//!
//! An evaluation element is a single graded event in a curricular unit's
//! assessment plan. Elements come in two categories:
//!
//! - **Synchronous** (tests, exams, presentations, pitches, practical
//!   exercises): held at a fixed time and need a room.
//! - **Asynchronous** (assignments, submissions, monographs): only have a
//!   submission deadline and never occupy a room.
//!
//! The category is decided by [`EvaluationKind`]; the element's
//! [`ElementTiming`] must agree with it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{ElementRef, TimeInterval};

/// Default session length when an element carries none.
pub const DEFAULT_SESSION_MINUTES: u32 = 120;

/// Kind of evaluation element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvaluationKind {
    /// Written test during the semester.
    Test,
    /// Final written test.
    FinalTest,
    /// Assignment (project work, delivered asynchronously).
    Assignment,
    /// Individual assignment submission.
    AssignmentSubmission,
    /// Group assignment submission.
    GroupAssignmentSubmission,
    /// Individual assignment presentation.
    AssignmentPresentation,
    /// Group assignment presentation.
    GroupAssignmentPresentation,
    Monograph,
    PracticalExercise,
    Pitch,
    FinalExam,
    OralExam,
}

/// Timing category of an evaluation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimingCategory {
    /// Fixed time slot in a room.
    Synchronous,
    /// Submission deadline, no room.
    Asynchronous,
}

impl EvaluationKind {
    /// All element kinds.
    pub const ALL: [EvaluationKind; 12] = [
        Self::Test,
        Self::FinalTest,
        Self::Assignment,
        Self::AssignmentSubmission,
        Self::GroupAssignmentSubmission,
        Self::AssignmentPresentation,
        Self::GroupAssignmentPresentation,
        Self::Monograph,
        Self::PracticalExercise,
        Self::Pitch,
        Self::FinalExam,
        Self::OralExam,
    ];

    /// Timing category of this kind.
    pub fn category(self) -> TimingCategory {
        match self {
            Self::Assignment
            | Self::AssignmentSubmission
            | Self::GroupAssignmentSubmission
            | Self::Monograph => TimingCategory::Asynchronous,
            Self::Test
            | Self::FinalTest
            | Self::AssignmentPresentation
            | Self::GroupAssignmentPresentation
            | Self::PracticalExercise
            | Self::Pitch
            | Self::FinalExam
            | Self::OralExam => TimingCategory::Synchronous,
        }
    }

    /// Whether this kind needs a room and a fixed slot.
    #[inline]
    pub fn is_synchronous(self) -> bool {
        self.category() == TimingCategory::Synchronous
    }
}

/// When an element takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementTiming {
    /// A session starting at `start`.
    ///
    /// `duration_minutes` falls back to the engine default when absent.
    Session {
        start: NaiveDateTime,
        duration_minutes: Option<u32>,
    },
    /// A submission deadline.
    Deadline(NaiveDateTime),
}

impl ElementTiming {
    /// Category implied by the timing shape.
    pub fn category(&self) -> TimingCategory {
        match self {
            Self::Session { .. } => TimingCategory::Synchronous,
            Self::Deadline(_) => TimingCategory::Asynchronous,
        }
    }
}

/// A single evaluation element of a curricular unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationElement {
    /// Element identifier, unique within its unit.
    pub id: String,
    /// Name of the owning curricular unit.
    ///
    /// Set by [`CurricularUnit::with_element`](super::CurricularUnit::with_element);
    /// together with `id` it forms the booking reference.
    #[serde(default)]
    pub unit: String,
    /// Element kind.
    pub kind: EvaluationKind,
    /// Share of the final grade, in [0, 1].
    pub weight: f64,
    /// Session slot or submission deadline.
    pub timing: ElementTiming,
    /// Whether each student needs a computer.
    pub needs_computer: bool,
    /// Room assigned by the allocation engine.
    pub room: Option<String>,
}

impl EvaluationElement {
    /// Creates a synchronous element held at `start`.
    pub fn session(
        id: impl Into<String>,
        kind: EvaluationKind,
        weight: f64,
        start: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            unit: String::new(),
            kind,
            weight,
            timing: ElementTiming::Session {
                start,
                duration_minutes: None,
            },
            needs_computer: false,
            room: None,
        }
    }

    /// Creates an asynchronous element due at `deadline`.
    pub fn deliverable(
        id: impl Into<String>,
        kind: EvaluationKind,
        weight: f64,
        deadline: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            unit: String::new(),
            kind,
            weight,
            timing: ElementTiming::Deadline(deadline),
            needs_computer: false,
            room: None,
        }
    }

    /// Sets the session duration. No effect on deadline elements.
    pub fn with_duration_minutes(mut self, minutes: u32) -> Self {
        if let ElementTiming::Session {
            duration_minutes, ..
        } = &mut self.timing
        {
            *duration_minutes = Some(minutes);
        }
        self
    }

    /// Sets the owning unit name.
    pub fn in_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Unit-qualified reference used to key bookings.
    pub fn reference(&self) -> ElementRef {
        ElementRef::new(self.unit.as_str(), self.id.as_str())
    }

    /// Marks the element as needing computers.
    pub fn with_computer(mut self) -> Self {
        self.needs_computer = true;
        self
    }

    /// Whether the element needs a room.
    #[inline]
    pub fn is_synchronous(&self) -> bool {
        self.kind.is_synchronous()
    }

    /// Whether the timing shape agrees with the kind's category.
    pub fn timing_matches_kind(&self) -> bool {
        self.timing.category() == self.kind.category()
    }

    /// Session start, if the element is a session.
    pub fn start(&self) -> Option<NaiveDateTime> {
        match self.timing {
            ElementTiming::Session { start, .. } => Some(start),
            ElementTiming::Deadline(_) => None,
        }
    }

    /// Submission deadline, if the element is a deliverable.
    pub fn deadline(&self) -> Option<NaiveDateTime> {
        match self.timing {
            ElementTiming::Deadline(deadline) => Some(deadline),
            ElementTiming::Session { .. } => None,
        }
    }

    /// Occupied interval for a session, using `default_minutes` when the
    /// element has no explicit duration.
    ///
    /// `None` for deadlines and for sessions whose end is not representable.
    pub fn interval(&self, default_minutes: u32) -> Option<TimeInterval> {
        match self.timing {
            ElementTiming::Session {
                start,
                duration_minutes,
            } => TimeInterval::from_minutes(start, duration_minutes.unwrap_or(default_minutes)),
            ElementTiming::Deadline(_) => None,
        }
    }
}
