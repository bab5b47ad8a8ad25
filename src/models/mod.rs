//! Evaluation scheduling domain models.
//!
//! Provides the data types for rooms, evaluation plans and the
//! bookings that bind them.
//!
//! # Domain Mappings
//!
//! | exam-schedule | Generic scheduling |
//! |---------------|--------------------|
//! | EvaluationElement | Activity |
//! | CurricularUnit | Task / Job |
//! | Room | Resource |
//! | Booking | Assignment |
//! | ExamPeriod | Time window |

mod booking;
mod calendar;
mod element;
mod room;
mod unit;
mod user;

pub use booking::{Allocation, Booking, ElementRef};
pub use calendar::{ExamPeriod, ExamPeriodKind, Semester, TimeInterval};
pub use element::{
    ElementTiming, EvaluationElement, EvaluationKind, TimingCategory, DEFAULT_SESSION_MINUTES,
};
pub use room::Room;
pub use unit::{Course, CurricularUnit, EvaluationPolicy};
pub use user::{Permission, Role, User};
