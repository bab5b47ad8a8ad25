//! Calendar models: time intervals, exam periods and semesters.
//!
//! # Time Model
//! Times are local wall-clock values (`NaiveDateTime`); the institution
//! defines the timezone. Exam periods and semesters are day-granular and
//! use inclusive date bounds.
//!
//! # Half-open intervals
//! A `TimeInterval` includes its start and excludes its end, so an exam
//! ending at 12:00 and one starting at 12:00 in the same room do not
//! collide.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A time interval [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    /// Interval start (inclusive).
    pub start: NaiveDateTime,
    /// Interval end (exclusive).
    pub end: NaiveDateTime,
}

impl TimeInterval {
    /// Creates a new interval.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Creates an interval of `minutes` starting at `start`.
    ///
    /// Returns `None` if the end is past the representable range.
    pub fn from_minutes(start: NaiveDateTime, minutes: u32) -> Option<Self> {
        let end = start.checked_add_signed(Duration::minutes(i64::from(minutes)))?;
        Some(Self { start, end })
    }

    /// Length of the interval (zero if `end <= start`).
    #[inline]
    pub fn duration(&self) -> Duration {
        if self.end > self.start {
            self.end - self.start
        } else {
            Duration::zero()
        }
    }

    /// Whether the interval covers no time at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether a timestamp falls within this interval.
    #[inline]
    pub fn contains(&self, time: NaiveDateTime) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether two intervals share at least one instant.
    ///
    /// Empty intervals never overlap anything.
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.start < other.end
            && other.start < self.end
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}

/// Exam period classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamPeriodKind {
    /// Regular period at the end of the semester.
    Normal,
    /// Second-chance period for failed or missed exams.
    Resit,
    /// Special period (working students, finalists, etc.).
    Special,
}

/// A designated date range for exams, bounds inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamPeriod {
    pub kind: ExamPeriodKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ExamPeriod {
    /// Creates a new exam period.
    pub fn new(kind: ExamPeriodKind, start: NaiveDate, end: NaiveDate) -> Self {
        Self { kind, start, end }
    }

    /// Whether the date of `time` falls inside the period.
    pub fn contains(&self, time: NaiveDateTime) -> bool {
        let date = time.date();
        date >= self.start && date <= self.end
    }
}

/// An academic semester with its exam periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    /// First day of the semester.
    pub start: NaiveDate,
    /// Last day of the semester.
    pub end: NaiveDate,
    /// Exam periods, in no particular order.
    pub exam_periods: Vec<ExamPeriod>,
}

impl Semester {
    /// Creates a semester without exam periods.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            exam_periods: Vec::new(),
        }
    }

    /// Adds an exam period.
    pub fn with_exam_period(mut self, period: ExamPeriod) -> Self {
        self.exam_periods.push(period);
        self
    }

    /// Returns the first exam period containing `time`, if any.
    pub fn exam_period_containing(&self, time: NaiveDateTime) -> Option<&ExamPeriod> {
        self.exam_periods.iter().find(|p| p.contains(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_interval_half_open() {
        let i = TimeInterval::new(at(10, 9), at(10, 11));
        assert!(i.contains(at(10, 9)));
        assert!(i.contains(at(10, 10)));
        assert!(!i.contains(at(10, 11)));
        assert_eq!(i.duration(), Duration::hours(2));
    }

    #[test]
    fn test_interval_overlap() {
        let a = TimeInterval::new(at(10, 9), at(10, 11));
        let b = TimeInterval::new(at(10, 10), at(10, 12));
        let c = TimeInterval::new(at(10, 11), at(10, 13));

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c)); // touching ends do not collide
        assert!(b.overlaps(&c));
    }

    #[test]
    fn test_empty_interval_never_overlaps() {
        let empty = TimeInterval::new(at(10, 10), at(10, 10));
        let wide = TimeInterval::new(at(10, 8), at(10, 12));
        assert!(empty.is_empty());
        assert!(!empty.overlaps(&wide));
        assert!(!wide.overlaps(&empty));
        assert_eq!(empty.duration(), Duration::zero());
    }

    #[test]
    fn test_from_minutes() {
        let i = TimeInterval::from_minutes(at(10, 9), 90).unwrap();
        assert_eq!(i.end, at(10, 10) + Duration::minutes(30));
    }

    #[test]
    fn test_from_minutes_overflow() {
        assert!(TimeInterval::from_minutes(NaiveDateTime::MAX, 1).is_none());
        assert!(TimeInterval::from_minutes(NaiveDateTime::MAX, 0).is_some());
    }

    #[test]
    fn test_exam_period_inclusive_bounds() {
        let p = ExamPeriod::new(
            ExamPeriodKind::Normal,
            NaiveDate::from_ymd_opt(2025, 1, 13).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 24).unwrap(),
        );
        assert!(p.contains(at(13, 0)));
        assert!(p.contains(at(24, 23)));
        assert!(!p.contains(at(12, 23)));
        assert!(!p.contains(at(25, 0)));
    }

    #[test]
    fn test_semester_exam_period_lookup() {
        let semester = Semester::new(
            NaiveDate::from_ymd_opt(2024, 9, 16).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 7).unwrap(),
        )
        .with_exam_period(ExamPeriod::new(
            ExamPeriodKind::Normal,
            NaiveDate::from_ymd_opt(2025, 1, 13).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 24).unwrap(),
        ))
        .with_exam_period(ExamPeriod::new(
            ExamPeriodKind::Resit,
            NaiveDate::from_ymd_opt(2025, 1, 27).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 7).unwrap(),
        ));

        assert_eq!(
            semester.exam_period_containing(at(28, 9)).map(|p| p.kind),
            Some(ExamPeriodKind::Resit)
        );
        assert!(semester.exam_period_containing(at(5, 9)).is_none());
    }
}
