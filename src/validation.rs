//! Curriculum validation.
//!
//! Checks the structural integrity of a curricular unit's evaluation plan
//! before allocation. Detects:
//! - Empty plans
//! - Duplicate element IDs
//! - Elements marked as owned by another unit
//! - Duplicate unit names within a course
//! - Weights outside [0, 1]
//! - Weights not summing to 1.0
//! - Element timing inconsistent with the element kind
//! - Too few evaluation moments for the unit's policy
//! - Mixed-policy units without a session inside an exam period
//!
//! All violations are collected; validation never stops at the first one.
//! The validator is read-only. Running it before allocation is a caller
//! contract; the engine does not enforce it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::SchedulingError;
use crate::models::{Course, CurricularUnit, EvaluationPolicy, ExamPeriod, Semester};

/// A broken evaluation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyViolation {
    /// Rule category.
    pub rule: PolicyRule,
    /// Human-readable description.
    pub message: String,
}

/// Categories of evaluation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyRule {
    /// The unit has no evaluation elements.
    EmptyPlan,
    /// Two elements share the same ID.
    DuplicateElementId,
    /// An element is marked as owned by a different unit.
    ForeignElement,
    /// Two units of a course share the same name.
    DuplicateUnitName,
    /// An element weight lies outside [0, 1].
    WeightOutOfRange,
    /// Element weights do not sum to 1.0.
    WeightSum,
    /// Session/deadline timing disagrees with the element kind.
    TimingMismatch,
    /// Fewer moments than the policy requires.
    TooFewMoments,
    /// Mixed policy without a session in an exam period.
    NoExamPeriodMoment,
}

impl PolicyViolation {
    /// Creates a new violation.
    pub fn new(rule: PolicyRule, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

/// Validates curricular units against their evaluation policy.
#[derive(Debug, Clone)]
pub struct CurriculumValidator {
    exam_periods: Vec<ExamPeriod>,
    tolerance: f64,
}

impl CurriculumValidator {
    /// Creates a validator for the given exam periods.
    pub fn new(exam_periods: Vec<ExamPeriod>) -> Self {
        Self {
            exam_periods,
            tolerance: EngineConfig::default().weight_tolerance,
        }
    }

    /// Creates a validator for a semester's exam periods.
    pub fn for_semester(semester: &Semester) -> Self {
        Self::new(semester.exam_periods.clone())
    }

    /// Sets the weight-sum tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    /// Validates a unit.
    ///
    /// # Returns
    /// `Ok(())` if every rule holds, otherwise
    /// [`SchedulingError::PolicyViolation`] listing all broken rules.
    pub fn validate(&self, unit: &CurricularUnit) -> Result<(), SchedulingError> {
        let violations = self.violations(unit);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchedulingError::PolicyViolation {
                unit: unit.name.clone(),
                violations,
            })
        }
    }

    /// Validates every unit of a course.
    ///
    /// Bookings are keyed by unit name, so a repeated name is reported on
    /// every unit after the first. Returns one error per failing unit, in
    /// course order.
    pub fn validate_course(&self, course: &Course) -> Result<(), Vec<SchedulingError>> {
        let mut names = HashSet::new();
        let errors: Vec<SchedulingError> = course
            .units
            .iter()
            .filter_map(|unit| {
                let mut violations = self.violations(unit);
                if !names.insert(unit.name.as_str()) {
                    violations.push(PolicyViolation::new(
                        PolicyRule::DuplicateUnitName,
                        format!("Duplicate unit name in course '{}': {}", course.name, unit.name),
                    ));
                }
                (!violations.is_empty()).then(|| SchedulingError::PolicyViolation {
                    unit: unit.name.clone(),
                    violations,
                })
            })
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Lists every rule the unit breaks.
    pub fn violations(&self, unit: &CurricularUnit) -> Vec<PolicyViolation> {
        let mut violations = Vec::new();

        if unit.elements.is_empty() {
            violations.push(PolicyViolation::new(
                PolicyRule::EmptyPlan,
                format!("Unit '{}' has no evaluation elements", unit.name),
            ));
        }

        let mut ids = HashSet::new();
        for element in &unit.elements {
            if !ids.insert(element.id.as_str()) {
                violations.push(PolicyViolation::new(
                    PolicyRule::DuplicateElementId,
                    format!("Duplicate element ID: {}", element.id),
                ));
            }

            if !element.unit.is_empty() && element.unit != unit.name {
                violations.push(PolicyViolation::new(
                    PolicyRule::ForeignElement,
                    format!(
                        "Element '{}' belongs to unit '{}', not '{}'",
                        element.id, element.unit, unit.name
                    ),
                ));
            }

            if !(0.0..=1.0).contains(&element.weight) {
                violations.push(PolicyViolation::new(
                    PolicyRule::WeightOutOfRange,
                    format!(
                        "Element '{}' has weight {} outside [0, 1]",
                        element.id, element.weight
                    ),
                ));
            }

            if !element.timing_matches_kind() {
                violations.push(PolicyViolation::new(
                    PolicyRule::TimingMismatch,
                    format!(
                        "Element '{}' is {:?} ({:?}) but has {:?} timing",
                        element.id,
                        element.kind,
                        element.kind.category(),
                        element.timing.category()
                    ),
                ));
            }
        }

        let total = unit.total_weight();
        if !unit.elements.is_empty() && (total - 1.0).abs() > self.tolerance {
            violations.push(PolicyViolation::new(
                PolicyRule::WeightSum,
                format!("Weights of unit '{}' sum to {total}, expected 1.0", unit.name),
            ));
        }

        let required = unit.policy.min_moments();
        if unit.elements.len() < required {
            violations.push(PolicyViolation::new(
                PolicyRule::TooFewMoments,
                format!(
                    "{:?} unit '{}' has {} evaluation moment(s), at least {required} required",
                    unit.policy,
                    unit.name,
                    unit.elements.len()
                ),
            ));
        }

        if unit.policy == EvaluationPolicy::Mixed && !self.has_exam_period_moment(unit) {
            violations.push(PolicyViolation::new(
                PolicyRule::NoExamPeriodMoment,
                format!(
                    "Mixed unit '{}' has no session inside an exam period",
                    unit.name
                ),
            ));
        }

        violations
    }

    fn has_exam_period_moment(&self, unit: &CurricularUnit) -> bool {
        unit.synchronous_elements()
            .filter_map(|e| e.start())
            .any(|start| self.exam_periods.iter().any(|p| p.contains(start)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{EvaluationElement, EvaluationKind, ExamPeriodKind};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, month, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn validator() -> CurriculumValidator {
        CurriculumValidator::new(vec![ExamPeriod::new(
            ExamPeriodKind::Normal,
            NaiveDate::from_ymd_opt(2025, 1, 13).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 24).unwrap(),
        )])
    }

    fn rules(err: &SchedulingError) -> Vec<PolicyRule> {
        err.violations().iter().map(|v| v.rule).collect()
    }

    fn continuous(weights: &[f64]) -> CurricularUnit {
        weights
            .iter()
            .enumerate()
            .fold(
                CurricularUnit::new("Databases", EvaluationPolicy::Continuous),
                |unit, (i, &w)| {
                    unit.with_element(EvaluationElement::session(
                        format!("T{i}"),
                        EvaluationKind::Test,
                        w,
                        at(11, 4 + i as u32),
                    ))
                },
            )
    }

    #[test]
    fn test_continuous_three_moments_passes() {
        let unit = continuous(&[0.3, 0.3, 0.4]);
        assert!(validator().validate(&unit).is_ok());
    }

    #[test]
    fn test_continuous_two_moments_fails() {
        let unit = continuous(&[0.5, 0.5]);
        let err = validator().validate(&unit).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PolicyViolation);
        assert_eq!(rules(&err), vec![PolicyRule::TooFewMoments]);
    }

    #[test]
    fn test_weight_sum_tolerance() {
        let unit = continuous(&[0.1 + 0.2, 0.3, 0.4]);
        assert!(validator().validate(&unit).is_ok());

        let unit = continuous(&[0.3, 0.3, 0.3]);
        let err = validator().validate(&unit).unwrap_err();
        assert_eq!(rules(&err), vec![PolicyRule::WeightSum]);

        assert!(validator().with_tolerance(0.2).validate(&unit).is_ok());
    }

    #[test]
    fn test_mixed_needs_exam_period_session() {
        let outside = CurricularUnit::new("Networks", EvaluationPolicy::Mixed)
            .with_element(EvaluationElement::session(
                "T1",
                EvaluationKind::Test,
                0.4,
                at(11, 20),
            ))
            .with_element(EvaluationElement::deliverable(
                "P1",
                EvaluationKind::AssignmentSubmission,
                0.6,
                at(1, 20), // deadline in the period does not count
            ));
        let err = validator().validate(&outside).unwrap_err();
        assert_eq!(rules(&err), vec![PolicyRule::NoExamPeriodMoment]);

        let inside = outside.with_element(EvaluationElement::session(
            "EX",
            EvaluationKind::FinalExam,
            0.0,
            at(1, 16),
        ));
        assert!(validator().validate(&inside).is_ok());
    }

    #[test]
    fn test_mixed_single_moment_reports_all_rules() {
        let unit = CurricularUnit::new("Physics", EvaluationPolicy::Mixed).with_element(
            EvaluationElement::session("EX", EvaluationKind::FinalExam, 0.8, at(11, 3)),
        );
        let err = validator().validate(&unit).unwrap_err();
        assert_eq!(
            rules(&err),
            vec![
                PolicyRule::WeightSum,
                PolicyRule::TooFewMoments,
                PolicyRule::NoExamPeriodMoment
            ]
        );
    }

    #[test]
    fn test_empty_plan() {
        let unit = CurricularUnit::new("Empty", EvaluationPolicy::Continuous);
        let err = validator().validate(&unit).unwrap_err();
        assert_eq!(
            rules(&err),
            vec![PolicyRule::EmptyPlan, PolicyRule::TooFewMoments]
        );
    }

    #[test]
    fn test_element_level_rules() {
        let unit = CurricularUnit::new("Compilers", EvaluationPolicy::Continuous)
            .with_element(EvaluationElement::session(
                "T1",
                EvaluationKind::Test,
                1.2,
                at(11, 4),
            ))
            .with_element(EvaluationElement::session(
                "T1",
                EvaluationKind::Test,
                -0.1,
                at(11, 5),
            ))
            .with_element(EvaluationElement::deliverable(
                "O1",
                EvaluationKind::OralExam,
                -0.1,
                at(11, 6),
            ));
        let errs = rules(&validator().validate(&unit).unwrap_err());
        assert!(errs.contains(&PolicyRule::DuplicateElementId));
        assert_eq!(
            errs.iter()
                .filter(|r| **r == PolicyRule::WeightOutOfRange)
                .count(),
            3
        );
        assert!(errs.contains(&PolicyRule::TimingMismatch));
        assert!(!errs.contains(&PolicyRule::WeightSum)); // 1.2 - 0.1 - 0.1 = 1.0
    }

    #[test]
    fn test_validate_course() {
        let semester = crate::models::Semester::new(
            NaiveDate::from_ymd_opt(2024, 9, 16).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 7).unwrap(),
        )
        .with_exam_period(ExamPeriod::new(
            ExamPeriodKind::Normal,
            NaiveDate::from_ymd_opt(2025, 1, 13).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 24).unwrap(),
        ));
        let course = Course::new("Informatics")
            .with_unit(continuous(&[0.3, 0.3, 0.4]))
            .with_unit(continuous(&[0.5, 0.5]))
            .with_unit(CurricularUnit::new("Empty", EvaluationPolicy::Mixed));

        let errors = CurriculumValidator::for_semester(&semester)
            .validate_course(&course)
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind() == ErrorKind::PolicyViolation));
    }

    #[test]
    fn test_foreign_element() {
        let mut unit = continuous(&[0.3, 0.3, 0.4]);
        unit.elements[1] = unit.elements[1].clone().in_unit("Networks");

        let err = validator().validate(&unit).unwrap_err();
        assert_eq!(rules(&err), vec![PolicyRule::ForeignElement]);

        // Elements built without a unit are accepted
        unit.elements[1].unit.clear();
        assert!(validator().validate(&unit).is_ok());
    }

    #[test]
    fn test_duplicate_unit_name() {
        let course = Course::new("Informatics")
            .with_unit(continuous(&[0.3, 0.3, 0.4]))
            .with_unit(continuous(&[0.2, 0.3, 0.5]));

        let errors = validator().validate_course(&course).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(rules(&errors[0]), vec![PolicyRule::DuplicateUnitName]);
    }
}
