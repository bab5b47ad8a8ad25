//! Curricular unit and course models.
//!
//! A curricular unit owns its evaluation elements; a course groups units.
//! Both are catalog data supplied by the caller and are only read by the
//! validator. The allocation engine writes room assignments back into the
//! unit's elements.

use serde::{Deserialize, Serialize};

use super::EvaluationElement;

/// Evaluation policy of a curricular unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvaluationPolicy {
    /// At least two moments, one of them in an exam period.
    Mixed,
    /// At least three moments.
    Continuous,
}

impl EvaluationPolicy {
    /// Minimum number of evaluation moments required.
    pub fn min_moments(self) -> usize {
        match self {
            Self::Mixed => 2,
            Self::Continuous => 3,
        }
    }
}

/// A curricular unit with its ordered evaluation plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurricularUnit {
    /// Unit name.
    pub name: String,
    /// Evaluation policy.
    pub policy: EvaluationPolicy,
    /// Evaluation elements, in plan order.
    pub elements: Vec<EvaluationElement>,
}

impl CurricularUnit {
    /// Creates a unit with no elements.
    pub fn new(name: impl Into<String>, policy: EvaluationPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            elements: Vec::new(),
        }
    }

    /// Adds an element, marking it as owned by this unit.
    pub fn with_element(mut self, element: EvaluationElement) -> Self {
        self.push_element(element);
        self
    }

    /// Appends an element, marking it as owned by this unit.
    pub fn push_element(&mut self, element: EvaluationElement) {
        self.elements.push(element.in_unit(self.name.as_str()));
    }

    /// Re-marks every element as owned by this unit.
    ///
    /// Needed after elements were pushed into `elements` directly or the
    /// unit was renamed.
    pub fn adopt_elements(&mut self) {
        for element in &mut self.elements {
            if element.unit != self.name {
                element.unit.clone_from(&self.name);
            }
        }
    }

    /// Sum of element weights.
    pub fn total_weight(&self) -> f64 {
        self.elements.iter().map(|e| e.weight).sum()
    }

    /// Finds an element by id.
    pub fn element(&self, id: &str) -> Option<&EvaluationElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Elements that need a room.
    pub fn synchronous_elements(&self) -> impl Iterator<Item = &EvaluationElement> {
        self.elements.iter().filter(|e| e.is_synchronous())
    }
}

/// A course: a named set of curricular units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub units: Vec<CurricularUnit>,
}

impl Course {
    /// Creates an empty course.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            units: Vec::new(),
        }
    }

    /// Adds a unit.
    pub fn with_unit(mut self, unit: CurricularUnit) -> Self {
        self.units.push(unit);
        self
    }

    /// Finds a unit by name.
    pub fn unit(&self, name: &str) -> Option<&CurricularUnit> {
        self.units.iter().find(|u| u.name == name)
    }
}
