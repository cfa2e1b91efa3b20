use serde::{Deserialize, Serialize};

use crate::model::course::{CourseError, normalize_name};
use crate::model::ids::SubjectId;

/// Validated input for a subject that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectDraft {
    name: String,
    weight: f64,
    assessments: u32,
}

impl SubjectDraft {
    /// Validates name, weight, and assessment count.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` if the trimmed name is empty, the weight is not a
    /// positive finite number, or the assessment count is zero.
    pub fn new(name: impl AsRef<str>, weight: f64, assessments: u32) -> Result<Self, CourseError> {
        let name = normalize_name(name.as_ref()).ok_or(CourseError::EmptySubjectName)?;
        if !(weight.is_finite() && weight > 0.0) {
            return Err(CourseError::InvalidWeight);
        }
        if assessments == 0 {
            return Err(CourseError::InvalidAssessmentCount);
        }
        Ok(Self {
            name,
            weight,
            assessments,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[must_use]
    pub fn assessments(&self) -> u32 {
        self.assessments
    }

    #[must_use]
    pub fn into_subject(self, id: SubjectId) -> Subject {
        Subject {
            id,
            name: self.name,
            weight: self.weight,
            assessments: self.assessments,
        }
    }
}

/// A graded subject inside a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    id: SubjectId,
    name: String,
    weight: f64,
    assessments: u32,
}

impl Subject {
    /// # Errors
    ///
    /// Same rules as [`SubjectDraft::new`].
    pub fn new(
        id: SubjectId,
        name: impl AsRef<str>,
        weight: f64,
        assessments: u32,
    ) -> Result<Self, CourseError> {
        SubjectDraft::new(name, weight, assessments).map(|draft| draft.into_subject(id))
    }

    #[must_use]
    pub fn id(&self) -> SubjectId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Number of assessments the subject is expected to have.
    #[must_use]
    pub fn assessments(&self) -> u32 {
        self.assessments
    }
}
