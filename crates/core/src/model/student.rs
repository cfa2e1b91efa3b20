use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::grade::Grade;
use crate::model::course::{CourseError, normalize_name};
use crate::model::ids::{StudentId, SubjectId};

/// A student with recorded grades per subject and the backend-computed average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    id: StudentId,
    name: String,
    grades: BTreeMap<SubjectId, Vec<Grade>>,
    final_average: f64,
}

impl Student {
    /// Creates a student with an empty grade list for each given subject.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyStudentName` if the trimmed name is empty.
    pub fn new(
        id: StudentId,
        name: impl AsRef<str>,
        subjects: impl IntoIterator<Item = SubjectId>,
    ) -> Result<Self, CourseError> {
        let name = normalize_name(name.as_ref()).ok_or(CourseError::EmptyStudentName)?;
        Ok(Self {
            id,
            name,
            grades: subjects.into_iter().map(|s| (s, Vec::new())).collect(),
            final_average: 0.0,
        })
    }

    /// Rehydrates a student; the final average is recomputed by the course.
    #[must_use]
    pub fn from_persisted(
        id: StudentId,
        name: String,
        grades: BTreeMap<SubjectId, Vec<Grade>>,
    ) -> Self {
        Self {
            id,
            name,
            grades,
            final_average: 0.0,
        }
    }

    #[must_use]
    pub fn id(&self) -> StudentId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn grades(&self) -> &BTreeMap<SubjectId, Vec<Grade>> {
        &self.grades
    }

    /// Grades recorded for one subject; empty when none exist.
    #[must_use]
    pub fn grades_for(&self, subject: SubjectId) -> &[Grade] {
        self.grades.get(&subject).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn final_average(&self) -> f64 {
        self.final_average
    }

    pub(crate) fn set_final_average(&mut self, average: f64) {
        self.final_average = average;
    }
}
