use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::CourseId;
use crate::model::{Student, Subject, SubjectId};
use crate::ranking::weighted_average;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course name cannot be empty")]
    EmptyName,

    #[error("subject name cannot be empty")]
    EmptySubjectName,

    #[error("subject weight must be > 0")]
    InvalidWeight,

    #[error("subject assessment count must be > 0")]
    InvalidAssessmentCount,

    #[error("student name cannot be empty")]
    EmptyStudentName,
}

/// Trims a user-supplied name, returning `None` when nothing is left.
#[must_use]
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// A course with its ordered subjects and students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    name: String,
    subjects: Vec<Subject>,
    students: Vec<Student>,
}

impl Course {
    /// Creates an empty course.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyName` if the trimmed name is empty.
    pub fn new(id: CourseId, name: impl AsRef<str>) -> Result<Self, CourseError> {
        let name = normalize_name(name.as_ref()).ok_or(CourseError::EmptyName)?;
        Ok(Self {
            id,
            name,
            subjects: Vec::new(),
            students: Vec::new(),
        })
    }

    /// Rehydrates a course from storage, keeping the stored order.
    #[must_use]
    pub fn from_persisted(
        id: CourseId,
        name: String,
        subjects: Vec<Subject>,
        students: Vec<Student>,
    ) -> Self {
        Self {
            id,
            name,
            subjects,
            students,
        }
    }

    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    #[must_use]
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    #[must_use]
    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id() == id)
    }

    /// Recomputes every student's final average and orders students by it, best first.
    ///
    /// Ties keep their previous relative order.
    pub fn recompute_ranking(&mut self) {
        for student in &mut self.students {
            let average = weighted_average(&self.subjects, student);
            student.set_final_average(average);
        }
        self.students
            .sort_by(|a, b| b.final_average().total_cmp(&a.final_average()));
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
