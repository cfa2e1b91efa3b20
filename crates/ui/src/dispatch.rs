//! Turns user intents into backend calls.
//!
//! Each command is validated locally first; an invalid command never
//! reaches the backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use grades_core::grade::parse_grade_list;
use grades_core::model::{CourseId, StudentId, SubjectId, normalize_name};
use services::{Envelope, GradebookApi};
use thiserror::Error;

/// One variant per user intent. Raw form text is carried untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    AddCourse {
        name: String,
    },
    RemoveCourse {
        course_id: CourseId,
    },
    AddSubject {
        course_id: CourseId,
        name: String,
        weight: String,
        assessments: String,
    },
    RemoveSubject {
        course_id: CourseId,
        subject_id: SubjectId,
    },
    AddStudent {
        course_id: CourseId,
        name: String,
    },
    RemoveStudent {
        course_id: CourseId,
        student_id: StudentId,
    },
    SaveGrades {
        course_id: CourseId,
        student_id: StudentId,
        fields: Vec<(SubjectId, String)>,
    },
}

impl Command {
    fn label(&self) -> &'static str {
        match self {
            Command::AddCourse { .. } => "add_course",
            Command::RemoveCourse { .. } => "remove_course",
            Command::AddSubject { .. } => "add_subject",
            Command::RemoveSubject { .. } => "remove_subject",
            Command::AddStudent { .. } => "add_student",
            Command::RemoveStudent { .. } => "remove_student",
            Command::SaveGrades { .. } => "save_student_grades",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Course name cannot be empty.")]
    EmptyCourseName,
    #[error("Invalid subject data. Check the fields.")]
    InvalidSubject,
    #[error("Student name cannot be empty.")]
    EmptyStudentName,
    #[error("Invalid grade \"{token}\". Grades must be numbers between 0 and 10.")]
    InvalidGrade { subject_id: SubjectId, token: String },
}

impl ValidationError {
    /// The grade input to flag, if the error came from one.
    #[must_use]
    pub fn flagged_subject(&self) -> Option<SubjectId> {
        match self {
            ValidationError::InvalidGrade { subject_id, .. } => Some(*subject_id),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A command that passed local validation.
#[derive(Clone, Debug, PartialEq)]
enum Request {
    AddCourse(String),
    RemoveCourse(CourseId),
    AddSubject(CourseId, String, f64, u32),
    RemoveSubject(CourseId, SubjectId),
    AddStudent(CourseId, String),
    RemoveStudent(CourseId, StudentId),
    SaveGrades(CourseId, StudentId, BTreeMap<SubjectId, String>),
}

fn parse_weight(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w > 0.0)
}

fn parse_assessments(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

fn validate(command: Command) -> Result<Request, ValidationError> {
    match command {
        Command::AddCourse { name } => normalize_name(&name)
            .map(Request::AddCourse)
            .ok_or(ValidationError::EmptyCourseName),
        Command::RemoveCourse { course_id } => Ok(Request::RemoveCourse(course_id)),
        Command::AddSubject {
            course_id,
            name,
            weight,
            assessments,
        } => {
            let name = normalize_name(&name).ok_or(ValidationError::InvalidSubject)?;
            let weight = parse_weight(&weight).ok_or(ValidationError::InvalidSubject)?;
            let assessments =
                parse_assessments(&assessments).ok_or(ValidationError::InvalidSubject)?;
            Ok(Request::AddSubject(course_id, name, weight, assessments))
        }
        Command::RemoveSubject {
            course_id,
            subject_id,
        } => Ok(Request::RemoveSubject(course_id, subject_id)),
        Command::AddStudent { course_id, name } => normalize_name(&name)
            .map(|name| Request::AddStudent(course_id, name))
            .ok_or(ValidationError::EmptyStudentName),
        Command::RemoveStudent {
            course_id,
            student_id,
        } => Ok(Request::RemoveStudent(course_id, student_id)),
        Command::SaveGrades {
            course_id,
            student_id,
            fields,
        } => {
            let mut grades = BTreeMap::new();
            for (subject_id, raw) in fields {
                if let Err(err) = parse_grade_list(&raw) {
                    return Err(ValidationError::InvalidGrade {
                        subject_id,
                        token: err.token,
                    });
                }
                grades.insert(subject_id, raw);
            }
            Ok(Request::SaveGrades(course_id, student_id, grades))
        }
    }
}

/// Validates commands and issues one awaited backend call per command.
#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn GradebookApi>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(api: Arc<dyn GradebookApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `DispatchError::Validation` when the command fails local
    /// checks; the backend is not called in that case.
    pub async fn dispatch(&self, command: Command) -> Result<Envelope, DispatchError> {
        let label = command.label();
        let request = validate(command).inspect_err(|err| {
            tracing::debug!(command = label, error = %err, "command rejected locally");
        })?;

        let api = &self.api;
        let envelope = match request {
            Request::AddCourse(name) => api.add_course(&name).await,
            Request::RemoveCourse(course_id) => api.remove_course(course_id).await,
            Request::AddSubject(course_id, name, weight, assessments) => {
                api.add_subject(course_id, &name, weight, assessments).await
            }
            Request::RemoveSubject(course_id, subject_id) => {
                api.remove_subject(course_id, subject_id).await
            }
            Request::AddStudent(course_id, name) => api.add_student(course_id, &name).await,
            Request::RemoveStudent(course_id, student_id) => {
                api.remove_student(course_id, student_id).await
            }
            Request::SaveGrades(course_id, student_id, grades) => {
                api.save_student_grades(course_id, student_id, &grades).await
            }
        };

        tracing::debug!(
            command = label,
            success = envelope.is_success(),
            message = %envelope.message,
            "command dispatched"
        );
        Ok(envelope)
    }
}
