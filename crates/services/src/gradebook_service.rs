use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use grades_core::grade::{Grade, parse_grade_list_lenient};
use grades_core::model::{
    CourseError, CourseId, Snapshot, StudentId, SubjectDraft, SubjectId, normalize_name,
};
use storage::repository::{GradebookRepository, StorageError};
use tracing::{debug, warn};

use crate::api::GradebookApi;
use crate::envelope::Envelope;
use crate::error::GradebookError;

const SAVE_FAILED: &str = "Failed to save data.";
const LOAD_FAILED: &str = "Failed to load data.";

/// What a successful mutation reports back.
struct Applied {
    message: String,
    created_course: Option<CourseId>,
}

impl Applied {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            created_course: None,
        }
    }
}

fn validation_message(err: &CourseError) -> &'static str {
    match err {
        CourseError::EmptyName => "Course name cannot be empty.",
        CourseError::EmptyStudentName => "Student name cannot be empty.",
        _ => "Invalid subject data. Check the fields.",
    }
}

/// Missing parents are ignored, matching a backend that silently skips
/// unknown ids.
fn ignore_missing(result: Result<(), StorageError>) -> Result<(), StorageError> {
    match result {
        Err(StorageError::NotFound) => Ok(()),
        other => other,
    }
}

/// Owns grade computation, ranking, and persistence for the dashboard.
#[derive(Clone)]
pub struct GradebookService {
    repo: Arc<dyn GradebookRepository>,
}

impl GradebookService {
    #[must_use]
    pub fn new(repo: Arc<dyn GradebookRepository>) -> Self {
        Self { repo }
    }

    /// Load all courses and rank every one of them.
    ///
    /// # Errors
    ///
    /// Returns `GradebookError::Storage` if the repository cannot be read.
    pub async fn snapshot(&self) -> Result<Snapshot, GradebookError> {
        let mut snapshot = Snapshot::new(self.repo.load_courses().await?);
        snapshot.recompute_rankings();
        Ok(snapshot)
    }

    async fn respond(&self, op: &'static str, outcome: Result<Applied, GradebookError>) -> Envelope {
        let envelope = match outcome {
            Ok(applied) => match self.snapshot().await {
                Ok(snapshot) => Envelope::success(applied.message, snapshot)
                    .with_created_course(applied.created_course),
                Err(err) => {
                    warn!(op, error = %err, "reload after mutation failed");
                    Envelope::failure(LOAD_FAILED, None)
                }
            },
            Err(GradebookError::Course(err)) => {
                Envelope::failure(validation_message(&err), self.snapshot().await.ok())
            }
            Err(GradebookError::Storage(err)) => {
                warn!(op, error = %err, "storage operation failed");
                Envelope::failure(SAVE_FAILED, self.snapshot().await.ok())
            }
        };
        debug!(
            op,
            status = ?envelope.status,
            message = %envelope.message,
            "sending response"
        );
        envelope
    }

    async fn apply_add_course(&self, name: &str) -> Result<Applied, GradebookError> {
        let name = normalize_name(name).ok_or(CourseError::EmptyName)?;
        let id = self.repo.insert_course(&name).await?;
        Ok(Applied {
            message: format!("Course '{name}' added!"),
            created_course: Some(id),
        })
    }

    async fn apply_add_subject(
        &self,
        course_id: CourseId,
        name: &str,
        weight: f64,
        assessments: u32,
    ) -> Result<Applied, GradebookError> {
        let draft = SubjectDraft::new(name, weight, assessments)?;
        ignore_missing(self.repo.insert_subject(course_id, &draft).await.map(|_| ()))?;
        Ok(Applied::message(format!("Subject '{}' added.", draft.name())))
    }

    async fn apply_add_student(
        &self,
        course_id: CourseId,
        name: &str,
    ) -> Result<Applied, GradebookError> {
        let name = normalize_name(name).ok_or(CourseError::EmptyStudentName)?;
        ignore_missing(self.repo.insert_student(course_id, &name).await.map(|_| ()))?;
        Ok(Applied::message(format!("Student '{name}' added.")))
    }

    async fn apply_save_grades(
        &self,
        course_id: CourseId,
        student_id: StudentId,
        grades: &BTreeMap<SubjectId, String>,
    ) -> Result<Applied, GradebookError> {
        let parsed: BTreeMap<SubjectId, Vec<Grade>> = grades
            .iter()
            .map(|(subject, raw)| (*subject, parse_grade_list_lenient(raw)))
            .collect();
        ignore_missing(self.repo.replace_grades(course_id, student_id, &parsed).await)?;
        Ok(Applied::message("Grades saved successfully!"))
    }
}

#[async_trait]
impl GradebookApi for GradebookService {
    async fn full_snapshot(&self) -> Envelope {
        match self.snapshot().await {
            Ok(snapshot) => {
                debug!(courses = snapshot.courses().len(), "initial snapshot loaded");
                Envelope::success("Data loaded successfully.", snapshot)
            }
            Err(err) => {
                warn!(error = %err, "initial load failed");
                Envelope::failure(LOAD_FAILED, None)
            }
        }
    }

    async fn add_course(&self, name: &str) -> Envelope {
        let outcome = self.apply_add_course(name).await;
        self.respond("add_course", outcome).await
    }

    async fn remove_course(&self, course_id: CourseId) -> Envelope {
        let outcome = self
            .repo
            .delete_course(course_id)
            .await
            .map(|()| Applied::message("Course removed."))
            .map_err(GradebookError::from);
        self.respond("remove_course", outcome).await
    }

    async fn add_subject(
        &self,
        course_id: CourseId,
        name: &str,
        weight: f64,
        assessments: u32,
    ) -> Envelope {
        let outcome = self
            .apply_add_subject(course_id, name, weight, assessments)
            .await;
        self.respond("add_subject", outcome).await
    }

    async fn remove_subject(&self, course_id: CourseId, subject_id: SubjectId) -> Envelope {
        let outcome = self
            .repo
            .delete_subject(course_id, subject_id)
            .await
            .map(|()| Applied::message("Subject removed."))
            .map_err(GradebookError::from);
        self.respond("remove_subject", outcome).await
    }

    async fn add_student(&self, course_id: CourseId, name: &str) -> Envelope {
        let outcome = self.apply_add_student(course_id, name).await;
        self.respond("add_student", outcome).await
    }

    async fn remove_student(&self, course_id: CourseId, student_id: StudentId) -> Envelope {
        let outcome = self
            .repo
            .delete_student(course_id, student_id)
            .await
            .map(|()| Applied::message("Student removed."))
            .map_err(GradebookError::from);
        self.respond("remove_student", outcome).await
    }

    async fn save_student_grades(
        &self,
        course_id: CourseId,
        student_id: StudentId,
        grades: &BTreeMap<SubjectId, String>,
    ) -> Envelope {
        let outcome = self.apply_save_grades(course_id, student_id, grades).await;
        self.respond("save_student_grades", outcome).await
    }
}
