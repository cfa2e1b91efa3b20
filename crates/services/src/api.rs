use std::collections::BTreeMap;

use async_trait::async_trait;
use grades_core::model::{CourseId, StudentId, SubjectId};

use crate::envelope::Envelope;

/// The fixed backend surface the dashboard talks to.
///
/// Every call answers with an [`Envelope`]; failures are reported in-band
/// and never retried.
#[async_trait]
pub trait GradebookApi: Send + Sync {
    /// Current state, used on startup.
    async fn full_snapshot(&self) -> Envelope;

    async fn add_course(&self, name: &str) -> Envelope;

    async fn remove_course(&self, course_id: CourseId) -> Envelope;

    async fn add_subject(
        &self,
        course_id: CourseId,
        name: &str,
        weight: f64,
        assessments: u32,
    ) -> Envelope;

    async fn remove_subject(&self, course_id: CourseId, subject_id: SubjectId) -> Envelope;

    async fn add_student(&self, course_id: CourseId, name: &str) -> Envelope;

    async fn remove_student(&self, course_id: CourseId, student_id: StudentId) -> Envelope;

    /// Replace a student's grades; `grades` maps each subject to its raw
    /// comma-separated text.
    async fn save_student_grades(
        &self,
        course_id: CourseId,
        student_id: StudentId,
        grades: &BTreeMap<SubjectId, String>,
    ) -> Envelope;
}
