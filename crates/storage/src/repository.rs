use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use grades_core::grade::Grade;
use grades_core::model::{Course, CourseId, Student, StudentId, Subject, SubjectDraft, SubjectId};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the gradebook.
///
/// Courses, subjects, and students come back in insertion order. Every
/// student carries a (possibly empty) grade list for each subject of its
/// course. Identifiers are assigned here.
#[async_trait]
pub trait GradebookRepository: Send + Sync {
    /// Load every course with its subjects, students, and grades.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the data cannot be read or decoded.
    async fn load_courses(&self) -> Result<Vec<Course>, StorageError>;

    /// Insert a new, empty course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn insert_course(&self, name: &str) -> Result<CourseId, StorageError>;

    /// Delete a course with everything it owns. Missing courses are ignored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection failures.
    async fn delete_course(&self, id: CourseId) -> Result<(), StorageError>;

    /// Append a subject to a course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the course does not exist.
    async fn insert_subject(
        &self,
        course_id: CourseId,
        draft: &SubjectDraft,
    ) -> Result<SubjectId, StorageError>;

    /// Delete a subject and every grade recorded for it. Missing subjects are ignored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection failures.
    async fn delete_subject(
        &self,
        course_id: CourseId,
        subject_id: SubjectId,
    ) -> Result<(), StorageError>;

    /// Append a student to a course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the course does not exist.
    async fn insert_student(&self, course_id: CourseId, name: &str)
    -> Result<StudentId, StorageError>;

    /// Delete a student. Missing students are ignored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection failures.
    async fn delete_student(
        &self,
        course_id: CourseId,
        student_id: StudentId,
    ) -> Result<(), StorageError>;

    /// Replace the grade lists of one student, subject by subject.
    ///
    /// Subjects not listed keep their grades; subjects that do not belong to
    /// the course are skipped.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the student is not in the course.
    async fn replace_grades(
        &self,
        course_id: CourseId,
        student_id: StudentId,
        grades: &BTreeMap<SubjectId, Vec<Grade>>,
    ) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
struct StudentRecord {
    id: StudentId,
    name: String,
    grades: BTreeMap<SubjectId, Vec<Grade>>,
}

#[derive(Debug, Clone)]
struct CourseRecord {
    id: CourseId,
    name: String,
    subjects: Vec<Subject>,
    students: Vec<StudentRecord>,
}

impl CourseRecord {
    fn to_course(&self) -> Course {
        let students = self
            .students
            .iter()
            .map(|s| {
                let grades = self
                    .subjects
                    .iter()
                    .map(|subject| {
                        let list = s.grades.get(&subject.id()).cloned().unwrap_or_default();
                        (subject.id(), list)
                    })
                    .collect();
                Student::from_persisted(s.id, s.name.clone(), grades)
            })
            .collect();
        Course::from_persisted(self.id, self.name.clone(), self.subjects.clone(), students)
    }
}

#[derive(Debug, Default)]
struct InMemoryState {
    next_id: u64,
    courses: Vec<CourseRecord>,
}

impl InMemoryState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn course_mut(&mut self, id: CourseId) -> Result<&mut CourseRecord, StorageError> {
        self.courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StorageError::NotFound)
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, InMemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl GradebookRepository for InMemoryRepository {
    async fn load_courses(&self) -> Result<Vec<Course>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.courses.iter().map(CourseRecord::to_course).collect())
    }

    async fn insert_course(&self, name: &str) -> Result<CourseId, StorageError> {
        let mut guard = self.lock()?;
        let id = CourseId::new(guard.allocate_id());
        guard.courses.push(CourseRecord {
            id,
            name: name.to_owned(),
            subjects: Vec::new(),
            students: Vec::new(),
        });
        Ok(id)
    }

    async fn delete_course(&self, id: CourseId) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard.courses.retain(|c| c.id != id);
        Ok(())
    }

    async fn insert_subject(
        &self,
        course_id: CourseId,
        draft: &SubjectDraft,
    ) -> Result<SubjectId, StorageError> {
        let mut guard = self.lock()?;
        let id = SubjectId::new(guard.allocate_id());
        let course = guard.course_mut(course_id)?;
        course.subjects.push(draft.clone().into_subject(id));
        Ok(id)
    }

    async fn delete_subject(
        &self,
        course_id: CourseId,
        subject_id: SubjectId,
    ) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        let Ok(course) = guard.course_mut(course_id) else {
            return Ok(());
        };
        course.subjects.retain(|s| s.id() != subject_id);
        for student in &mut course.students {
            student.grades.remove(&subject_id);
        }
        Ok(())
    }

    async fn insert_student(
        &self,
        course_id: CourseId,
        name: &str,
    ) -> Result<StudentId, StorageError> {
        let mut guard = self.lock()?;
        let id = StudentId::new(guard.allocate_id());
        let course = guard.course_mut(course_id)?;
        let grades = course.subjects.iter().map(|s| (s.id(), Vec::new())).collect();
        course.students.push(StudentRecord {
            id,
            name: name.to_owned(),
            grades,
        });
        Ok(id)
    }

    async fn delete_student(
        &self,
        course_id: CourseId,
        student_id: StudentId,
    ) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if let Ok(course) = guard.course_mut(course_id) {
            course.students.retain(|s| s.id != student_id);
        }
        Ok(())
    }

    async fn replace_grades(
        &self,
        course_id: CourseId,
        student_id: StudentId,
        grades: &BTreeMap<SubjectId, Vec<Grade>>,
    ) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        let course = guard.course_mut(course_id)?;
        let subject_ids: Vec<SubjectId> = course.subjects.iter().map(Subject::id).collect();
        let student = course
            .students
            .iter_mut()
            .find(|s| s.id == student_id)
            .ok_or(StorageError::NotFound)?;
        for (subject_id, list) in grades {
            if subject_ids.contains(subject_id) {
                student.grades.insert(*subject_id, list.clone());
            }
        }
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub gradebook: Arc<dyn GradebookRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let gradebook: Arc<dyn GradebookRepository> = Arc::new(InMemoryRepository::new());
        Self { gradebook }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade_list(values: &[f64]) -> Vec<Grade> {
        values.iter().map(|v| Grade::new(*v).unwrap()).collect()
    }

    #[tokio::test]
    async fn courses_keep_insertion_order() {
        let repo = InMemoryRepository::new();
        let a = repo.insert_course("A").await.unwrap();
        let b = repo.insert_course("B").await.unwrap();

        let courses = repo.load_courses().await.unwrap();
        let ids: Vec<CourseId> = courses.iter().map(Course::id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[tokio::test]
    async fn subject_insert_requires_course() {
        let repo = InMemoryRepository::new();
        let draft = SubjectDraft::new("Math", 1.0, 3).unwrap();
        let err = repo
            .insert_subject(CourseId::new(404), &draft)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn removing_subject_drops_its_grades() {
        let repo = InMemoryRepository::new();
        let course = repo.insert_course("Physics").await.unwrap();
        let math = repo
            .insert_subject(course, &SubjectDraft::new("Math", 1.0, 2).unwrap())
            .await
            .unwrap();
        let student = repo.insert_student(course, "Ana").await.unwrap();

        let mut grades = BTreeMap::new();
        grades.insert(math, grade_list(&[8.0, 9.0]));
        repo.replace_grades(course, student, &grades).await.unwrap();

        repo.delete_subject(course, math).await.unwrap();

        let courses = repo.load_courses().await.unwrap();
        assert!(courses[0].subjects().is_empty());
        assert!(courses[0].students()[0].grades().is_empty());
    }

    #[tokio::test]
    async fn students_see_subjects_added_later() {
        let repo = InMemoryRepository::new();
        let course = repo.insert_course("Physics").await.unwrap();
        repo.insert_student(course, "Ana").await.unwrap();
        let art = repo
            .insert_subject(course, &SubjectDraft::new("Art", 1.0, 1).unwrap())
            .await
            .unwrap();

        let courses = repo.load_courses().await.unwrap();
        let student = &courses[0].students()[0];
        assert!(student.grades().contains_key(&art));
        assert!(student.grades_for(art).is_empty());
    }

    #[tokio::test]
    async fn replace_grades_rejects_unknown_student() {
        let repo = InMemoryRepository::new();
        let course = repo.insert_course("Physics").await.unwrap();
        let err = repo
            .replace_grades(course, StudentId::new(999), &BTreeMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }
}
