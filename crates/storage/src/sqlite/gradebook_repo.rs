use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use grades_core::grade::Grade;
use grades_core::model::{Course, CourseId, Student, StudentId, Subject, SubjectDraft, SubjectId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{
    course_id_from_i64, id_to_i64, map_grade_row, map_subject_row, ser, student_id_from_i64,
    subject_id_from_i64,
};
use crate::repository::{GradebookRepository, StorageError};

fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl GradebookRepository for SqliteRepository {
    async fn load_courses(&self) -> Result<Vec<Course>, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let course_rows = sqlx::query("SELECT id, name FROM courses ORDER BY id ASC")
            .fetch_all(&mut *tx)
            .await
            .map_err(conn)?;
        let subject_rows = sqlx::query(
            r"
            SELECT id, course_id, name, weight, assessments
            FROM subjects
            ORDER BY id ASC
            ",
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(conn)?;
        let student_rows = sqlx::query("SELECT id, course_id, name FROM students ORDER BY id ASC")
            .fetch_all(&mut *tx)
            .await
            .map_err(conn)?;
        let grade_rows = sqlx::query(
            r"
            SELECT student_id, subject_id, value
            FROM grades
            ORDER BY student_id ASC, subject_id ASC, position ASC
            ",
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;

        let mut subjects_by_course: HashMap<CourseId, Vec<Subject>> = HashMap::new();
        for row in &subject_rows {
            let (course_id, subject) = map_subject_row(row)?;
            subjects_by_course.entry(course_id).or_default().push(subject);
        }

        let mut grades_by_student: HashMap<StudentId, BTreeMap<SubjectId, Vec<Grade>>> =
            HashMap::new();
        for row in &grade_rows {
            let grade = map_grade_row(row)?;
            grades_by_student
                .entry(grade.student_id)
                .or_default()
                .entry(grade.subject_id)
                .or_default()
                .push(grade.grade);
        }

        let mut students_by_course: HashMap<CourseId, Vec<(StudentId, String)>> = HashMap::new();
        for row in &student_rows {
            let course_id = course_id_from_i64(row.try_get::<i64, _>("course_id").map_err(ser)?)?;
            let student_id = student_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
            let name: String = row.try_get("name").map_err(ser)?;
            students_by_course
                .entry(course_id)
                .or_default()
                .push((student_id, name));
        }

        let mut courses = Vec::with_capacity(course_rows.len());
        for row in &course_rows {
            let course_id = course_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
            let name: String = row.try_get("name").map_err(ser)?;
            let subjects = subjects_by_course.remove(&course_id).unwrap_or_default();
            let students = students_by_course
                .remove(&course_id)
                .unwrap_or_default()
                .into_iter()
                .map(|(student_id, student_name)| {
                    let mut recorded = grades_by_student.remove(&student_id).unwrap_or_default();
                    let grades = subjects
                        .iter()
                        .map(|s| (s.id(), recorded.remove(&s.id()).unwrap_or_default()))
                        .collect();
                    Student::from_persisted(student_id, student_name, grades)
                })
                .collect();
            courses.push(Course::from_persisted(course_id, name, subjects, students));
        }
        Ok(courses)
    }

    async fn insert_course(&self, name: &str) -> Result<CourseId, StorageError> {
        let res = sqlx::query("INSERT INTO courses (name, created_at) VALUES (?1, ?2)")
            .bind(name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        course_id_from_i64(res.last_insert_rowid())
    }

    async fn delete_course(&self, id: CourseId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM courses WHERE id = ?1")
            .bind(id_to_i64("course_id", id.value())?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }

    async fn insert_subject(
        &self,
        course_id: CourseId,
        draft: &SubjectDraft,
    ) -> Result<SubjectId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO subjects (course_id, name, weight, assessments)
            SELECT ?1, ?2, ?3, ?4
            WHERE EXISTS (SELECT 1 FROM courses WHERE id = ?1)
            ",
        )
        .bind(id_to_i64("course_id", course_id.value())?)
        .bind(draft.name())
        .bind(draft.weight())
        .bind(i64::from(draft.assessments()))
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        subject_id_from_i64(res.last_insert_rowid())
    }

    async fn delete_subject(
        &self,
        course_id: CourseId,
        subject_id: SubjectId,
    ) -> Result<(), StorageError> {
        // Grades cascade through the subject foreign key.
        sqlx::query("DELETE FROM subjects WHERE id = ?1 AND course_id = ?2")
            .bind(id_to_i64("subject_id", subject_id.value())?)
            .bind(id_to_i64("course_id", course_id.value())?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }

    async fn insert_student(
        &self,
        course_id: CourseId,
        name: &str,
    ) -> Result<StudentId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO students (course_id, name)
            SELECT ?1, ?2
            WHERE EXISTS (SELECT 1 FROM courses WHERE id = ?1)
            ",
        )
        .bind(id_to_i64("course_id", course_id.value())?)
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        student_id_from_i64(res.last_insert_rowid())
    }

    async fn delete_student(
        &self,
        course_id: CourseId,
        student_id: StudentId,
    ) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM students WHERE id = ?1 AND course_id = ?2")
            .bind(id_to_i64("student_id", student_id.value())?)
            .bind(id_to_i64("course_id", course_id.value())?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }

    async fn replace_grades(
        &self,
        course_id: CourseId,
        student_id: StudentId,
        grades: &BTreeMap<SubjectId, Vec<Grade>>,
    ) -> Result<(), StorageError> {
        let course = id_to_i64("course_id", course_id.value())?;
        let student = id_to_i64("student_id", student_id.value())?;
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let enrolled = sqlx::query("SELECT 1 FROM students WHERE id = ?1 AND course_id = ?2")
            .bind(student)
            .bind(course)
            .fetch_optional(&mut *tx)
            .await
            .map_err(conn)?;
        if enrolled.is_none() {
            return Err(StorageError::NotFound);
        }

        for (subject_id, list) in grades {
            let subject = id_to_i64("subject_id", subject_id.value())?;
            let belongs = sqlx::query("SELECT 1 FROM subjects WHERE id = ?1 AND course_id = ?2")
                .bind(subject)
                .bind(course)
                .fetch_optional(&mut *tx)
                .await
                .map_err(conn)?;
            if belongs.is_none() {
                continue;
            }

            sqlx::query("DELETE FROM grades WHERE student_id = ?1 AND subject_id = ?2")
                .bind(student)
                .bind(subject)
                .execute(&mut *tx)
                .await
                .map_err(conn)?;

            for (position, grade) in list.iter().enumerate() {
                sqlx::query(
                    r"
                    INSERT INTO grades (student_id, subject_id, position, value)
                    VALUES (?1, ?2, ?3, ?4)
                    ",
                )
                .bind(student)
                .bind(subject)
                .bind(
                    i64::try_from(position)
                        .map_err(|_| StorageError::Serialization("position overflow".into()))?,
                )
                .bind(grade.value())
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
            }
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
