use grades_core::grade::Grade;
use grades_core::model::{CourseId, StudentId, Subject, SubjectId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn id_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn course_id_from_i64(v: i64) -> Result<CourseId, StorageError> {
    Ok(CourseId::new(i64_to_u64("course_id", v)?))
}

pub(crate) fn subject_id_from_i64(v: i64) -> Result<SubjectId, StorageError> {
    Ok(SubjectId::new(i64_to_u64("subject_id", v)?))
}

pub(crate) fn student_id_from_i64(v: i64) -> Result<StudentId, StorageError> {
    Ok(StudentId::new(i64_to_u64("student_id", v)?))
}

pub(crate) fn map_subject_row(row: &SqliteRow) -> Result<(CourseId, Subject), StorageError> {
    let course_id = course_id_from_i64(row.try_get::<i64, _>("course_id").map_err(ser)?)?;
    let assessments_i64: i64 = row.try_get("assessments").map_err(ser)?;
    let assessments = u32::try_from(assessments_i64).map_err(|_| {
        StorageError::Serialization(format!("invalid assessments: {assessments_i64}"))
    })?;
    let subject = Subject::new(
        subject_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get::<f64, _>("weight").map_err(ser)?,
        assessments,
    )
    .map_err(ser)?;
    Ok((course_id, subject))
}

pub(crate) struct GradeRow {
    pub student_id: StudentId,
    pub subject_id: SubjectId,
    pub grade: Grade,
}

pub(crate) fn map_grade_row(row: &SqliteRow) -> Result<GradeRow, StorageError> {
    Ok(GradeRow {
        student_id: student_id_from_i64(row.try_get::<i64, _>("student_id").map_err(ser)?)?,
        subject_id: subject_id_from_i64(row.try_get::<i64, _>("subject_id").map_err(ser)?)?,
        grade: Grade::new(row.try_get::<f64, _>("value").map_err(ser)?).map_err(ser)?,
    })
}
