use grades_core::grade::format_grade_list;
use grades_core::model::{Course, StudentId, SubjectId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradeColumnVm {
    pub subject_id: SubjectId,
    pub header: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradeCellVm {
    pub subject_id: SubjectId,
    pub prefill: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradeRowVm {
    pub student_id: StudentId,
    pub name: String,
    pub cells: Vec<GradeCellVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GradeTableVm {
    /// Nothing to grade yet.
    NoSubjects,
    /// `rows` may be empty; the table then shows a single explanatory row.
    Table {
        columns: Vec<GradeColumnVm>,
        rows: Vec<GradeRowVm>,
    },
}

#[must_use]
pub fn map_grade_table(course: &Course) -> GradeTableVm {
    if course.subjects().is_empty() {
        return GradeTableVm::NoSubjects;
    }

    let columns = course
        .subjects()
        .iter()
        .map(|subject| GradeColumnVm {
            subject_id: subject.id(),
            header: format!("{} (Weight {})", subject.name(), subject.weight()),
        })
        .collect();

    let rows = course
        .students()
        .iter()
        .map(|student| GradeRowVm {
            student_id: student.id(),
            name: student.name().to_owned(),
            cells: course
                .subjects()
                .iter()
                .map(|subject| GradeCellVm {
                    subject_id: subject.id(),
                    prefill: format_grade_list(student.grades_for(subject.id())),
                })
                .collect(),
        })
        .collect();

    GradeTableVm::Table { columns, rows }
}
