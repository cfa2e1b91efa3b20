use grades_core::model::{Course, StudentId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankingRowVm {
    pub student_id: StudentId,
    pub position: usize,
    pub name: String,
    pub average_label: String,
}

impl RankingRowVm {
    #[must_use]
    pub fn line(&self) -> String {
        format!(
            "{}. {} (Final average: {})",
            self.position, self.name, self.average_label
        )
    }
}

#[must_use]
pub fn format_average(value: f64) -> String {
    format!("{value:.2}")
}

/// Rows in the order the backend delivered; nothing is re-sorted here.
#[must_use]
pub fn map_ranking(course: &Course) -> Vec<RankingRowVm> {
    course
        .students()
        .iter()
        .enumerate()
        .map(|(index, student)| RankingRowVm {
            student_id: student.id(),
            position: index + 1,
            name: student.name().to_owned(),
            average_label: format_average(student.final_average()),
        })
        .collect()
}
