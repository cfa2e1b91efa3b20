//! Weighted final averages.
//!
//! Each subject contributes the arithmetic mean of its recorded grades,
//! weighted by the subject weight. Subjects without grades, or grades filed
//! under a subject that no longer belongs to the course, contribute nothing.

use crate::grade::Grade;
use crate::model::{Student, Subject};

/// Arithmetic mean of a subject's grades, `None` if there are none.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn subject_mean(grades: &[Grade]) -> Option<f64> {
    if grades.is_empty() {
        return None;
    }
    let sum: f64 = grades.iter().map(|g| g.value()).sum();
    Some(sum / grades.len() as f64)
}

/// Rounds to two decimal places, ties to even on the exact binary value
/// (7.125 becomes 7.12, 2.675 becomes 2.67).
#[must_use]
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Weighted final average of a student across the given subjects, rounded to
/// two decimals; `0.0` when no subject contributes.
#[must_use]
pub fn weighted_average(subjects: &[Subject], student: &Student) -> f64 {
    let (weighted_sum, weight_sum) = subjects
        .iter()
        .filter_map(|subject| {
            subject_mean(student.grades_for(subject.id())).map(|mean| (mean, subject.weight()))
        })
        .fold((0.0, 0.0), |(sum, weights), (mean, weight)| {
            (sum + mean * weight, weights + weight)
        });

    if weight_sum > 0.0 {
        round2(weighted_sum / weight_sum)
    } else {
        0.0
    }
}
