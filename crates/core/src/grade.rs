//! Grade values and the comma-separated grade text used by the grade table.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_GRADE: f64 = 0.0;
pub const MAX_GRADE: f64 = 10.0;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GradeError {
    #[error("grade is not a number: \"{0}\"")]
    NotANumber(String),

    #[error("grade must be between 0 and 10, got {0}")]
    OutOfRange(f64),
}

/// A single recorded grade, always finite and within `[0, 10]`.
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Grade(f64);

impl Grade {
    /// Validates a raw value.
    ///
    /// # Errors
    ///
    /// Returns `GradeError::OutOfRange` for non-finite values or values outside `[0, 10]`.
    pub fn new(value: f64) -> Result<Self, GradeError> {
        if value.is_finite() && (MIN_GRADE..=MAX_GRADE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(GradeError::OutOfRange(value))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Grade {
    type Error = GradeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Grade> for f64 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl fmt::Debug for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grade({})", self.0)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The first token of a grade list that failed validation.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("invalid grade \"{token}\": {source}")]
pub struct GradeListError {
    pub token: String,
    #[source]
    pub source: GradeError,
}

/// Parses one trimmed token.
///
/// # Errors
///
/// Returns `GradeError` if the token is not a number or lies outside `[0, 10]`.
pub fn parse_grade_token(token: &str) -> Result<Grade, GradeError> {
    let value: f64 = token
        .trim()
        .parse()
        .map_err(|_| GradeError::NotANumber(token.trim().to_owned()))?;
    if value.is_nan() {
        return Err(GradeError::NotANumber(token.trim().to_owned()));
    }
    Grade::new(value)
}

fn tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Strict parse used before submitting a save: the first bad token aborts.
///
/// Empty tokens (`"7, ,8"`, trailing commas, blank input) are ignored.
///
/// # Errors
///
/// Returns `GradeListError` carrying the offending token verbatim.
pub fn parse_grade_list(raw: &str) -> Result<Vec<Grade>, GradeListError> {
    tokens(raw)
        .map(|token| {
            parse_grade_token(token).map_err(|source| GradeListError {
                token: token.to_owned(),
                source,
            })
        })
        .collect()
}

/// Lenient parse used when persisting: invalid tokens are dropped.
#[must_use]
pub fn parse_grade_list_lenient(raw: &str) -> Vec<Grade> {
    tokens(raw).filter_map(|t| parse_grade_token(t).ok()).collect()
}

/// Joins grades the way the grade table pre-fills its inputs.
#[must_use]
pub fn format_grade_list(grades: &[Grade]) -> String {
    grades
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_bounds_are_inclusive() {
        assert!(Grade::new(0.0).is_ok());
        assert!(Grade::new(10.0).is_ok());
        assert_eq!(Grade::new(10.01), Err(GradeError::OutOfRange(10.01)));
        assert_eq!(Grade::new(-0.5), Err(GradeError::OutOfRange(-0.5)));
        assert!(Grade::new(f64::INFINITY).is_err());
    }

    #[test]
    fn parse_list_trims_and_skips_empty_tokens() {
        let grades = parse_grade_list(" 7.5 , 8,, 9 ,").unwrap();
        let values: Vec<f64> = grades.into_iter().map(Grade::value).collect();
        assert_eq!(values, vec![7.5, 8.0, 9.0]);
    }

    #[test]
    fn parse_list_blank_is_empty() {
        assert!(parse_grade_list("   ").unwrap().is_empty());
    }

    #[test]
    fn parse_list_reports_first_out_of_range_token() {
        let err = parse_grade_list("7.5, 11, 12").unwrap_err();
        assert_eq!(err.token, "11");
        assert_eq!(err.source, GradeError::OutOfRange(11.0));
    }

    #[test]
    fn parse_list_reports_non_numeric_token() {
        let err = parse_grade_list("8, abc").unwrap_err();
        assert_eq!(err.token, "abc");
        assert!(matches!(err.source, GradeError::NotANumber(_)));
    }

    #[test]
    fn parse_rejects_nan() {
        assert!(parse_grade_token("NaN").is_err());
    }

    #[test]
    fn lenient_parse_drops_invalid_tokens() {
        let grades = parse_grade_list_lenient("7, x, 11, 9.5");
        assert_eq!(format_grade_list(&grades), "7, 9.5");
    }

    #[test]
    fn grade_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Grade>("10.5").is_err());
        let ok: Grade = serde_json::from_str("6.25").unwrap();
        assert_eq!(ok.value(), 6.25);
    }
}
