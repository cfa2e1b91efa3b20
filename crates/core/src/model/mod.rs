mod course;
mod ids;
mod snapshot;
mod student;
mod subject;

pub use course::{Course, CourseError, normalize_name};
pub use ids::{CourseId, ParseIdError, StudentId, SubjectId};
pub use snapshot::Snapshot;
pub use student::Student;
pub use subject::{Subject, SubjectDraft};
