use serde::{Deserialize, Serialize};

use crate::model::{Course, CourseId};

/// The complete state graph handed out after every backend call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    courses: Vec<Course>,
}

impl Snapshot {
    #[must_use]
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    #[must_use]
    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: CourseId) -> bool {
        self.course(id).is_some()
    }

    #[must_use]
    pub fn first_course_id(&self) -> Option<CourseId> {
        self.courses.first().map(Course::id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Recomputes averages and ranking order for every course.
    pub fn recompute_rankings(&mut self) {
        for course in &mut self.courses {
            course.recompute_ranking();
        }
    }

    #[must_use]
    pub fn into_courses(self) -> Vec<Course> {
        self.courses
    }
}
