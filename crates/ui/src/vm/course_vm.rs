use grades_core::model::{CourseId, Snapshot};

use crate::store::{Selection, SubTab};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabVm {
    pub id: CourseId,
    pub label: String,
    pub active: bool,
}

/// One tab per course in snapshot order.
#[must_use]
pub fn map_course_tabs(snapshot: &Snapshot, selection: Selection) -> Vec<TabVm> {
    snapshot
        .courses()
        .iter()
        .map(|course| TabVm {
            id: course.id(),
            label: course.name().to_owned(),
            active: selection.active_course == Some(course.id()),
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubTabVm {
    pub tab: SubTab,
    pub label: &'static str,
    pub active: bool,
}

#[must_use]
pub fn map_sub_tabs(selection: Selection) -> Vec<SubTabVm> {
    SubTab::ALL
        .into_iter()
        .map(|tab| SubTabVm {
            tab,
            label: tab.label(),
            active: selection.sub_tab == tab,
        })
        .collect()
}

/// DOM ids for the add forms, unique per course.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseFormIds {
    pub subject_name: String,
    pub subject_weight: String,
    pub subject_assessments: String,
    pub student_name: String,
}

impl CourseFormIds {
    #[must_use]
    pub fn for_course(id: CourseId) -> Self {
        Self {
            subject_name: format!("subject-name-{id}"),
            subject_weight: format!("subject-weight-{id}"),
            subject_assessments: format!("subject-assessments-{id}"),
            student_name: format!("student-name-{id}"),
        }
    }
}
