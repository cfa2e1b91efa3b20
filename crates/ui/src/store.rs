//! The dashboard's state store.
//!
//! Holds the last snapshot the backend handed out plus the UI-only
//! selection. The snapshot is only ever replaced as a whole.

use grades_core::model::{Course, CourseId, Snapshot};
use services::Envelope;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SubTab {
    #[default]
    Ranking,
    Grades,
    Manage,
}

impl SubTab {
    pub const ALL: [SubTab; 3] = [SubTab::Ranking, SubTab::Grades, SubTab::Manage];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SubTab::Ranking => "Ranking",
            SubTab::Grades => "Grade Table",
            SubTab::Manage => "Add/Edit",
        }
    }
}

/// Which course and sub-tab the user is looking at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub active_course: Option<CourseId>,
    pub sub_tab: SubTab,
}

impl Selection {
    /// Selection after a fresh snapshot arrived.
    ///
    /// A course created by the call becomes active with the ranking tab.
    /// Otherwise, if the active course vanished, fall back to the first
    /// course, or to nothing when no course is left.
    #[must_use]
    pub fn reconcile(self, snapshot: &Snapshot, created: Option<CourseId>) -> Self {
        if let Some(created) = created.filter(|id| snapshot.contains(*id)) {
            return Self {
                active_course: Some(created),
                sub_tab: SubTab::Ranking,
            };
        }

        let still_there = self.active_course.is_some_and(|id| snapshot.contains(id));
        if still_there {
            self
        } else {
            Self {
                active_course: snapshot.first_course_id(),
                ..self
            }
        }
    }
}

/// What the content area should show for the current selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActiveCourse<'a> {
    NoneSelected,
    Found(&'a Course),
    Missing(CourseId),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardState {
    snapshot: Snapshot,
    selection: Selection,
    revision: u64,
}

impl DashboardState {
    /// State for the first snapshot: the first course is active.
    #[must_use]
    pub fn initial(snapshot: Snapshot) -> Self {
        let selection = Selection {
            active_course: snapshot.first_course_id(),
            sub_tab: SubTab::Ranking,
        };
        Self {
            snapshot,
            selection,
            revision: 0,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Bumped on every applied snapshot; rendered components key on it so
    /// stale input text never survives a refresh.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Adopt the snapshot of a successful response.
    ///
    /// Returns `false` (and leaves the state untouched) for error responses.
    pub fn apply(&mut self, envelope: &Envelope) -> bool {
        let Some(snapshot) = envelope.authoritative_snapshot() else {
            return false;
        };
        self.selection = self
            .selection
            .reconcile(snapshot, envelope.created_course);
        self.snapshot = snapshot.clone();
        self.revision += 1;
        true
    }

    /// Switching course always lands on the ranking tab.
    pub fn select_course(&mut self, id: CourseId) {
        self.selection = Selection {
            active_course: Some(id),
            sub_tab: SubTab::Ranking,
        };
    }

    pub fn select_sub_tab(&mut self, tab: SubTab) {
        self.selection.sub_tab = tab;
    }

    #[must_use]
    pub fn active_course(&self) -> ActiveCourse<'_> {
        match self.selection.active_course {
            None => ActiveCourse::NoneSelected,
            Some(id) => self
                .snapshot
                .course(id)
                .map_or(ActiveCourse::Missing(id), ActiveCourse::Found),
        }
    }
}
