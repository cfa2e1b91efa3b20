use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use grades_core::model::{Course, CourseId, Snapshot, StudentId, SubjectId};
use services::{AppServices, Envelope, GradebookApi};

use crate::dispatch::Command;
use crate::store::SubTab;

use super::dashboard::scripted::Step;
use super::test_harness::{ViewKind, current_snapshot, seeded_api, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn dashboard_renders_backend_ranking_for_first_course() {
    let api = seeded_api().await;
    let snapshot = current_snapshot(&api).await;
    let mut harness = setup_view_harness(api, ViewKind::Dashboard(snapshot));

    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("Math"), "missing course tab in {html}");
    assert!(html.contains("History"), "missing course tab in {html}");
    let first = "1. Bia (Final average: 9.00)";
    let second = "2. Ana (Final average: 7.00)";
    assert!(html.contains(first), "missing {first} in {html}");
    assert!(html.contains(second), "missing {second} in {html}");
    assert!(html.find(first) < html.find(second));
    assert!(html.contains("Remove Course"), "missing remove action in {html}");
    assert!(html.contains("Grade Table"), "missing sub-tab in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn rendering_same_state_twice_is_identical() {
    let api = seeded_api().await;
    let snapshot = current_snapshot(&api).await;
    let mut first = setup_view_harness(Arc::clone(&api), ViewKind::Dashboard(snapshot.clone()));
    let mut second = setup_view_harness(api, ViewKind::Dashboard(snapshot));

    first.rebuild();
    second.rebuild();

    assert_eq!(first.render(), second.render());
    first.rebuild();
    assert_eq!(first.render(), second.render());
}

#[tokio::test(flavor = "current_thread")]
async fn empty_snapshot_shows_get_started_notice() {
    let api = AppServices::in_memory().gradebook_api();
    let mut harness = setup_view_harness(api, ViewKind::Dashboard(Snapshot::default()));

    harness.rebuild();
    let html = harness.render();

    assert!(
        html.contains("Select a course or add a new one to get started."),
        "missing notice in {html}"
    );
    assert!(html.contains("Add Course"), "missing add course form in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn course_without_students_shows_empty_ranking() {
    let api = AppServices::in_memory().gradebook_api();
    let snapshot = Snapshot::new(vec![Course::new(CourseId::new(4), "Art").unwrap()]);
    let mut harness = setup_view_harness(api, ViewKind::Dashboard(snapshot));

    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("No students in this course."), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn removing_active_course_leaves_remaining_tab_active() {
    let api = AppServices::in_memory().gradebook_api();
    let a = api.add_course("Alpha").await.created_course.unwrap();
    api.add_course("Beta").await;
    let envelope = api.remove_course(a).await;
    let snapshot = envelope.snapshot.unwrap();
    let mut harness = setup_view_harness(api, ViewKind::Dashboard(snapshot));

    harness.rebuild();
    let html = harness.render();

    assert!(!html.contains("Alpha"), "removed course still rendered in {html}");
    assert_eq!(html.matches("tab active").count(), 2, "course tab + ranking sub-tab in {html}");
    assert!(html.contains("Beta"), "missing remaining course in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn loader_fetches_snapshot_then_renders_dashboard() {
    let api = seeded_api().await;
    let mut harness = setup_view_harness(api, ViewKind::Loader);

    harness.rebuild();
    let html = harness.render_until("Final average").await;

    assert!(
        html.contains("1. Bia (Final average: 9.00)"),
        "missing ranking in {html}"
    );
}

struct FailingApi;

fn failed() -> Envelope {
    Envelope::failure("Database unavailable.", None)
}

#[async_trait::async_trait]
impl GradebookApi for FailingApi {
    async fn full_snapshot(&self) -> Envelope {
        failed()
    }

    async fn add_course(&self, _name: &str) -> Envelope {
        failed()
    }

    async fn remove_course(&self, _course_id: CourseId) -> Envelope {
        failed()
    }

    async fn add_subject(
        &self,
        _course_id: CourseId,
        _name: &str,
        _weight: f64,
        _assessments: u32,
    ) -> Envelope {
        failed()
    }

    async fn remove_subject(&self, _course_id: CourseId, _subject_id: SubjectId) -> Envelope {
        failed()
    }

    async fn add_student(&self, _course_id: CourseId, _name: &str) -> Envelope {
        failed()
    }

    async fn remove_student(&self, _course_id: CourseId, _student_id: StudentId) -> Envelope {
        failed()
    }

    async fn save_student_grades(
        &self,
        _course_id: CourseId,
        _student_id: StudentId,
        _grades: &BTreeMap<SubjectId, String>,
    ) -> Envelope {
        failed()
    }
}

#[tokio::test(flavor = "current_thread")]
async fn loader_shows_error_and_retry_when_backend_fails() {
    let mut harness = setup_view_harness(Arc::new(FailingApi), ViewKind::Loader);

    harness.rebuild();
    let html = harness.render_until("Retry").await;

    assert!(html.contains("Failed to load data."), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
    assert!(
        html.contains("notification error show"),
        "load failure not announced in {html}"
    );
    assert!(html.contains("Database unavailable."), "missing backend message in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn adding_course_applies_snapshot_and_selects_it() {
    let api = seeded_api().await;
    let initial = current_snapshot(&api).await;
    let steps = vec![Step::Run(Command::AddCourse {
        name: "  Chemistry ".to_string(),
    })];
    let mut harness = setup_view_harness(Arc::clone(&api), ViewKind::Scripted { initial, steps });

    harness.rebuild();
    let html = harness.render_until("added!").await;

    assert!(html.contains("Chemistry"), "missing new tab in {html}");
    assert!(html.contains("No students in this course."), "new course not selected in {html}");
    assert!(!html.contains("Final average"), "previous ranking still shown in {html}");
    assert!(html.contains("notification success show"), "missing banner in {html}");
    let snapshot = current_snapshot(&api).await;
    assert!(snapshot.courses().iter().any(|c| c.name() == "Chemistry"));
}

#[tokio::test(flavor = "current_thread")]
async fn removing_active_course_through_actions_moves_selection() {
    let api = AppServices::in_memory().gradebook_api();
    let alpha = api.add_course("Alpha").await.created_course.unwrap();
    api.add_course("Beta").await;
    let initial = current_snapshot(&api).await;
    let steps = vec![Step::Run(Command::RemoveCourse { course_id: alpha })];
    let mut harness = setup_view_harness(api, ViewKind::Scripted { initial, steps });

    harness.rebuild();
    let html = harness.render_until("Course removed.").await;

    assert!(!html.contains("Alpha"), "removed course still rendered in {html}");
    assert!(html.contains("Beta"), "missing remaining course in {html}");
    assert_eq!(html.matches("tab active").count(), 2, "course tab + ranking sub-tab in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn invalid_grade_flags_only_offending_input() {
    let api = seeded_api().await;
    let initial = current_snapshot(&api).await;
    let math = &initial.courses()[0];
    let ana = math.students().iter().find(|s| s.name() == "Ana").unwrap();
    let algebra = math.subjects().iter().find(|s| s.name() == "Algebra").unwrap();
    let geometry = math.subjects().iter().find(|s| s.name() == "Geometry").unwrap();
    let steps = vec![
        Step::SelectSubTab(SubTab::Grades),
        Step::Run(Command::SaveGrades {
            course_id: math.id(),
            student_id: ana.id(),
            fields: vec![
                (algebra.id(), "7.5, 11".to_string()),
                (geometry.id(), "6".to_string()),
            ],
        }),
    ];
    let (math_id, ana_id, algebra_id) = (math.id(), ana.id(), algebra.id());
    let mut harness = setup_view_harness(Arc::clone(&api), ViewKind::Scripted { initial, steps });

    harness.rebuild();
    let html = harness.render_until("input-error").await;

    assert_eq!(html.matches("input-error").count(), 1, "exactly one flagged input in {html}");
    assert!(
        html.contains("Grades must be numbers between 0 and 10."),
        "missing validation message in {html}"
    );
    assert!(html.contains("notification error show"), "missing error banner in {html}");
    assert!(html.contains("7, 8"), "pre-filled grades lost in {html}");

    let snapshot = current_snapshot(&api).await;
    let stored = snapshot.course(math_id).unwrap().students().iter().find(|s| s.id() == ana_id);
    let grades: Vec<f64> = stored
        .unwrap()
        .grades_for(algebra_id)
        .iter()
        .map(|g| g.value())
        .collect();
    assert_eq!(grades, vec![7.0, 8.0]);
}

#[tokio::test(flavor = "current_thread")]
async fn notification_hides_after_timeout() {
    let api = seeded_api().await;
    let initial = current_snapshot(&api).await;
    let steps = vec![Step::Run(Command::AddCourse {
        name: "Chemistry".to_string(),
    })];
    let mut harness = setup_view_harness(api, ViewKind::Scripted { initial, steps });

    harness.rebuild();
    let html = harness.render_until("notification success show").await;
    assert!(html.contains("added!"), "missing message in {html}");

    let html = harness
        .render_until_gone("notification success show", Duration::from_secs(5))
        .await;
    assert!(!html.contains("notification success show"), "banner never hid in {html}");
    assert!(!html.contains("added!"), "message still rendered in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn newer_notification_outlives_earlier_timer() {
    let api = seeded_api().await;
    let initial = current_snapshot(&api).await;
    let steps = vec![
        Step::Run(Command::AddCourse {
            name: "Chemistry".to_string(),
        }),
        Step::Pause(Duration::from_millis(2000)),
        Step::Run(Command::AddCourse {
            name: "Physics".to_string(),
        }),
    ];
    let mut harness = setup_view_harness(api, ViewKind::Scripted { initial, steps });

    harness.rebuild();
    harness.render_until("notification success show").await;
    let html = harness
        .render_until_within("Physics", Duration::from_secs(4))
        .await;
    assert!(html.contains("Physics"), "second course never added in {html}");

    // Past the first message's deadline, well before the second's.
    let html = harness
        .render_until_gone("notification success show", Duration::from_millis(1500))
        .await;
    assert!(
        html.contains("notification success show"),
        "earlier timer hid the newer message in {html}"
    );

    let html = harness
        .render_until_gone("notification success show", Duration::from_secs(3))
        .await;
    assert!(!html.contains("notification success show"), "banner never hid in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn manage_tab_renders_forms_and_adds_student() {
    let api = seeded_api().await;
    let initial = current_snapshot(&api).await;
    let math_id = initial.courses()[0].id();
    let steps = vec![
        Step::SelectSubTab(SubTab::Manage),
        Step::Run(Command::AddStudent {
            course_id: math_id,
            name: " Caio ".to_string(),
        }),
    ];
    let mut harness = setup_view_harness(Arc::clone(&api), ViewKind::Scripted { initial, steps });

    harness.rebuild();
    let html = harness.render_until("Caio").await;

    assert!(html.contains("Add Subject"), "missing subject form in {html}");
    assert!(html.contains("Add Student"), "missing student form in {html}");
    assert!(html.contains("notification success show"), "missing banner in {html}");
    let snapshot = current_snapshot(&api).await;
    let math = snapshot.course(math_id).unwrap();
    assert!(math.students().iter().any(|s| s.name() == "Caio"));
}
