use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use grades_core::model::Snapshot;
use services::{AppServices, GradebookApi};

use crate::context::{UiApp, build_app_context};
use crate::notify::use_notifier;
use crate::views::dashboard::scripted::{ScriptedDashboard, Step};
use crate::views::{Dashboard, DashboardView};

struct TestApp {
    gradebook: Arc<dyn GradebookApi>,
}

impl UiApp for TestApp {
    fn gradebook(&self) -> Arc<dyn GradebookApi> {
        Arc::clone(&self.gradebook)
    }
}

#[derive(Clone, PartialEq)]
pub enum ViewKind {
    /// The full view, loading its own snapshot.
    Loader,
    /// The dashboard mounted directly on a known snapshot.
    Dashboard(Snapshot),
    /// The dashboard replaying `steps` after it mounts.
    Scripted { initial: Snapshot, steps: Vec<Step> },
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewHarnessRoot(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    match props.view {
        ViewKind::Loader => rsx! { DashboardView {} },
        ViewKind::Dashboard(snapshot) => rsx! { DashboardHost { snapshot } },
        ViewKind::Scripted { initial, steps } => rsx! { ScriptedHost { initial, steps } },
    }
}

#[component]
fn DashboardHost(snapshot: Snapshot) -> Element {
    let notifier = use_notifier();
    use_context_provider(|| notifier);
    rsx! { Dashboard { initial: snapshot } }
}

#[component]
fn ScriptedHost(initial: Snapshot, steps: Vec<Step>) -> Element {
    let notifier = use_notifier();
    use_context_provider(|| notifier);
    rsx! { ScriptedDashboard { initial, steps } }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drives pending tasks until `needle` shows up or the attempts run out.
    pub async fn render_until(&mut self, needle: &str) -> String {
        self.render_until_within(needle, std::time::Duration::from_secs(1))
            .await
    }

    pub async fn render_until_within(&mut self, needle: &str, limit: std::time::Duration) -> String {
        let deadline = tokio::time::Instant::now() + limit;
        let mut html = self.render();
        while !html.contains(needle) && tokio::time::Instant::now() < deadline {
            self.drive_async().await;
            html = self.render();
        }
        html
    }

    /// Like `render_until`, but waits for `needle` to disappear, up to `limit`.
    pub async fn render_until_gone(&mut self, needle: &str, limit: std::time::Duration) -> String {
        let deadline = tokio::time::Instant::now() + limit;
        let mut html = self.render();
        while html.contains(needle) && tokio::time::Instant::now() < deadline {
            self.drive_async().await;
            html = self.render();
        }
        html
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(api: Arc<dyn GradebookApi>, view: ViewKind) -> ViewHarness {
    let app = Arc::new(TestApp { gradebook: api });
    let dom = VirtualDom::new_with_props(ViewHarnessRoot, ViewHarnessProps { app, view });
    ViewHarness { dom }
}

/// "Math" with two weighted subjects and two graded students, then an
/// empty "History".
pub async fn seeded_api() -> Arc<dyn GradebookApi> {
    let api = AppServices::in_memory().gradebook_api();

    let math = api
        .add_course("Math")
        .await
        .created_course
        .expect("math created");
    api.add_subject(math, "Algebra", 2.0, 3).await;
    api.add_subject(math, "Geometry", 1.0, 2).await;
    api.add_student(math, "Ana").await;
    let envelope = api.add_student(math, "Bia").await;

    let course = envelope
        .snapshot
        .as_ref()
        .and_then(|s| s.course(math))
        .expect("math in snapshot")
        .clone();
    let algebra = course.subjects()[0].id();
    let geometry = course.subjects()[1].id();
    for (student, algebra_text, geometry_text) in [
        (course.students()[0].id(), "7, 8", "6"),
        (course.students()[1].id(), "9", "9"),
    ] {
        let grades = [
            (algebra, algebra_text.to_owned()),
            (geometry, geometry_text.to_owned()),
        ]
        .into_iter()
        .collect();
        let saved = api.save_student_grades(math, student, &grades).await;
        assert!(saved.is_success(), "{}", saved.message);
    }

    api.add_course("History").await;
    api
}

pub async fn current_snapshot(api: &Arc<dyn GradebookApi>) -> Snapshot {
    api.full_snapshot()
        .await
        .snapshot
        .expect("snapshot available")
}
