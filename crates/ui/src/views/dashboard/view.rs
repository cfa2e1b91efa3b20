use std::sync::Arc;

use dioxus::prelude::*;
use grades_core::model::{CourseId, Snapshot};
use services::GradebookApi;

use crate::context::AppContext;
use crate::dispatch::Command;
use crate::notify::{NotifierHandle, Severity, use_notifier};
use crate::store::{ActiveCourse, DashboardState};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::map_course_tabs;

use super::actions::{DashboardActions, use_dashboard};
use super::components::{
    AddCourseForm, CoursePanel, CourseTabs, NotificationBanner, RemoveCourseModal,
};

async fn load_snapshot(
    api: Arc<dyn GradebookApi>,
    notifier: NotifierHandle,
) -> Result<Snapshot, ViewError> {
    let envelope = api.full_snapshot().await;
    if let Some(snapshot) = envelope.authoritative_snapshot() {
        return Ok(snapshot.clone());
    }
    tracing::warn!(message = %envelope.message, "initial snapshot unavailable");
    notifier.notify(envelope.message, Severity::Error);
    Err(ViewError::Unknown)
}

/// Loads the first snapshot, then hands over to [`Dashboard`].
#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let notifier = use_notifier();
    use_context_provider(|| notifier);

    let api = ctx.gradebook();
    let mut resource = use_resource(move || load_snapshot(Arc::clone(&api), notifier));

    let body = match view_state_from_resource(resource) {
        ViewState::Idle | ViewState::Loading => rsx! {
            p { class: "notice", "Loading..." }
        },
        ViewState::Ready(snapshot) => rsx! {
            Dashboard { initial: snapshot }
        },
        ViewState::Error(_) => rsx! {
            div { class: "notice error",
                p { {ViewError::message()} }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| resource.restart(),
                    "Retry"
                }
            }
        },
    };

    rsx! {
        NotificationBanner {}
        {body}
    }
}

/// The dashboard proper. Expects an `AppContext` and a `NotifierHandle`
/// in context.
#[component]
pub fn Dashboard(initial: Snapshot) -> Element {
    use_dashboard(initial);
    rsx! { DashboardBody {} }
}

/// Renders whatever store `use_dashboard` provided above it.
#[component]
pub(super) fn DashboardBody() -> Element {
    let state = use_context::<Signal<DashboardState>>();
    let actions = use_context::<DashboardActions>();
    let mut pending_removal = use_signal(|| None::<CourseId>);

    let (tabs, selection, revision, active) = {
        let current = state.read();
        let active = match current.active_course() {
            ActiveCourse::NoneSelected => None,
            ActiveCourse::Found(course) => Some(Ok(course.clone())),
            ActiveCourse::Missing(id) => Some(Err(id)),
        };
        (
            map_course_tabs(current.snapshot(), current.selection()),
            current.selection(),
            current.revision(),
            active,
        )
    };

    let content = match active {
        None => rsx! {
            p { class: "notice", "Select a course or add a new one to get started." }
        },
        Some(Err(missing)) => {
            tracing::warn!(course_id = %missing, "active course missing from snapshot");
            rsx! {
                p { class: "notice error", "An error occurred while displaying the selected course." }
            }
        }
        Some(Ok(course)) => {
            let course_id = course.id();
            rsx! {
                CoursePanel {
                    key: "{course_id}",
                    course,
                    sub_tab: selection.sub_tab,
                    revision,
                    on_remove: move |id| pending_removal.set(Some(id)),
                }
            }
        }
    };

    let confirm_removal = use_callback(move |()| {
        let pending = pending_removal.write().take();
        if let Some(course_id) = pending {
            actions.spawn(Command::RemoveCourse { course_id });
        }
    });

    rsx! {
        div { class: "dashboard",
            CourseTabs { tabs }
            AddCourseForm {}
            section { class: "course-content", {content} }
            if pending_removal().is_some() {
                RemoveCourseModal {
                    on_cancel: move |()| pending_removal.set(None),
                    on_confirm: move |()| confirm_removal.call(()),
                }
            }
        }
    }
}
