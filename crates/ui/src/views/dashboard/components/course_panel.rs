use dioxus::prelude::*;
use grades_core::model::{Course, CourseId};

use crate::store::{DashboardState, Selection, SubTab};
use crate::vm::map_sub_tabs;

use super::grade_table::GradeTable;
use super::manage::ManageForms;
use super::ranking::RankingPanel;

#[component]
pub fn CoursePanel(
    course: Course,
    sub_tab: SubTab,
    revision: u64,
    on_remove: EventHandler<CourseId>,
) -> Element {
    let mut state = use_context::<Signal<DashboardState>>();
    let course_id = course.id();
    let title = course.name().to_owned();
    let sub_tabs = map_sub_tabs(Selection {
        active_course: Some(course_id),
        sub_tab,
    });

    let body = match sub_tab {
        SubTab::Ranking => rsx! { RankingPanel { course: course.clone() } },
        SubTab::Grades => rsx! { GradeTable { course: course.clone(), revision } },
        SubTab::Manage => rsx! { ManageForms { course_id } },
    };

    rsx! {
        div { class: "course-card",
            div { class: "course-header",
                h2 { "{title}" }
                button {
                    class: "btn btn-danger",
                    r#type: "button",
                    onclick: move |_| on_remove.call(course_id),
                    "Remove Course"
                }
            }
            nav { class: "sub-tabs",
                for item in sub_tabs {
                    button {
                        key: "{item.label}",
                        class: if item.active { "sub-tab active" } else { "sub-tab" },
                        r#type: "button",
                        onclick: move |_| state.write().select_sub_tab(item.tab),
                        "{item.label}"
                    }
                }
            }
            div { class: "sub-tab-body", {body} }
        }
    }
}
