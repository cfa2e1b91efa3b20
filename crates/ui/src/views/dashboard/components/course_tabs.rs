use dioxus::prelude::*;

use crate::dispatch::Command;
use crate::store::DashboardState;
use crate::vm::TabVm;

use super::super::actions::{DashboardActions, Outcome};

#[component]
pub fn CourseTabs(tabs: Vec<TabVm>) -> Element {
    let mut state = use_context::<Signal<DashboardState>>();

    rsx! {
        nav { class: "course-tabs",
            for tab in tabs {
                button {
                    key: "{tab.id}",
                    class: if tab.active { "tab active" } else { "tab" },
                    r#type: "button",
                    onclick: move |_| state.write().select_course(tab.id),
                    "{tab.label}"
                }
            }
        }
    }
}

#[component]
pub fn AddCourseForm() -> Element {
    let actions = use_context::<DashboardActions>();
    let mut name = use_signal(String::new);

    let submit = use_callback(move |()| {
        let actions = actions.clone();
        let command = Command::AddCourse {
            name: name.read().clone(),
        };
        spawn(async move {
            if actions.run(command).await == Outcome::Applied {
                name.set(String::new());
            }
        });
    });

    rsx! {
        div { class: "add-course",
            input {
                id: "new-course-name",
                r#type: "text",
                placeholder: "New course name",
                value: "{name}",
                oninput: move |evt| name.set(evt.value()),
            }
            button { class: "btn btn-primary", r#type: "button", onclick: move |_| submit.call(()), "Add Course" }
        }
    }
}
