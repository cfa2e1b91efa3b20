use dioxus::prelude::*;
use grades_core::model::CourseId;

use crate::dispatch::Command;
use crate::vm::CourseFormIds;

use super::super::actions::{DashboardActions, Outcome};

const DEFAULT_WEIGHT: &str = "1.0";
const DEFAULT_ASSESSMENTS: &str = "3";

#[component]
pub fn ManageForms(course_id: CourseId) -> Element {
    rsx! {
        div { class: "manage-forms",
            AddSubjectForm { course_id }
            AddStudentForm { course_id }
        }
    }
}

#[component]
fn AddSubjectForm(course_id: CourseId) -> Element {
    let actions = use_context::<DashboardActions>();
    let ids = CourseFormIds::for_course(course_id);
    let mut name = use_signal(String::new);
    let mut weight = use_signal(|| DEFAULT_WEIGHT.to_owned());
    let mut assessments = use_signal(|| DEFAULT_ASSESSMENTS.to_owned());

    let submit = use_callback(move |()| {
        let actions = actions.clone();
        let command = Command::AddSubject {
            course_id,
            name: name.read().clone(),
            weight: weight.read().clone(),
            assessments: assessments.read().clone(),
        };
        spawn(async move {
            if actions.run(command).await == Outcome::Applied {
                name.set(String::new());
                weight.set(DEFAULT_WEIGHT.to_owned());
                assessments.set(DEFAULT_ASSESSMENTS.to_owned());
            }
        });
    });

    rsx! {
        div { class: "form-card",
            h3 { "Add Subject" }
            label { r#for: "{ids.subject_name}", "Subject name" }
            input {
                id: "{ids.subject_name}",
                r#type: "text",
                placeholder: "Subject name",
                value: "{name}",
                oninput: move |evt| name.set(evt.value()),
            }
            label { r#for: "{ids.subject_weight}", "Weight" }
            input {
                id: "{ids.subject_weight}",
                r#type: "number",
                step: "0.1",
                value: "{weight}",
                oninput: move |evt| weight.set(evt.value()),
            }
            label { r#for: "{ids.subject_assessments}", "Number of assessments" }
            input {
                id: "{ids.subject_assessments}",
                r#type: "number",
                min: "1",
                value: "{assessments}",
                oninput: move |evt| assessments.set(evt.value()),
            }
            button { class: "btn btn-primary", r#type: "button", onclick: move |_| submit.call(()), "Add Subject" }
        }
    }
}

#[component]
fn AddStudentForm(course_id: CourseId) -> Element {
    let actions = use_context::<DashboardActions>();
    let ids = CourseFormIds::for_course(course_id);
    let mut name = use_signal(String::new);

    let submit = use_callback(move |()| {
        let actions = actions.clone();
        let command = Command::AddStudent {
            course_id,
            name: name.read().clone(),
        };
        spawn(async move {
            if actions.run(command).await == Outcome::Applied {
                name.set(String::new());
            }
        });
    });

    rsx! {
        div { class: "form-card",
            h3 { "Add Student" }
            label { r#for: "{ids.student_name}", "Student name" }
            input {
                id: "{ids.student_name}",
                r#type: "text",
                placeholder: "Student name",
                value: "{name}",
                oninput: move |evt| name.set(evt.value()),
            }
            button { class: "btn btn-primary", r#type: "button", onclick: move |_| submit.call(()), "Add Student" }
        }
    }
}
