use dioxus::prelude::*;
use grades_core::model::{Course, CourseId, SubjectId};

use crate::dispatch::Command;
use crate::vm::{GradeRowVm, GradeTableVm, map_grade_table};

use super::super::actions::{DashboardActions, FlaggedGrade};

#[component]
pub fn GradeTable(course: Course, revision: u64) -> Element {
    let actions = use_context::<DashboardActions>();
    let course_id = course.id();
    let remove_subject = use_callback(move |subject_id: SubjectId| {
        actions.spawn(Command::RemoveSubject {
            course_id,
            subject_id,
        });
    });

    let (columns, rows) = match map_grade_table(&course) {
        GradeTableVm::NoSubjects => {
            return rsx! {
                h3 { "Grade Table" }
                p { class: "notice", "Add subjects to start entering grades." }
            };
        }
        GradeTableVm::Table { columns, rows } => (columns, rows),
    };
    let span = columns.len() + 2;

    rsx! {
        h3 { "Grade Table" }
        table { class: "grade-table",
            thead {
                tr {
                    th { "Student" }
                    for column in columns {
                        th { key: "{column.subject_id}",
                            "{column.header} "
                            button {
                                class: "btn-remove-small",
                                r#type: "button",
                                title: "Remove subject",
                                onclick: move |_| remove_subject.call(column.subject_id),
                                "X"
                            }
                        }
                    }
                    th { "Actions" }
                }
            }
            tbody {
                if rows.is_empty() {
                    tr {
                        td { colspan: "{span}", "No students enrolled." }
                    }
                }
                for row in rows {
                    GradeRow {
                        // A new snapshot remounts every row so inputs show the stored grades.
                        key: "{row.student_id}-{revision}",
                        course_id,
                        row,
                    }
                }
            }
        }
    }
}

#[component]
fn GradeRow(course_id: CourseId, row: GradeRowVm) -> Element {
    let actions = use_context::<DashboardActions>();
    let mut values = use_signal(|| {
        row.cells
            .iter()
            .map(|cell| cell.prefill.clone())
            .collect::<Vec<_>>()
    });
    let flagged = use_context::<Signal<Option<FlaggedGrade>>>();

    let student_id = row.student_id;
    let subject_ids: Vec<SubjectId> = row.cells.iter().map(|cell| cell.subject_id).collect();
    let cells: Vec<(usize, SubjectId, String)> = {
        let current = values.read();
        row.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let text = current.get(index).cloned().unwrap_or_default();
                (index, cell.subject_id, text)
            })
            .collect()
    };

    let remover = actions.clone();
    let save = use_callback(move |()| {
        let fields: Vec<(SubjectId, String)> = subject_ids
            .iter()
            .copied()
            .zip(values.read().iter().cloned())
            .collect();
        actions.spawn(Command::SaveGrades {
            course_id,
            student_id,
            fields,
        });
    });

    rsx! {
        tr {
            td { class: "student-name",
                "{row.name} "
                button {
                    class: "btn-remove-small",
                    r#type: "button",
                    title: "Remove student",
                    onclick: move |_| remover.spawn(Command::RemoveStudent { course_id, student_id }),
                    "X"
                }
            }
            for (index, subject_id, text) in cells {
                td { key: "{subject_id}",
                    input {
                        class: if flagged() == Some(FlaggedGrade { student_id, subject_id }) { "grade-input input-error" } else { "grade-input" },
                        r#type: "text",
                        placeholder: "e.g. 7.5, 8, 9",
                        value: "{text}",
                        oninput: move |evt| {
                            if let Some(slot) = values.write().get_mut(index) {
                                *slot = evt.value();
                            }
                        },
                    }
                }
            }
            td {
                button { class: "btn btn-primary", r#type: "button", onclick: move |_| save.call(()), "Save" }
            }
        }
    }
}
