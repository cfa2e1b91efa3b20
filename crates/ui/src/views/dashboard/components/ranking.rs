use dioxus::prelude::*;
use grades_core::model::Course;

use crate::vm::map_ranking;

#[component]
pub fn RankingPanel(course: Course) -> Element {
    let rows = map_ranking(&course);

    rsx! {
        h3 { "Ranking" }
        if rows.is_empty() {
            p { "No students in this course." }
        } else {
            ol { class: "ranking",
                for row in rows {
                    li { key: "{row.student_id}", {row.line()} }
                }
            }
        }
    }
}
