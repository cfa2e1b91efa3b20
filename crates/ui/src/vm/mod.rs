mod course_vm;
mod grade_table_vm;
mod ranking_vm;

pub use course_vm::{CourseFormIds, SubTabVm, TabVm, map_course_tabs, map_sub_tabs};
pub use grade_table_vm::{
    GradeCellVm, GradeColumnVm, GradeRowVm, GradeTableVm, map_grade_table,
};
pub use ranking_vm::{RankingRowVm, format_average, map_ranking};
