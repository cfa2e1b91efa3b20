mod course_panel;
mod course_tabs;
mod grade_table;
mod manage;
mod modals;
mod notification;
mod ranking;

pub use course_panel::CoursePanel;
pub use course_tabs::{AddCourseForm, CourseTabs};
pub use modals::RemoveCourseModal;
pub use notification::NotificationBanner;
