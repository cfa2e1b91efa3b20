use std::sync::Arc;

use services::{AppServices, GradebookApi};
use ui::{App, UiApp, build_app_context};

/// Dev launcher backed by an in-memory gradebook; nothing is persisted.
struct DevApp {
    gradebook: Arc<dyn GradebookApi>,
}

impl UiApp for DevApp {
    fn gradebook(&self) -> Arc<dyn GradebookApi> {
        Arc::clone(&self.gradebook)
    }
}

fn main() {
    let app: Arc<dyn UiApp> = Arc::new(DevApp {
        gradebook: AppServices::in_memory().gradebook_api(),
    });
    dioxus::LaunchBuilder::desktop()
        .with_context(build_app_context(&app))
        .launch(App);
}
