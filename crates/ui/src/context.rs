use std::sync::Arc;

use services::GradebookApi;

use crate::dispatch::Dispatcher;

pub trait UiApp: Send + Sync {
    fn gradebook(&self) -> Arc<dyn GradebookApi>;
}

#[derive(Clone)]
pub struct AppContext {
    gradebook: Arc<dyn GradebookApi>,
    dispatcher: Dispatcher,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let gradebook = app.gradebook();
        let dispatcher = Dispatcher::new(Arc::clone(&gradebook));
        Self {
            gradebook,
            dispatcher,
        }
    }

    #[must_use]
    pub fn gradebook(&self) -> Arc<dyn GradebookApi> {
        Arc::clone(&self.gradebook)
    }

    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }
}

// Provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
