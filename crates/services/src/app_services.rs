use std::sync::Arc;

use storage::repository::Storage;

use crate::api::GradebookApi;
use crate::error::AppServicesError;
use crate::gradebook_service::GradebookService;

/// Assembles app-facing services on top of a storage backend.
#[derive(Clone)]
pub struct AppServices {
    gradebook: Arc<GradebookService>,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: &Storage) -> Self {
        let gradebook = Arc::new(GradebookService::new(Arc::clone(&storage.gradebook)));
        Self { gradebook }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(&storage))
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(&Storage::in_memory())
    }

    #[must_use]
    pub fn gradebook(&self) -> Arc<GradebookService> {
        Arc::clone(&self.gradebook)
    }

    /// The gradebook behind the API trait, as handed to the UI.
    #[must_use]
    pub fn gradebook_api(&self) -> Arc<dyn GradebookApi> {
        let api: Arc<dyn GradebookApi> = self.gradebook.clone();
        api
    }
}
