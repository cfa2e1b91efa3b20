//! Shared error types for the services crate.

use thiserror::Error;

use grades_core::model::CourseError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors raised while executing a gradebook operation.
///
/// They never cross the API boundary; `GradebookService` folds them into an
/// error `Envelope`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GradebookError {
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
