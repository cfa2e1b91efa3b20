#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod envelope;
pub mod error;
pub mod gradebook_service;

pub use api::GradebookApi;
pub use app_services::AppServices;
pub use envelope::{Envelope, Status};
pub use error::{AppServicesError, GradebookError};
pub use gradebook_service::GradebookService;
