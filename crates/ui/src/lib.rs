pub mod app;
pub mod context;
pub mod dispatch;
pub mod notify;
pub mod routes;
pub mod store;
pub mod views;
pub mod vm;

pub use app::App;
pub use context::{AppContext, UiApp, build_app_context};
