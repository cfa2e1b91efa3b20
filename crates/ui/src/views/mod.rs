mod dashboard;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use dashboard::{Dashboard, DashboardView};
pub use state::{ViewError, ViewState, view_state_from_resource};
