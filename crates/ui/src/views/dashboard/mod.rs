mod actions;
mod components;
mod view;

#[cfg(test)]
pub(crate) mod scripted;

pub use view::{Dashboard, DashboardView};
