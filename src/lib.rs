pub mod api;
pub mod app;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod money;
pub mod state;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, ApiError};
pub use app::router;
pub use config::DashboardConfig;
pub use state::AppState;
