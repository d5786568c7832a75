pub mod api;
pub mod error;
pub mod model;
pub mod store;
pub mod tui;

mod tui_dashboard;
