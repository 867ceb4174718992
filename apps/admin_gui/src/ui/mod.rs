//! UI layer: app shell, table pages, dashboard, and form widgets.

pub mod app;
pub mod dashboard;
pub mod pages;
pub mod views;
pub mod widgets;

pub use app::AdminApp;
