//! Library exports for reuse in integration tests.
/// Backend endpoint clients.
pub mod api;
/// Application data directories.
pub mod app_dirs;
/// BI-RADS assessment categories.
pub mod birads;
/// Configuration loading and persistence.
pub mod config;
/// Dataset partitioning and export archives.
pub mod dataset;
/// Shared egui UI modules.
pub mod egui_app;
/// Shared HTTP agent and bounded response readers.
pub mod http_client;
/// Log file initialization.
pub mod logging;
/// Observable sign-in state.
pub mod session;
