pub mod app;
pub mod backend;
pub mod config;
pub mod constants;
pub mod events;
pub mod handlers;
pub mod logger;
pub mod session;
pub mod types;
pub mod ui;
