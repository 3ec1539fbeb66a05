pub mod app;
pub mod buffer;
pub mod cli;
pub mod config;
pub mod engine;
pub mod host;
pub mod input;
pub mod logging;
pub mod paths;
pub mod plugin;

mod ui;
