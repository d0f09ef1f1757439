// ABOUTME: CLI module for the greshunkel template engine
// ABOUTME: Exports command line interface components and main application logic

pub mod app;
pub mod args;
pub mod commands;
pub mod config;
pub mod context_file;

pub use app::App;
pub use args::{Args, Commands};
pub use config::Config;
