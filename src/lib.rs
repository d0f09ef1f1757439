// ABOUTME: Main library module for the greshunkel template engine
// ABOUTME: Exports the render pipeline and the command line front end

pub mod cli;
pub mod template;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use template::{
    register_builtin_filters, render, Context, ContextLimits, FilterBinding, Position,
    RenderOptions, TemplateEngine, TemplateError, Tuple, Value, ValueKind,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
