// ABOUTME: Template engine module for greshunkel
// ABOUTME: Provides the scoped context, marker matching and the line-oriented render pipeline

pub mod buffer;
pub mod context;
pub mod engine;
pub mod error;
pub mod filters;
pub mod interpolate;
pub mod loops;
pub mod matcher;
pub mod splice;
pub mod value;

pub use context::{ArrayHandle, Context, ContextLimits, FilterBinding};
pub use engine::{render, RenderOptions, TemplateEngine};
pub use error::{Position, Result, TemplateError};
pub use filters::{register_builtin_filters, BUILTIN_FILTERS};
pub use value::{Tuple, Value, ValueKind};
