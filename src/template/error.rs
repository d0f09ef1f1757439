// ABOUTME: Error types for template rendering operations
// ABOUTME: Defines lookup, type, allocation and unsupported-construct failures with input positions

use std::collections::TryReserveError;
use std::fmt;
use thiserror::Error;

use super::value::ValueKind;

/// Where in the input a failing line or loop block starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// 1-based line number
    pub line: usize,
    /// Byte offset of the start of that line
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} (byte {})", self.line, self.offset)
    }
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Unknown variable '{name}' at {position}")]
    UnknownVariable { name: String, position: Position },

    #[error("Unknown filter '{name}' at {position}")]
    UnknownFilter { name: String, position: Position },

    #[error("Variable '{name}' is {found}, expected {expected} at {position}")]
    TypeMismatch {
        name: String,
        expected: ValueKind,
        found: ValueKind,
        position: Position,
    },

    #[error("Unsupported construct {construct} '{name}' at {position}")]
    Unsupported {
        construct: &'static str,
        name: String,
        position: Position,
    },

    #[error("Substitution limit of {limit} exceeded at {position}")]
    SubstitutionLimit { limit: usize, position: Position },

    #[error("Output buffer allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("Pattern compile error: {0}")]
    Pattern(#[from] regex::Error),
}

impl TemplateError {
    /// Name of the variable, filter or construct that caused the failure, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            TemplateError::UnknownVariable { name, .. }
            | TemplateError::UnknownFilter { name, .. }
            | TemplateError::TypeMismatch { name, .. }
            | TemplateError::Unsupported { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            TemplateError::UnknownVariable { position, .. }
            | TemplateError::UnknownFilter { position, .. }
            | TemplateError::TypeMismatch { position, .. }
            | TemplateError::Unsupported { position, .. }
            | TemplateError::SubstitutionLimit { position, .. } => Some(*position),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
