//! Shared types for Pylite.
//!
//! This crate defines the AST consumed by the evaluator. Trees are built by
//! an external parser (or deserialized from JSON) and are never mutated
//! during evaluation.

mod error;
pub mod ast;

pub use error::ProgramError;

/// Result type used when loading programs.
pub type Result<T> = std::result::Result<T, ProgramError>;
