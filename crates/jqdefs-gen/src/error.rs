//! Error types for the generator.

use std::path::PathBuf;

/// Result type for generator operations.
pub type GenResult<T> = Result<T, GenError>;

/// Result type for literal rendering.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that abort a generator run.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// Failed to read the definition source.
    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// The definition source is malformed.
    #[error("parse error at {0}")]
    Parse(#[from] jqdefs_core::ParseError),

    /// The literal tree could not be printed.
    #[error("failed to render literal: {0}")]
    Render(#[from] RenderError),

    /// Failed to create or write the output destination.
    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// A literal tree that cannot be printed as Rust source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The top-level expression is not a map literal.
    #[error("expected a map literal at the top level")]
    NotAMap,

    /// A map literal appeared inside an entry value.
    #[error("unexpected map literal in entry {key:?}")]
    NestedMap { key: String },

    /// A path or field name is not a valid Rust identifier path.
    #[error("invalid identifier {0:?}")]
    InvalidIdent(String),

    /// The declared container type does not parse.
    #[error("invalid container type {ty:?}: {message}")]
    InvalidType { ty: String, message: String },

    /// The printed entry does not parse as a Rust expression.
    #[error("entry {key:?} is not a valid expression: {message}")]
    InvalidEntry { key: String, message: String },
}
