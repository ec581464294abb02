//! Error types for luna-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::params::ParamKind;

/// Result type for luna-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while importing a notebook.
#[derive(Debug, Error)]
pub enum Error {
    /// Notebook text is not well-formed JSON.
    #[error("failed to parse notebook JSON: {0}")]
    Parse(String),

    /// Notebook JSON is missing required fields (cell list, cell type, source).
    #[error("invalid notebook structure: {0}")]
    Structure(String),

    /// Notebook file does not exist.
    #[error("notebook file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read notebook file.
    #[error("failed to read notebook {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// An override was supplied for a parameter the notebook does not declare.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// An override value cannot be coerced to the parameter's declared kind.
    #[error("cannot coerce {value} to {expected} for parameter {name}")]
    TypeCoercion {
        name: String,
        expected: ParamKind,
        value: String,
    },

    /// Combined cell source failed to compile. The line refers to the
    /// combined chunk, not an individual cell.
    #[error("compile error in {unit}{}: {message}", line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    Compile {
        unit: String,
        line: Option<u32>,
        message: String,
    },

    /// Runtime fault raised while executing the compiled chunk.
    #[error("execution error in {unit}: {source}")]
    Execution {
        unit: String,
        #[source]
        source: mlua::Error,
    },

    /// Lua VM error outside chunk compilation/execution.
    #[error("lua error: {0}")]
    Lua(#[from] mlua::Error),
}
