//! Core engine for Luna: import Jupyter notebooks as Lua modules.
//!
//! This crate provides:
//! - Notebook document model (.ipynb JSON)
//! - Parameter extraction, coercion, and rewriting
//! - Exclusion-tag cell filtering
//! - Chunk compilation and execution into fresh module environments
//! - Module registry for imported notebooks

pub mod error;
pub mod filter;
pub mod loader;
pub mod notebook;
pub mod params;

pub use error::{Error, Result};
pub use filter::{EXCLUDE_TAG, filter_excluded};
pub use loader::{DEFAULT_MODULE_NAME, Loader, Module, ModuleRegistry, combined_source};
pub use notebook::{Cell, CellKind, CellMetadata, Notebook, Source};
pub use params::{
    PARAMETERS_TAG, ParamKind, ParamValue, Parameter, apply_overrides, extract_parameters,
    rewrite,
};
