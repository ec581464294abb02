//! Luna: import Jupyter notebooks as Lua modules.
//!
//! A notebook is treated as a regular importable code unit: its code cells
//! are executed as one chunk in a fresh environment, and the populated
//! environment is registered under a module name for later retrieval.
//! Declared parameters can be overridden at import time without editing the
//! notebook file.
//!
//! ```no_run
//! use luna::{ImportOptions, Importer};
//!
//! let mut importer = Importer::new();
//! let module = importer.import_file(
//!     "analysis.ipynb",
//!     ImportOptions::new().name("analysis").parameter("threshold", 0.9),
//! )?;
//! let score: f64 = module.get("score")?;
//! # Ok::<(), luna::Error>(())
//! ```

use std::collections::BTreeMap;
use std::path::Path;

pub use luna_core::{
    Cell, CellKind, CellMetadata, DEFAULT_MODULE_NAME, EXCLUDE_TAG, Error, Loader, Module,
    ModuleRegistry, Notebook, PARAMETERS_TAG, ParamKind, ParamValue, Parameter, Result, Source,
};
pub use luna_core::{
    apply_overrides, combined_source, extract_parameters, filter_excluded, rewrite,
};

/// Options for one import call.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    name: Option<String>,
    parameters: BTreeMap<String, serde_json::Value>,
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the module under this name instead of
    /// [`DEFAULT_MODULE_NAME`].
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override one declared parameter.
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Override several declared parameters at once.
    pub fn parameters(mut self, values: BTreeMap<String, serde_json::Value>) -> Self {
        self.parameters.extend(values);
        self
    }
}

/// Imports notebooks and keeps the registry of resulting modules.
pub struct Importer {
    loader: Loader,
}

impl Importer {
    /// Create an importer with a fresh Lua VM and an empty registry.
    pub fn new() -> Self {
        Self {
            loader: Loader::new(),
        }
    }

    /// Import a notebook file as a module.
    pub fn import_file(&mut self, path: impl AsRef<Path>, options: ImportOptions) -> Result<Module> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "importing notebook");
        let notebook = Notebook::from_file(path)
            .inspect_err(|e| tracing::error!(path = %path.display(), "failed to read notebook: {e}"))?;
        self.import(notebook, options)
    }

    /// Import a notebook supplied as JSON text.
    pub fn import_str(&mut self, text: &str, options: ImportOptions) -> Result<Module> {
        let notebook = Notebook::from_str(text)
            .inspect_err(|e| tracing::error!("failed to parse notebook: {e}"))?;
        self.import(notebook, options)
    }

    /// Import an already-parsed notebook.
    pub fn import(&mut self, notebook: Notebook, options: ImportOptions) -> Result<Module> {
        let notebook = self.process(notebook, &options)?;
        let name = options.name.as_deref().unwrap_or(DEFAULT_MODULE_NAME);
        self.loader.load(&notebook, name)
    }

    /// Registry of previously imported modules.
    pub fn registry(&self) -> &ModuleRegistry {
        self.loader.registry()
    }

    /// The underlying loader.
    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    /// Substitute parameters (when overrides were supplied) and drop
    /// excluded cells.
    fn process(&self, notebook: Notebook, options: &ImportOptions) -> Result<Notebook> {
        let notebook = if options.parameters.is_empty() {
            notebook
        } else {
            let declared = extract_parameters(&notebook);
            let resolved = apply_overrides(declared, &options.parameters)?;
            rewrite(notebook, &resolved)
        };
        Ok(filter_excluded(notebook))
    }
}

impl Default for Importer {
    fn default() -> Self {
        Self::new()
    }
}
