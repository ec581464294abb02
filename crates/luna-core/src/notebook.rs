//! Jupyter notebook (.ipynb) document model.
//!
//! Deserializes just enough of the nbformat 4 schema to locate cells, their
//! kinds, tags, and source text. Everything else rides along untouched in
//! `extra` maps.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A parsed notebook: an ordered sequence of cells plus format metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notebook {
    /// Format version (4 for every notebook we care about).
    pub nbformat: u32,

    /// Minor format version.
    #[serde(default)]
    pub nbformat_minor: u32,

    /// Notebook-level metadata (kernelspec etc.), opaque to the pipeline.
    #[serde(default)]
    pub metadata: Value,

    /// Notebook cells, in document order.
    pub cells: Vec<Cell>,
}

/// A single notebook cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// Cell kind; only `Code` cells are executed.
    pub cell_type: CellKind,

    /// Cell metadata, including tags.
    #[serde(default)]
    pub metadata: CellMetadata,

    /// Source text, either a list of lines or a single string.
    pub source: Source,

    /// Remaining cell fields (outputs, execution_count, ...), preserved as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Cell kind as recorded in `cell_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// Executable code cell.
    Code,
    /// Markdown documentation cell.
    Markdown,
    /// Raw cell.
    Raw,
    /// Any kind introduced by a newer schema; treated as non-code.
    #[serde(other)]
    Other,
}

/// Cell metadata. Only `tags` is interpreted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CellMetadata {
    /// Tags attached to the cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Remaining metadata fields, preserved as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Cell source: nbformat allows a list of lines or one string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    /// Line list; lines keep their trailing newlines.
    Lines(Vec<String>),
    /// Single string.
    Text(String),
}

impl Notebook {
    /// Parse a notebook from its JSON text.
    ///
    /// Malformed JSON yields [`Error::Parse`]; well-formed JSON missing
    /// required fields yields [`Error::Structure`].
    pub fn from_str(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| Error::Parse(e.to_string()))?;
        serde_json::from_value(value).map_err(|e| Error::Structure(e.to_string()))
    }

    /// Read and parse a notebook file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Read {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            }
        })?;
        Self::from_str(&text)
    }

    /// Iterate over code cells in document order.
    pub fn code_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.is_code())
    }
}

impl Cell {
    /// Whether this is an executable code cell.
    pub fn is_code(&self) -> bool {
        self.cell_type == CellKind::Code
    }

    /// Whether the cell's metadata carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata
            .tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|t| t == tag))
    }
}

impl Source {
    /// The cell source as one string. Lines are concatenated without adding
    /// separators, matching nbformat's convention of newline-terminated lines.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Source::Lines(lines) => Cow::Owned(lines.concat()),
            Source::Text(text) => Cow::Borrowed(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_line_list_and_string_sources() {
        let json = r##"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {},
            "cells": [
                {"cell_type": "code", "metadata": {}, "source": ["x = 1\n", "y = 2"]},
                {"cell_type": "markdown", "metadata": {}, "source": "# Title"}
            ]
        }"##;
        let nb = Notebook::from_str(json).unwrap();
        assert_eq!(nb.cells.len(), 2);
        assert_eq!(nb.cells[0].source.text(), "x = 1\ny = 2");
        assert_eq!(nb.cells[1].source.text(), "# Title");
        assert_eq!(nb.code_cells().count(), 1);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = Notebook::from_str("{not json").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn missing_cells_is_structure_error() {
        let err = Notebook::from_str(r#"{"nbformat": 4, "metadata": {}}"#).unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
    }

    #[test]
    fn missing_cell_type_is_structure_error() {
        let json = r#"{"nbformat": 4, "cells": [{"metadata": {}, "source": ""}]}"#;
        let err = Notebook::from_str(json).unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
    }

    #[test]
    fn unknown_cell_kind_is_not_code() {
        let json = r#"{
            "nbformat": 4,
            "cells": [{"cell_type": "widget", "metadata": {}, "source": ""}]
        }"#;
        let nb = Notebook::from_str(json).unwrap();
        assert_eq!(nb.cells[0].cell_type, CellKind::Other);
        assert!(!nb.cells[0].is_code());
    }

    #[test]
    fn reads_notebook_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nb.ipynb");
        std::fs::write(
            &path,
            r#"{"nbformat": 4, "metadata": {}, "cells": [
                {"cell_type": "code", "metadata": {}, "source": "x = 1"}
            ]}"#,
        )
        .unwrap();
        let nb = Notebook::from_file(&path).unwrap();
        assert_eq!(nb.cells.len(), 1);
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Notebook::from_file(dir.path().join("absent.ipynb")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn missing_metadata_means_no_tags() {
        let json = r#"{
            "nbformat": 4,
            "cells": [{"cell_type": "code", "source": "x = 1"}]
        }"#;
        let nb = Notebook::from_str(json).unwrap();
        assert!(!nb.cells[0].has_tag("import-exclude"));
    }
}
