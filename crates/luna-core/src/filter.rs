//! Exclusion filtering of notebook cells.

use crate::notebook::Notebook;

/// Cells tagged with this marker are dropped before execution. Cell authors
/// rely on this exact string.
pub const EXCLUDE_TAG: &str = "import-exclude";

/// Remove every cell tagged [`EXCLUDE_TAG`], preserving the order of the
/// rest. Cells without metadata or tags are kept. Idempotent.
pub fn filter_excluded(mut notebook: Notebook) -> Notebook {
    notebook.cells.retain(|cell| !cell.has_tag(EXCLUDE_TAG));
    notebook
}
