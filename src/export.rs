//! JSON export of a fetched catalog.

use crate::shopify::Product;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of an export attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The file was written.
    Written { path: PathBuf, count: usize },
    /// Nothing to export; no file was touched.
    Empty,
}

impl std::fmt::Display for ExportOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportOutcome::Written { path, count } => {
                write!(f, "Exported {} products to {}", count, path.display())
            }
            ExportOutcome::Empty => write!(f, "No products to export."),
        }
    }
}

/// Writes `products` as a pretty-printed JSON array to `path`.
///
/// Output is UTF-8 with non-ASCII characters kept as-is.
pub fn export_json(products: &[Product], path: &Path) -> Result<ExportOutcome> {
    if products.is_empty() {
        return Ok(ExportOutcome::Empty);
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, products)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    info!("Wrote {} products to {}", products.len(), path.display());

    Ok(ExportOutcome::Written { path: path.to_path_buf(), count: products.len() })
}
