//! Filesystem utilities.
//!
//! Document discovery for batch runs and crash-tolerant writes for every
//! file this crate produces or rewrites in place.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::warn;

use crate::core::{AlignError, AlignResult};

/// Extension of ELAN annotation documents
pub const DOCUMENT_EXTENSION: &str = "eaf";

// =============================================================================
// Document Discovery
// =============================================================================

/// Returns true if the path has the annotation document extension.
pub fn is_document_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
}

/// Expands command-line locations into annotation document paths.
///
/// Files are taken as given when they carry the `.eaf` extension; directories
/// are scanned (non-recursively) and their `.eaf` entries collected in name
/// order. Missing locations are reported and skipped.
pub fn discover_documents<P: AsRef<Path>>(locations: &[P]) -> AlignResult<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for location in locations {
        let location = location.as_ref();
        if !location.exists() {
            warn!("Location does not exist: {}", location.display());
            continue;
        }

        if location.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(location)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file() && is_document_path(path))
                .collect();
            found.sort();
            documents.extend(found);
        } else if is_document_path(location) {
            documents.push(location.to_path_buf());
        } else {
            warn!("Not an annotation document, skipping: {}", location.display());
        }
    }

    if documents.is_empty() {
        return Err(AlignError::NoDocuments);
    }
    Ok(documents)
}

/// File name without directory and extension, used to name derived outputs.
pub fn document_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// `<dir>/<stem>_backup.<ext>` next to the given file
pub fn backup_path_for(path: &Path) -> PathBuf {
    let stem = document_stem(path);
    let file_name = match path.extension() {
        Some(ext) => format!("{}_backup.{}", stem, ext.to_string_lossy()),
        None => format!("{}_backup", stem),
    };
    path.with_file_name(file_name)
}

// =============================================================================
// Atomic Writes
// =============================================================================

/// Writes `bytes` to a temp file beside `path`, then renames it over `path`.
///
/// Readers never observe a half-written file; missing parent directories
/// are created.
pub fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> AlignResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged
        .persist(path)
        .map_err(|e| AlignError::IoError(e.error))?;
    Ok(())
}

/// Pretty-printed JSON through [`atomic_write_bytes`].
pub fn atomic_write_json_pretty<T: serde::Serialize>(path: &Path, value: &T) -> AlignResult<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    atomic_write_bytes(path, &bytes)
}
