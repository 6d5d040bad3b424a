// Tokensync — Record Store Repository
//
// The `RecordStore` trait is the seam between the merge engine and the
// filesystem. `JsonFileStore` is the real implementation: one
// `refresh-tokens.json` file holding a JSON array of objects.
// Key design decision: `load()` never fails (a broken file is an empty
// store), while `replace_all()` always reports failure. Writes go to a
// sibling `.tmp` file that is renamed over the store, so a failed write
// leaves the previous content in place.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use super::models::{LoadResult, Record};
use super::StoreError;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over one file-backed collection of records.
pub trait RecordStore {
    /// Stable identifier used for traversal ordering and error reporting.
    fn location(&self) -> String;

    /// Key that fixes traversal order during a merge. Compared as-is, so
    /// implementations fold case themselves.
    fn sort_key(&self) -> String {
        self.location().to_lowercase()
    }

    /// Read the current content. Missing or malformed data yields an empty,
    /// invalid `LoadResult` instead of an error.
    fn load(&self) -> LoadResult;

    /// Replace the entire content with `records`.
    fn replace_all(&self, records: &[Record]) -> Result<(), StoreError>;
}

// ─── JSON File Implementation ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Render records as a pretty JSON array with 4-space indentation.
/// Non-ASCII text is written literally.
pub fn render_records(records: &[Record]) -> Result<Vec<u8>, StoreError> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    records.serialize(&mut serializer)?;
    Ok(out)
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    if let Err(e) = write_synced(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.sync_all()
}

impl RecordStore for JsonFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    /// Repository folder name, case-folded; matches discovery order.
    fn sort_key(&self) -> String {
        self.path
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| self.location().to_lowercase())
    }

    fn load(&self) -> LoadResult {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "Store unreadable, treating as empty");
                return LoadResult::invalid();
            }
        };

        let loaded = match serde_json::from_str(&text) {
            Ok(document) => LoadResult::from_document(document),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Store is not valid JSON, treating as empty");
                return LoadResult::invalid();
            }
        };

        if !loaded.was_valid {
            tracing::warn!(path = %self.path.display(), "Store is not a JSON array, treating as empty");
        } else if loaded.discarded > 0 {
            tracing::warn!(
                path = %self.path.display(),
                discarded = loaded.discarded,
                "Dropped non-object entries"
            );
        }

        loaded
    }

    fn replace_all(&self, records: &[Record]) -> Result<(), StoreError> {
        let bytes = render_records(records)?;
        atomic_write(&self.path, &bytes).map_err(|source| StoreError::Write {
            path: self.location(),
            source,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "Store overwritten"
        );
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
