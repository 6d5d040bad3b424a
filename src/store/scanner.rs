// Tokensync — Store discovery
//
// Finds `<root>/<repo>/<file_name>` for every visible repository folder
// directly under the configured root, sorted case-insensitively by folder
// name. That order decides which copy of a duplicate survives a merge.

use std::fs;
use std::path::PathBuf;

use crate::config::SyncConfig;

use super::repository::JsonFileStore;
use super::StoreError;

/// Discover every store file under `config.root`.
pub fn discover_stores(config: &SyncConfig) -> Result<Vec<JsonFileStore>, StoreError> {
    let entries = fs::read_dir(&config.root).map_err(|source| StoreError::Scan {
        root: config.root.clone(),
        source,
    })?;

    let mut repos: Vec<(String, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| StoreError::Scan {
            root: config.root.clone(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        if name.starts_with('.') || !path.is_dir() {
            continue;
        }
        repos.push((name, path));
    }

    repos.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));

    let stores: Vec<JsonFileStore> = repos
        .into_iter()
        .map(|(_, dir)| dir.join(&config.file_name))
        .filter(|file| file.is_file())
        .map(JsonFileStore::new)
        .collect();

    tracing::debug!(
        root = %config.root.display(),
        found = stores.len(),
        "Store discovery completed"
    );

    Ok(stores)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
