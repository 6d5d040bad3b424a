// Tokensync — Configuration
//
// The root directory and store file name are resolved once at the CLI
// boundary and handed to the scanner and engine. Nothing below this layer
// looks at the home directory or the environment.

use std::path::PathBuf;

/// File name looked for in every repository folder.
pub const DEFAULT_FILE_NAME: &str = "refresh-tokens.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Directory whose immediate children are the repository folders.
    pub root: PathBuf,
    /// Store file name inside each repository folder.
    pub file_name: String,
}

impl SyncConfig {
    pub fn new(root: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file_name: file_name.into(),
        }
    }

    /// Build from optional overrides, defaulting to the user's home directory.
    pub fn resolve(root: Option<PathBuf>, file_name: Option<String>) -> Self {
        Self::new(
            root.unwrap_or_else(default_root),
            file_name.unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        )
    }
}

/// Default root: the user's home directory.
fn default_root() -> PathBuf {
    dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."))
}
