//! Canonical file paths under the project's `data/` directory.

use std::path::{Path, PathBuf};

/// File name of the raw SIGACT extract.
pub const DEFAULT_INPUT_FILE: &str = "IQ_SIGACTs.csv";

/// File name of the adjusted probability artifact.
pub const DEFAULT_ARTIFACT_FILE: &str = "probabilities.parquet";

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`. Falls back to the
/// manifest directory itself if it has fewer than two ancestors.
#[must_use]
pub fn project_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Returns the default raw extract path.
#[must_use]
pub fn default_input_path() -> PathBuf {
    data_dir().join(DEFAULT_INPUT_FILE)
}

/// Returns the default artifact path.
#[must_use]
pub fn default_artifact_path() -> PathBuf {
    data_dir().join(DEFAULT_ARTIFACT_FILE)
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
