#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! On-disk storage for the exposure pipeline.
//!
//! The only persisted table is the adjusted probability artifact, written
//! as Parquet through an in-memory `DuckDB` connection. See [`artifact`].

pub mod artifact;
pub mod paths;

/// Errors that can occur while writing or reading the artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// `DuckDB` query or export error.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// I/O error (directory creation, rename, cleanup).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No artifact exists at the given path.
    #[error("No artifact at {}", path.display())]
    Missing {
        /// Path that was looked up.
        path: std::path::PathBuf,
    },

    /// The file does not hold the expected columns or values.
    #[error("Artifact schema error: {message}")]
    Schema {
        /// Description of what went wrong.
        message: String,
    },
}
