#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw incident extract definitions, CSV reading and label normalization.
//!
//! An [`ExtractDefinition`](extract_def::ExtractDefinition) describes where
//! the timestamp, locality and type label live in a tabular extract and how
//! to interpret them. [`reader`] turns the file into string-level
//! [`RawRecord`](reader::RawRecord)s; parsing into typed events happens in
//! the pipeline so that every validation failure is reported the same way.

pub mod extract_def;
pub mod parsing;
pub mod progress;
pub mod reader;
pub mod registry;
pub mod type_mapping;

/// Errors that can occur while loading an extract or its definition.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Extract definition TOML could not be parsed.
    #[error("Extract definition parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A column named by the extract definition is absent from the header.
    #[error("Missing required column '{column}' (available: {})", available.join(", "))]
    MissingColumn {
        /// Column the definition asked for.
        column: String,
        /// Columns actually present in the header row.
        available: Vec<String>,
    },

    /// Extract definition is structurally invalid.
    #[error("Invalid extract definition: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}
