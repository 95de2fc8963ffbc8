//! Extract registry: the built-in extract definitions.
//!
//! Each `.toml` file in `packages/source/extracts/` is baked into the binary
//! at compile time via [`include_str!`].

use crate::extract_def::{ExtractDefinition, parse_extract_toml};

/// Identifier of the definition used when none is specified.
pub const DEFAULT_EXTRACT_ID: &str = "iq_sigacts";

/// TOML configs embedded at compile time.
const EXTRACT_TOMLS: &[(&str, &str)] =
    &[(DEFAULT_EXTRACT_ID, include_str!("../extracts/iq_sigacts.toml"))];

/// Returns every built-in extract definition.
///
/// # Panics
///
/// Panics if an embedded TOML config is malformed.
#[must_use]
pub fn all_extracts() -> Vec<ExtractDefinition> {
    EXTRACT_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_extract_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Returns the default SIGACT extract definition.
///
/// # Panics
///
/// Panics if the embedded default config is malformed.
#[must_use]
pub fn default_extract() -> ExtractDefinition {
    all_extracts()
        .into_iter()
        .find(|def| def.id == DEFAULT_EXTRACT_ID)
        .unwrap_or_else(|| panic!("Missing built-in extract '{DEFAULT_EXTRACT_ID}'"))
}
