//! Config-driven extract definition.
//!
//! [`ExtractDefinition`] captures everything unique about one raw extract:
//! column names, accepted timestamp formats and the label vocabulary for
//! each incident type. Definitions are TOML; the default one is embedded at
//! compile time (see [`crate::registry`]).

use serde::Deserialize;

use crate::SourceError;

/// A complete extract definition.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractDefinition {
    /// Unique identifier (e.g., `"iq_sigacts"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Single-byte field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// What to do with records whose type label is not mapped.
    #[serde(default)]
    pub unmapped_types: UnmappedTypePolicy,
    /// `chrono` format strings tried in order; the first that parses wins.
    pub timestamp_formats: Vec<String>,
    /// Header names of the required columns.
    pub columns: ColumnMapping,
    /// Accepted labels per incident type.
    pub types: TypeLabels,
}

const fn default_delimiter() -> char {
    ','
}

/// Header names of the three required columns.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMapping {
    /// Event timestamp column.
    pub timestamp: String,
    /// Locality identifier column.
    pub locality: String,
    /// Incident-type label column.
    pub incident_type: String,
}

/// Accepted raw labels for each incident type. Matching is
/// case-insensitive and ignores surrounding whitespace.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeLabels {
    /// Labels mapping to `EnemyAction`.
    pub enemy_action: Vec<String>,
    /// Labels mapping to `ExplosiveHazard`.
    pub explosive_hazard: Vec<String>,
    /// Labels mapping to `FriendlyFire`.
    pub friendly_fire: Vec<String>,
    /// Labels mapping to `HostNationActivity`.
    pub host_nation_activity: Vec<String>,
}

/// Handling of records whose type label matches no [`TypeLabels`] entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedTypePolicy {
    /// Keep the record for the locality set and date range, but count it
    /// toward no probability column.
    #[default]
    Ignore,
    /// Fail the run.
    Reject,
}

impl ExtractDefinition {
    /// The delimiter as the single byte the CSV reader expects.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the delimiter is not ASCII.
    pub fn delimiter_byte(&self) -> Result<u8, SourceError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| SourceError::Config {
                message: format!("delimiter {:?} is not a single ASCII byte", self.delimiter),
            })
    }

    fn validate(&self) -> Result<(), SourceError> {
        if self.timestamp_formats.is_empty() {
            return Err(SourceError::Config {
                message: format!("{}: no timestamp_formats", self.id),
            });
        }
        self.delimiter_byte()?;
        Ok(())
    }
}

/// Parses and validates an extract definition from TOML text.
///
/// # Errors
///
/// Returns [`SourceError`] if the TOML is malformed or the definition is
/// structurally invalid.
pub fn parse_extract_toml(toml_str: &str) -> Result<ExtractDefinition, SourceError> {
    let def: ExtractDefinition = toml::from_str(toml_str)?;
    def.validate()?;
    Ok(def)
}

/// Reads and parses an extract definition file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or parsed.
pub fn load_extract_toml(path: &std::path::Path) -> Result<ExtractDefinition, SourceError> {
    let contents = std::fs::read_to_string(path)?;
    let def = parse_extract_toml(&contents)?;
    log::info!("Loaded extract definition '{}' from {}", def.id, path.display());
    Ok(def)
}
