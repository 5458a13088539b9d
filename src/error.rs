use thiserror::Error;

/// Result type for solar_sizing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the configuration loader, the catalog adapter and the
/// project state. The calculation engines themselves never return these for
/// zero, blank or malformed numeric input.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration values out of range
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error reading a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A catalog record lacks an identifying column
    #[error("{record} record is missing required field '{field}'")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    /// Lookup by display name found nothing
    #[error("Unknown equipment: {0}")]
    UnknownEquipment(String),

    #[error("A project holds at most {max} arrays, got {0}", max = crate::types::MAX_ARRAYS)]
    TooManyArrays(usize),

    #[error("Array index {0} is out of range")]
    ArrayIndex(usize),

    /// Required selection (panel, inverter) has not been made
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// Inputs are present but the value cannot be derived from them
    #[error("Not computable: {0}")]
    NotComputable(String),
}
