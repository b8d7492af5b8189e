//! Error types for configuration analysis

use thiserror::Error;

/// Errors that can occur while loading option metadata or module lists
#[derive(Error, Debug)]
pub enum ConfError {
    /// The docs catalog is not valid JSON or has the wrong shape
    #[error("Invalid option catalog: {0}")]
    Catalog(#[from] serde_json::Error),

    /// A catalog entry carries a region value outside the known flags
    #[error("Invalid region {region} for option '{option}'")]
    InvalidRegion {
        option: String,
        region: u8,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The module listing command could not be run or failed
    #[error("Module listing failed: {0}")]
    ModuleListing(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfError>;
