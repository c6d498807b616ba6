//! Error types for cloud queries.

use thiserror::Error;

/// Result type alias for cloud queries.
pub type CloudResult<T> = Result<T, CloudError>;

/// Errors reported by cloud precondition queries.
///
/// Callers treat every variant as "precondition failed"; the split only
/// exists so messages tell the user what to look at.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("project ID {0} does not exist or your credentials do not have permission to access it")]
    ProjectNotFound(String),

    #[error("region {region} is not available in project ID {project} or your credentials do not have permission to access it")]
    RegionNotFound { project: String, region: String },

    #[error("zone {zone} is not available in project ID {project} or your credentials do not have permission to access it")]
    ZoneNotFound { project: String, zone: String },

    #[error("zone {zone} is not in region {region} in project ID {project}")]
    ZoneNotInRegion {
        project: String,
        zone: String,
        region: String,
    },

    #[error("cloud credentials are not available: {0}")]
    MissingCredentials(String),

    #[error("unexpected response from {url}: HTTP {status}")]
    UnexpectedResponse { url: String, status: u16 },

    #[error("cloud query failed: {0}")]
    QueryFailed(String),

    #[error("cloud API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
