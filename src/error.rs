use std::path::PathBuf;

use crate::registry::FetchError;

/// Everything that can go wrong between reading the distro file and handing
/// back a base image reference.
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },
    #[error("unable to read configuration file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse configuration {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },
    #[error("CUDA version must be in the format 'X.Y' where X and Y are numeric, not '{0}'")]
    InvalidAccelVersion(String),
    #[error("CUDA is not available on this host, cannot use version '{0}'")]
    AccelUnsupported(String),
    #[error("ROS distribution must be one of the following: {}, not '{requested}'", available.join(", "))]
    UnknownDistro {
        requested: String,
        available: Vec<String>,
    },
    #[error("registry unavailable: {0}")]
    RegistryUnavailable(#[source] FetchError),
    #[error("no matching CUDA image found for version {version} containing '{os_suffix}'")]
    ImageNotFound { version: String, os_suffix: String },
    #[error("neither ROS distribution nor CUDA version specified")]
    NothingRequested,
}

impl ResolveError {
    /// `true` when the registry answered but no tag qualified; callers may
    /// carry on without a base image in that case, unlike an outage.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::ImageNotFound { .. })
    }
}
