use serde::Deserialize;

/// Raw shape of the distro file; serde is confined to this module tree.
#[derive(Debug, Deserialize)]
pub(crate) struct DistroFile {
    #[serde(alias = "distributions")]
    pub(crate) ros_versions: serde_yaml::Mapping,
}

/// Field names accepted for the companion OS release inside one entry.
pub(crate) const OS_VERSION_KEYS: &[&str] = &["ubuntu", "os_version"];

/// Companion OS release for one ROS distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistroEntry {
    os_version: String,
}

impl DistroEntry {
    pub fn new(os_version: impl Into<String>) -> Self {
        Self {
            os_version: os_version.into(),
        }
    }

    /// eg. 24.04
    pub fn os_version(&self) -> &str {
        &self.os_version
    }
}
