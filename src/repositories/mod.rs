mod models;

use std::{fs, io, path::Path};

use serde_yaml::Value;
use tracing::debug;

use crate::error::ResolveError;
use models::{DistroFile, OS_VERSION_KEYS};

pub use models::DistroEntry; // Re-export the model type to callers.

/// Key that stands for "no distribution requested" in the distro file.
const DEFAULT_KEY: &str = "default";

/// Mapping from ROS distribution to its companion OS release, in file order.
///
/// The `default` entry of the file is kept apart from the named ones, so an
/// unset distribution and an explicit default resolve through the same slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistroConfig {
    default: Option<DistroEntry>,
    named: Vec<(String, DistroEntry)>,
}

impl DistroConfig {
    /// Load from a YAML file path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ResolveError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ResolveError::ConfigNotFound {
                path: path.to_path_buf(),
            },
            _ => ResolveError::ConfigRead {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let config = parse(&data, path)?;
        debug!(
            path = %path.display(),
            distros = config.named.len(),
            has_default = config.default.is_some(),
            "loaded distro configuration"
        );
        Ok(config)
    }

    /// Load from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ResolveError> {
        parse(yaml, Path::new("<inline>"))
    }

    /// OS release for `distro`, or for the default slot when `None`.
    pub fn os_version_for(&self, distro: Option<&str>) -> Option<&str> {
        match distro {
            None => self.default.as_ref().map(DistroEntry::os_version),
            Some(name) => self
                .named
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, entry)| entry.os_version()),
        }
    }

    /// Configured distribution names, in file order.
    pub fn distro_names(&self) -> Vec<String> {
        self.named.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn default_entry(&self) -> Option<&DistroEntry> {
        self.default.as_ref()
    }
}

fn parse(yaml: &str, path: &Path) -> Result<DistroConfig, ResolveError> {
    let parse_error = |message: String| ResolveError::ConfigParse {
        path: path.to_path_buf(),
        message,
    };

    let file: DistroFile = serde_yaml::from_str(yaml).map_err(|e| parse_error(e.to_string()))?;

    let mut config = DistroConfig::default();
    for (key, value) in file.ros_versions {
        let name = scalar_to_string(&key)
            .ok_or_else(|| parse_error(format!("distribution key {key:?} is not a scalar")))?;
        let entry = parse_entry(&name, &value).map_err(parse_error)?;

        if name == DEFAULT_KEY {
            config.default = Some(entry);
        } else if config.named.iter().any(|(n, _)| *n == name) {
            return Err(parse_error(format!("distribution '{name}' is listed twice")));
        } else {
            config.named.push((name, entry));
        }
    }

    Ok(config)
}

fn parse_entry(name: &str, value: &Value) -> Result<DistroEntry, String> {
    let mapping = value
        .as_mapping()
        .ok_or_else(|| format!("distribution '{name}' must be a mapping"))?;

    let value = OS_VERSION_KEYS
        .iter()
        .find_map(|key| mapping.get(*key))
        .ok_or_else(|| format!("distribution '{name}' has no OS version"))?;

    match value {
        Value::String(os_version) => Ok(DistroEntry::new(os_version.clone())),
        // `24.10` would come back as the float 24.1
        Value::Number(n) => Err(format!(
            "OS version {n} of distribution '{name}' must be a quoted string, eg. \"24.10\""
        )),
        _ => Err(format!("distribution '{name}' has no OS version")),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
