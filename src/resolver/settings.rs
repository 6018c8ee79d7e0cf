use std::path::PathBuf;

use url::Url;

use crate::registry::{DEFAULT_EXCLUDED_MARKERS, DEFAULT_PAGE_SIZE, DEFAULT_REGISTRY_URL, FetchError};

/// Knobs for one resolver instance. `Default` matches the published images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Distro file, read once at construction.
    pub config_path: PathBuf,
    pub registry_url: String,
    pub page_size: u32,
    /// Repository used when no CUDA version is requested.
    pub os_repository: String,
    /// Repository whose tags are searched for CUDA images.
    pub accel_repository: String,
    /// Prefix of the OS part of a CUDA tag, `ubuntu` in `-ubuntu24.04`.
    pub os_tag_prefix: String,
    pub excluded_markers: Vec<String>,
    /// OS release used when the distro file has no entry to offer.
    pub default_os_version: String,
    /// Repository of the image being built on top of the base image.
    pub target_repository: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("ros-versions.yaml"),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            os_repository: "ubuntu".to_string(),
            accel_repository: "nvidia/cuda".to_string(),
            os_tag_prefix: "ubuntu".to_string(),
            excluded_markers: DEFAULT_EXCLUDED_MARKERS.iter().map(|m| m.to_string()).collect(),
            default_os_version: "24.04".to_string(),
            target_repository: "ros-cuda".to_string(),
        }
    }
}

impl ResolverSettings {
    /// First page of the tag listing, with the page size applied.
    pub fn first_page_url(&self) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.registry_url)?;
        url.query_pairs_mut()
            .append_pair("page_size", &self.page_size.to_string());
        Ok(url)
    }

    /// Fragment every matching CUDA tag carries, eg. `-ubuntu24.04`.
    pub fn os_suffix(&self, os_version: &str) -> String {
        format!("-{}{}", self.os_tag_prefix, os_version)
    }
}
