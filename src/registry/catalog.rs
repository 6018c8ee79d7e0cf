use regex::Regex;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use url::Url;

use super::{FetchError, TagSource};
use crate::error::ResolveError;
use crate::helpers::validation::AccelVersion;

/// Variant markers that disqualify a tag: runtime-only and cuDNN builds.
pub const DEFAULT_EXCLUDED_MARKERS: &[&str] = &["runtime", "cudnn"];

/// Lazily fetched list of every tag in the accelerator image repository.
///
/// The listing is fetched on first use and kept for the lifetime of the
/// catalog. A failed fetch caches nothing, so the next call starts over from
/// the first page. Concurrent callers share a single fetch.
pub struct RemoteTagCatalog<S> {
    source: S,
    first_page: Url,
    excluded_markers: Vec<String>,
    tags: OnceCell<Vec<String>>,
}

impl<S: TagSource> RemoteTagCatalog<S> {
    pub fn new(source: S, first_page: Url, excluded_markers: Vec<String>) -> Self {
        Self {
            source,
            first_page,
            excluded_markers,
            tags: OnceCell::new(),
        }
    }

    /// Newest tag for `version` whose name contains `os_suffix`.
    pub async fn latest_patch(&self, version: &AccelVersion, os_suffix: &str) -> Result<String, ResolveError> {
        let tags = self.tags().await.map_err(ResolveError::RegistryUnavailable)?;

        let tag = select_latest_patch(tags, version, os_suffix, self.excluded_markers.as_slice()).ok_or_else(|| {
            ResolveError::ImageNotFound {
                version: version.to_string(),
                os_suffix: os_suffix.to_string(),
            }
        })?;

        info!(%version, os_suffix = %os_suffix, tag = %tag, "selected base image tag");
        Ok(tag.to_string())
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether the listing has been fetched already.
    pub fn is_populated(&self) -> bool {
        self.tags.initialized()
    }

    async fn tags(&self) -> Result<&[String], FetchError> {
        if let Some(tags) = self.tags.get() {
            debug!(count = tags.len(), "tag catalog cache hit");
        }
        self.tags.get_or_try_init(|| self.fetch_all()).await.map(Vec::as_slice)
    }

    async fn fetch_all(&self) -> Result<Vec<String>, FetchError> {
        let mut tags = Vec::new();
        let mut next = Some(self.first_page.clone());
        let mut pages = 0usize;

        while let Some(url) = next {
            debug!(url = %url, "fetching tag page");
            let (names, next_page) = self.source.fetch_page(&url).await?.into_parts();
            tags.extend(names);
            pages += 1;

            next = next_page.map(|raw| Url::parse(&raw)).transpose()?;
        }

        debug!(pages, count = tags.len(), "tag catalog populated");
        Ok(tags)
    }
}

/// Pick the tag with the numerically largest patch for `version`.
///
/// A tag qualifies when it starts with the version, contains `os_suffix` and
/// carries none of `excluded_markers`. Qualifying tags without a numeric
/// patch right after `X.Y.` are skipped. On equal patches the first one seen
/// wins.
pub fn select_latest_patch<'a, T: AsRef<str>>(
    tags: &'a [String],
    version: &AccelVersion,
    os_suffix: &str,
    excluded_markers: &[T],
) -> Option<&'a str> {
    let patch_re = Regex::new(&format!(r"^{}\.(\d+)", regex::escape(version.as_str()))).ok()?;

    let mut latest: Option<(u64, &str)> = None;
    for tag in tags {
        if !tag.starts_with(version.as_str())
            || !tag.contains(os_suffix)
            || excluded_markers.iter().any(|m| tag.contains(AsRef::<str>::as_ref(m)))
        {
            continue;
        }

        let Some(patch) = patch_re
            .captures(tag)
            .and_then(|c| c[1].parse::<u64>().ok())
        else {
            continue;
        };

        if latest.is_none_or(|(best, _)| patch > best) {
            latest = Some((patch, tag.as_str()));
        }
    }

    latest.map(|(_, tag)| tag)
}
