mod catalog;
mod page;
mod source;

pub use catalog::{DEFAULT_EXCLUDED_MARKERS, RemoteTagCatalog, select_latest_patch};
pub use page::{TagEntry, TagPage};
pub use source::{HttpTagSource, TagSource};

/// Docker Hub listing of the CUDA image tags.
pub const DEFAULT_REGISTRY_URL: &str = "https://hub.docker.com/v2/repositories/nvidia/cuda/tags";

/// Tags requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Failure while walking the tag listing. Any of these aborts the whole walk.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("malformed tag page: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid page URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
