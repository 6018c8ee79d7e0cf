use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{FetchError, TagPage};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Anything that can hand out pages of the tag listing.
#[async_trait]
pub trait TagSource: Send + Sync {
    async fn fetch_page(&self, url: &Url) -> Result<TagPage, FetchError>;
}

/// Tag listing served over HTTP (Docker Hub v2 API).
#[derive(Debug, Clone, Default)]
pub struct HttpTagSource {
    client: Client,
}

impl HttpTagSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TagSource for HttpTagSource {
    async fn fetch_page(&self, url: &Url) -> Result<TagPage, FetchError> {
        let res = self
            .client
            .get(url.clone())
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = res.bytes().await?;
        let page = serde_json::from_slice(&bytes)?;
        Ok(page)
    }
}
