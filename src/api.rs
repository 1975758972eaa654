use std::time::Duration;

use log::debug;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::mojo::BASE_URL;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch layer over the box-office site. Cheap to clone; clones share the
/// underlying connection pool.
#[derive(Clone, Debug)]
pub struct MojoClient {
    client: reqwest::Client,
    base: Url,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("bad href {href:?}: {source}")]
    BadHref {
        href: String,
        source: url::ParseError,
    },
    #[error("request for {url} failed: {source}")]
    Request { url: Url, source: reqwest::Error },
    #[error("server answered {status} for {url}")]
    Status { url: Url, status: StatusCode },
    #[error("empty response body from {url}")]
    EmptyResponse { url: Url },
}

impl MojoClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base: Url::parse(BASE_URL)?,
        })
    }

    /// Fetches `href` (absolute, or relative to the site root as the index
    /// pages link them) and returns the body text.
    pub async fn fetch_text(&self, href: &str) -> Result<String, FetchError> {
        let url = self.base.join(href).map_err(|source| FetchError::BadHref {
            href: href.to_owned(),
            source,
        })?;
        debug!("fetching {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }
        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyResponse { url });
        }
        Ok(body)
    }
}
