use crate::fetcher::{
    errors::FetchError,
    pipeline::{is_html_content_type, process_response},
    source::PageSource,
    types::PageResponse,
};
use async_trait::async_trait;
use bytes::BytesMut;
use reqwest::{
    Client, ClientBuilder, Response,
    header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue},
};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use url::Url;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub const MAX_BODY_SIZE: u64 = 10 * 1024 * 1024; // 10MB
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-IN,en;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers
}

/// Reqwest-backed page source. Build once and share; the inner client pools
/// connections.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    max_body_size: u64,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_limits(REQUEST_TIMEOUT, MAX_BODY_SIZE)
    }

    pub fn with_limits(timeout: Duration, max_body_size: u64) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .default_headers(browser_headers())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            timeout,
            max_body_size,
        })
    }

    /// GET `url`, bounded by the fetcher timeout and by `cancel`.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<PageResponse, FetchError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme(url.scheme().to_string()));
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            _ = tokio::time::sleep(self.timeout) => {
                debug!(timeout_secs = self.timeout.as_secs(), "fetch abandoned");
                Err(FetchError::RequestTimeout)
            }
            result = self.fetch_unbounded(url) => result,
        }
    }

    async fn fetch_unbounded(&self, url: &Url) -> Result<PageResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        // Check content length before downloading
        if let Some(content_length) = response.content_length()
            && content_length > self.max_body_size
        {
            return Err(FetchError::BodyTooLarge(content_length));
        }

        let final_url = response.url().clone();
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Http(status));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !is_html_content_type(&content_type) {
            return Err(FetchError::UnsupportedContentType(content_type));
        }

        let body = self.read_body(response).await?;
        debug!(status = %status, bytes = body.len(), "page downloaded");

        process_response(final_url, &content_type, &body)
    }

    /// Streams the body, failing as soon as it outgrows the limit so a
    /// missing or lying Content-Length never forces a full buffer.
    async fn read_body(&self, mut response: Response) -> Result<BytesMut, FetchError> {
        let mut body = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(FetchError::from_reqwest_error)?
        {
            let total = (body.len() + chunk.len()) as u64;
            if total > self.max_body_size {
                return Err(FetchError::BodyTooLarge(total));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch_page(
        &self,
        url: &Url,
        cancel: CancellationToken,
    ) -> Result<PageResponse, FetchError> {
        self.fetch(url, &cancel).await
    }
}
