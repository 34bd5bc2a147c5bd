//! Inbound operations: URL in, [`ExtractionOutcome`] out.
//!
//! One call performs at most one fetch. Everything after the fetch is
//! synchronous, so the parsed document never lives across an `.await`.

pub mod errors;
pub mod outcome;

pub use errors::ExtractionError;
pub use outcome::{ExtractionOutcome, FailureKind};

use scraper::Html;
use serde::{Deserialize, Serialize};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::str::FromStr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;
use utoipa::ToSchema;

use crate::extractor::{self, NormalizedListing, PageType, classify, demo, looks_editorial};
use crate::fetcher::{PageResponse, PageSource};

/// Which extractor family a caller asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExtractMode {
    /// Classify the page, then fall back to the other family.
    #[default]
    Auto,
    Catalog,
    Detail,
}

impl FromStr for ExtractMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "catalog" => Ok(Self::Catalog),
            "detail" => Ok(Self::Detail),
            other => Err(format!("unknown mode '{}', expected auto, catalog or detail", other)),
        }
    }
}

pub struct ListingEngine {
    source: Arc<dyn PageSource>,
    cancel: CancellationToken,
}

impl ListingEngine {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self::with_cancellation(source, CancellationToken::new())
    }

    /// Every fetch runs under a child of `cancel`; cancelling it aborts
    /// in-flight calls with `FailureKind::Cancelled`.
    pub fn with_cancellation(source: Arc<dyn PageSource>, cancel: CancellationToken) -> Self {
        Self { source, cancel }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub async fn extract_catalog(&self, url: &str) -> ExtractionOutcome {
        self.run(url, ExtractMode::Catalog).await
    }

    pub async fn extract_detail(&self, url: &str) -> ExtractionOutcome {
        self.run(url, ExtractMode::Detail).await
    }

    pub async fn extract(&self, url: &str) -> ExtractionOutcome {
        self.run(url, ExtractMode::Auto).await
    }

    #[instrument(skip_all, fields(url = %url, mode = ?mode))]
    pub async fn run(&self, url: &str, mode: ExtractMode) -> ExtractionOutcome {
        match self.try_run(url, mode).await {
            Ok(records) => {
                info!(count = records.len(), "Extraction succeeded");
                ExtractionOutcome::success(records)
            }
            Err(e) => {
                warn!(kind = %e.kind(), "Extraction failed: {}", e);
                ExtractionOutcome::failure(&e)
            }
        }
    }

    async fn try_run(
        &self,
        raw_url: &str,
        mode: ExtractMode,
    ) -> Result<Vec<NormalizedListing>, ExtractionError> {
        let url = parse_url(raw_url)?;

        if demo::is_demo_url(&url) {
            debug!("Demo token in URL, returning fixture records");
            return Ok(demo_records(mode));
        }

        if self.cancel.is_cancelled() {
            return Err(ExtractionError::Cancelled);
        }

        let page = self.source.fetch_page(&url, self.cancel.child_token()).await?;
        extract_from_page(&page, mode)
    }
}

/// Accepts absolute `http` / `https` URLs only.
pub fn parse_url(raw: &str) -> Result<Url, ExtractionError> {
    let url = Url::parse(raw.trim()).map_err(|e| ExtractionError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ExtractionError::InvalidUrl(format!(
            "unsupported scheme: {}",
            other
        ))),
    }
}

fn demo_records(mode: ExtractMode) -> Vec<NormalizedListing> {
    let mut records = demo::listings();
    if mode == ExtractMode::Detail {
        records.truncate(1);
    }
    records
}

/// Site selection follows the final URL, after redirects.
pub fn extract_from_page(
    page: &PageResponse,
    mode: ExtractMode,
) -> Result<Vec<NormalizedListing>, ExtractionError> {
    extract_from_html(&page.body_utf8, &page.url_final, mode)
}

/// Parses and extracts. A panic inside the parser or a heuristic is reported
/// as unparseable markup instead of unwinding into the caller.
pub fn extract_from_html(
    html: &str,
    url: &Url,
    mode: ExtractMode,
) -> Result<Vec<NormalizedListing>, ExtractionError> {
    catch_unwind(AssertUnwindSafe(|| extract_parsed(html, url, mode))).map_err(|panic| {
        let detail = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "parser panicked".to_string());
        ExtractionError::UnparseableMarkup(detail)
    })?
}

fn extract_parsed(
    html: &str,
    url: &Url,
    mode: ExtractMode,
) -> Result<Vec<NormalizedListing>, ExtractionError> {
    let document = Html::parse_document(html);

    let records = match mode {
        ExtractMode::Catalog => extractor::extract_catalog(&document, url),
        ExtractMode::Detail => extractor::extract_detail(&document, url).into_iter().collect(),
        ExtractMode::Auto => {
            let page_type = classify(url, &document);
            debug!(%page_type, "Page classified");
            match page_type {
                PageType::Catalog => catalog_then_detail(&document, url),
                PageType::Detail | PageType::Unknown => detail_then_catalog(&document, url),
            }
        }
    };

    if !records.is_empty() {
        return Ok(records);
    }
    if looks_editorial(&document) {
        return Err(ExtractionError::EditorialPage);
    }
    Err(ExtractionError::NoMatch)
}

fn catalog_then_detail(document: &Html, url: &Url) -> Vec<NormalizedListing> {
    let records = extractor::extract_catalog(document, url);
    if !records.is_empty() {
        return records;
    }
    debug!("Catalog family found nothing, trying detail family");
    extractor::extract_detail(document, url).into_iter().collect()
}

fn detail_then_catalog(document: &Html, url: &Url) -> Vec<NormalizedListing> {
    if let Some(listing) = extractor::extract_detail(document, url) {
        return vec![listing];
    }
    debug!("Detail family found nothing, trying catalog family");
    extractor::extract_catalog(document, url)
}
