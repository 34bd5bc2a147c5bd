use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::fetcher::{errors::FetchError, types::PageResponse};

/// Where the engine gets page markup from.
///
/// The engine performs exactly one `fetch_page` per invocation. Implementations
/// must stop work and return `FetchError::Cancelled` once `cancel` fires.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(
        &self,
        url: &Url,
        cancel: CancellationToken,
    ) -> Result<PageResponse, FetchError>;
}
