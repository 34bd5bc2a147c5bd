pub mod client;
pub mod errors;
pub mod pipeline;
pub mod source;
pub mod types;

pub use client::{HttpFetcher, MAX_BODY_SIZE, REQUEST_TIMEOUT};
pub use errors::FetchError;
pub use source::PageSource;
#[cfg(test)]
pub use source::MockPageSource;
pub use types::PageResponse;
