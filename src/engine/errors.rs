use reqwest::StatusCode;
use thiserror::Error;

use crate::engine::outcome::FailureKind;
use crate::fetcher::FetchError;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("site is blocking automated requests")]
    Blocked,

    #[error("upstream returned HTTP {0}")]
    UpstreamHttp(StatusCode),

    #[error("response too large ({0} bytes)")]
    OversizedResponse(u64),

    #[error("unparseable markup: {0}")]
    UnparseableMarkup(String),

    #[error("looks like an editorial page, not a catalog")]
    EditorialPage,

    #[error("page structure not supported")]
    NoMatch,

    #[error("extraction cancelled")]
    Cancelled,
}

impl ExtractionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidUrl(_) => FailureKind::InvalidUrl,
            Self::Network(_) => FailureKind::Network,
            Self::Timeout => FailureKind::Timeout,
            Self::Blocked => FailureKind::Blocked,
            Self::UpstreamHttp(_) => FailureKind::UpstreamHttp,
            Self::OversizedResponse(_) => FailureKind::OversizedResponse,
            Self::UnparseableMarkup(_) => FailureKind::UnparseableMarkup,
            Self::EditorialPage => FailureKind::EditorialPage,
            Self::NoMatch => FailureKind::NoMatch,
            Self::Cancelled => FailureKind::Cancelled,
        }
    }

    /// Whether a caller may reasonably try the same URL again later.
    /// The engine itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::UpstreamHttp(status) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

impl From<FetchError> for ExtractionError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::UnsupportedScheme(scheme) => {
                Self::InvalidUrl(format!("unsupported scheme: {}", scheme))
            }
            FetchError::ConnectTimeout | FetchError::RequestTimeout => Self::Timeout,
            FetchError::Cancelled => Self::Cancelled,
            FetchError::Http(StatusCode::FORBIDDEN) => Self::Blocked,
            FetchError::Http(status) => Self::UpstreamHttp(status),
            FetchError::BodyTooLarge(size) => Self::OversizedResponse(size),
            FetchError::UnsupportedContentType(content_type) => {
                Self::UnparseableMarkup(format!("not an HTML page ({})", content_type))
            }
            FetchError::Charset(e) => Self::UnparseableMarkup(e),
            e @ (FetchError::Client(_)
            | FetchError::Connect(_)
            | FetchError::RedirectLoop
            | FetchError::Io(_)
            | FetchError::Unknown(_)) => Self::Network(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_mapping() {
        let blocked = ExtractionError::from(FetchError::Http(StatusCode::FORBIDDEN));
        assert!(matches!(blocked, ExtractionError::Blocked));
        assert_eq!(blocked.to_string(), "site is blocking automated requests");

        let upstream = ExtractionError::from(FetchError::Http(StatusCode::BAD_GATEWAY));
        assert_eq!(upstream.kind(), FailureKind::UpstreamHttp);
        assert!(upstream.is_retryable());

        assert_eq!(
            ExtractionError::from(FetchError::BodyTooLarge(11 * 1024 * 1024)).kind(),
            FailureKind::OversizedResponse
        );
        assert_eq!(
            ExtractionError::from(FetchError::RequestTimeout).kind(),
            FailureKind::Timeout
        );
        assert_eq!(
            ExtractionError::from(FetchError::UnsupportedScheme("ftp".into())).kind(),
            FailureKind::InvalidUrl
        );
        assert_eq!(
            ExtractionError::from(FetchError::UnsupportedContentType("application/pdf".into()))
                .kind(),
            FailureKind::UnparseableMarkup
        );
    }

    #[test]
    fn test_retryable() {
        assert!(ExtractionError::Timeout.is_retryable());
        assert!(ExtractionError::Network("reset".into()).is_retryable());
        assert!(ExtractionError::UpstreamHttp(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(!ExtractionError::UpstreamHttp(StatusCode::NOT_FOUND).is_retryable());
        assert!(!ExtractionError::Blocked.is_retryable());
        assert!(!ExtractionError::NoMatch.is_retryable());
        assert!(!ExtractionError::Cancelled.is_retryable());
    }
}
