use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::engine::errors::ExtractionError;
use crate::extractor::NormalizedListing;

/// Machine-readable failure class, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidUrl,
    Network,
    Timeout,
    Blocked,
    UpstreamHttp,
    OversizedResponse,
    UnparseableMarkup,
    EditorialPage,
    NoMatch,
    Cancelled,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid_url",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Blocked => "blocked",
            Self::UpstreamHttp => "upstream_http",
            Self::OversizedResponse => "oversized_response",
            Self::UnparseableMarkup => "unparseable_markup",
            Self::EditorialPage => "editorial_page",
            Self::NoMatch => "no_match",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What every engine entry point returns. Never an `Err`, never a panic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    Success {
        records: Vec<NormalizedListing>,
        count: usize,
    },
    Failure {
        reason: String,
        kind: FailureKind,
    },
}

impl ExtractionOutcome {
    pub fn success(records: Vec<NormalizedListing>) -> Self {
        let count = records.len();
        Self::Success { records, count }
    }

    pub fn failure(err: &ExtractionError) -> Self {
        Self::Failure {
            reason: err.to_string(),
            kind: err.kind(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn records(&self) -> &[NormalizedListing] {
        match self {
            Self::Success { records, .. } => records,
            Self::Failure { .. } => &[],
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}
