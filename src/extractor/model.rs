use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

pub const MAX_CARD_IMAGES: usize = 10;
pub const MAX_DETAIL_IMAGES: usize = 15;

/// A car record recovered from a third-party page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedListing {
    pub images: Vec<String>,
    pub title: String,
    pub model: String,
    /// Whole rupees.
    pub price: u64,
    pub owner_name: String,
    pub year_of_purchase: i32,
    pub distance_driven: u64,
    pub ownership_count: u8,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NormalizedListing {
    /// Title, model, a positive price and at least one image.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.model.trim().is_empty()
            && self.price > 0
            && !self.images.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Catalog,
    Detail,
    Unknown,
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageType::Catalog => write!(f, "catalog"),
            PageType::Detail => write!(f, "detail"),
            PageType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Which extractor family a listing is read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Card,
    Detail,
}

impl ListingKind {
    pub fn image_cap(self) -> usize {
        match self {
            ListingKind::Card => MAX_CARD_IMAGES,
            ListingKind::Detail => MAX_DETAIL_IMAGES,
        }
    }
}
