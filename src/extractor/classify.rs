//! Catalog / detail / unknown page classification.
//!
//! URL patterns are trusted first because they are cheap and explicit; the
//! structural checks only run when the URL says nothing.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::extractor::{
    images::image_source, model::PageType, normalize::parse_dimension, template::outermost,
};

/// Detail URLs. Checked before the catalog list, so
/// `/used-cars/honda-city-2019-1234567` is a detail page.
static DETAIL_URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)/(?:listing|listings|vehicle|vehicles|ad|ads|item|car)/[\w-]*?\d{3,}/?$",
        r"(?i)/[a-z0-9]+(?:-[a-z0-9]+)+-\d{5,}/?$",
        r"(?i)/[a-z0-9-]*?\d+\.html?$",
        r"(?i)/(?:buy-used-car-details|car-details|used-car-details|vehicle-details)/",
        r"(?i)/(?:iid|itm)-\d+",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid detail URL pattern"))
    .collect()
});

static CATALOG_URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)/(?:buy-)?used-cars?(?:-[\w-]+)?",
        r"(?i)/second-hand-cars?",
        r"(?i)/cars-for-sale",
        r"(?i)/search\b",
        r"(?i)/browse\b",
        r"(?i)/inventory\b",
        r"(?i)/cars?_c\d+",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid catalog URL pattern"))
    .collect()
});

/// Repeated-card selector variants. The largest count across variants decides.
pub const CARD_SELECTORS: &[&str] = &[
    "[class*='car-card']",
    "[class*='carCard']",
    "[class*='CarCard']",
    "[class*='listing-card']",
    "[class*='listingCard']",
    "[class*='vehicle-card']",
    "[class*='vehicleCard']",
    "[class*='product-card']",
    "[class*='search-result']",
    "[class*='srp-card']",
    "[data-testid*='card']",
    "[data-aut-id='itemBox']",
    "article[class*='car']",
    "li[class*='listing']",
];

const DETAIL_LAYOUT_SELECTORS: &[&str] = &[
    "[class*='gallery']",
    "[class*='Gallery']",
    "[class*='carousel']",
    "[class*='Carousel']",
    "[class*='slider']",
    "[class*='swiper']",
    "[class*='vehicle-detail']",
    "[class*='vehicleDetail']",
    "[class*='car-detail']",
    "[class*='carDetail']",
];

const LARGE_IMAGE_PX: u32 = 400;
const LARGE_IMAGE_SET: usize = 3;

fn matches_any(patterns: &[Regex], haystack: &str) -> bool {
    patterns.iter().any(|pattern| pattern.is_match(haystack))
}

fn url_haystack(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

pub fn is_detail_url(url: &Url) -> bool {
    matches_any(&DETAIL_URL_PATTERNS, url.path())
}

pub fn is_catalog_url(url: &Url) -> bool {
    matches_any(&CATALOG_URL_PATTERNS, &url_haystack(url))
}

/// Largest card count over the selector variants, counting outermost matches
/// only, as card discovery does.
pub fn max_card_count(document: &Html) -> usize {
    CARD_SELECTORS
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .map(|selector| outermost(document.select(&selector).collect()).len())
        .max()
        .unwrap_or(0)
}

fn is_large_image(element: &scraper::ElementRef<'_>) -> bool {
    let value = element.value();
    let sized = ["width", "height"]
        .iter()
        .filter_map(|attr| value.attr(attr).and_then(parse_dimension))
        .any(|px| px >= LARGE_IMAGE_PX);
    let hinted = value.attr("class").is_some_and(|class| {
        let class = class.to_lowercase();
        ["main", "large", "hero", "zoom", "primary"]
            .iter()
            .any(|hint| class.contains(hint))
    });
    (sized || hinted) && image_source(element).is_some()
}

/// Gallery/carousel markup, or a set of at least three large images.
pub fn has_detail_layout(document: &Html) -> bool {
    let has_marker = DETAIL_LAYOUT_SELECTORS
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .any(|selector| document.select(&selector).next().is_some());
    if has_marker {
        return true;
    }

    let Ok(img) = Selector::parse("img") else {
        return false;
    };
    document
        .select(&img)
        .filter(is_large_image)
        .take(LARGE_IMAGE_SET)
        .count()
        >= LARGE_IMAGE_SET
}

/// First matching rule wins:
/// detail URL, catalog URL, several cards, detail layout, one lone card, unknown.
pub fn classify(url: &Url, document: &Html) -> PageType {
    if is_detail_url(url) {
        return PageType::Detail;
    }
    if is_catalog_url(url) {
        return PageType::Catalog;
    }

    let cards = max_card_count(document);
    if cards > 1 {
        return PageType::Catalog;
    }
    if has_detail_layout(document) {
        return PageType::Detail;
    }
    if cards == 1 {
        return PageType::Detail;
    }
    PageType::Unknown
}
