pub mod classify;
pub mod demo;
pub mod images;
pub mod model;
pub mod normalize;
pub mod reject;
pub mod sites;
pub mod structured;
pub mod template;

#[cfg(test)]
mod tests;

pub use classify::classify;
pub use model::{NormalizedListing, PageType};
pub use reject::looks_editorial;

use scraper::Html;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

use crate::extractor::template::SiteProfile;

/// Card elements looked at per page, whatever the page holds.
pub const MAX_CARDS: usize = 20;

/// Every complete card on a catalog page, site selectors first, generic second.
pub fn extract_catalog(document: &Html, page_url: &Url) -> Vec<NormalizedListing> {
    let profile = sites::profile_for(page_url);
    let records = extract_cards(profile, document, page_url);
    if records.is_empty() && !profile.is_generic() {
        debug!(site = profile.name, "No complete cards, retrying with generic selectors");
        return extract_cards(sites::generic(), document, page_url);
    }
    records
}

/// The listing a detail page describes, site selectors first, generic second.
pub fn extract_detail(document: &Html, page_url: &Url) -> Option<NormalizedListing> {
    let profile = sites::profile_for(page_url);
    if let Some(listing) = profile.extract_detail(document, page_url) {
        return Some(listing);
    }
    if profile.is_generic() {
        return None;
    }
    debug!(site = profile.name, "Detail selectors missed, retrying with generic selectors");
    sites::generic().extract_detail(document, page_url)
}

fn extract_cards(profile: &SiteProfile, document: &Html, page_url: &Url) -> Vec<NormalizedListing> {
    let cards = profile.find_cards(document);
    if cards.len() > MAX_CARDS {
        debug!(site = profile.name, found = cards.len(), "Card count capped at {}", MAX_CARDS);
    }

    let mut seen = HashSet::new();
    cards
        .into_iter()
        .take(MAX_CARDS)
        .filter_map(|card| profile.extract_card(card, document, page_url))
        .filter(|listing| {
            seen.insert((
                listing.title.clone(),
                listing.price,
                listing.images.first().cloned(),
            ))
        })
        .collect()
}
