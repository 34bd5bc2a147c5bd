use regex::Regex;
use std::sync::LazyLock;

use crate::extractor::{
    normalize::clean_city,
    structured,
    template::{FieldSelectors, Hooks, NO_HOOKS, Scope, SiteProfile, first_text, strip_site_suffix},
};

/// "Used 2018 Honda City VX in Mumbai"
static TITLE_CITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:used\s+)?(.+?)\s+in\s+([A-Za-z][A-Za-z .]*)$")
        .expect("Invalid CarWale title regex")
});

pub static PROFILE: SiteProfile = SiteProfile {
    name: "CarWale",
    hosts: &["carwale.com"],
    origin: Some("https://www.carwale.com"),
    card_selectors: &[
        "li[class*='o-brXWGL']",
        "[class*='stock-card']",
        "[class*='usedCarCard']",
        "li[class*='listing']",
    ],
    card: FieldSelectors {
        container: &[],
        title: &["h3", "a[title]", "[class*='title']"],
        price: &["[class*='price']", "[class*='Price']"],
        model: &[],
        specs: &["ul li", "[class*='spec']", "[class*='keyDetails']"],
        city: &["[class*='city']", "[class*='location']"],
        seller: &["[class*='dealer']"],
        images: &["img"],
        description: &[],
    },
    detail: FieldSelectors {
        container: &["[class*='vehicleDetail']", "[class*='stockDetail']", "main"],
        title: &["h1"],
        price: &["[class*='priceWrapper']", "[class*='price']"],
        model: &["[class*='version']"],
        specs: &["[class*='overview'] li", "[class*='specification'] li", "ul li"],
        city: &["[class*='city']", "[class*='location']"],
        seller: &["[class*='sellerName']", "[class*='dealerName']"],
        images: &["[class*='gallery'] img", "[class*='carousel'] img", "img"],
        description: &["[class*='sellerComments']", "[class*='description']"],
    },
    card_hooks: Hooks {
        title: &[title_without_city],
        city: &[city_from_title],
        ..NO_HOOKS
    },
    detail_hooks: Hooks {
        title: &[title_without_city],
        price: &[structured::price],
        images: &[structured::images],
        city: &[city_from_title],
        ..NO_HOOKS
    },
    scan_page_text: false,
};

fn title_parts(scope: &Scope<'_>, selectors: &FieldSelectors) -> Option<(String, String)> {
    let raw = strip_site_suffix(&first_text(scope.element, selectors.title)?);
    let caps = TITLE_CITY_REGEX.captures(&raw)?;
    Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
}

/// Listing headings read "Used <car> in <city>"; keep the car only.
fn title_without_city(scope: &Scope<'_>, selectors: &FieldSelectors) -> Option<String> {
    title_parts(scope, selectors).map(|(title, _)| title)
}

fn city_from_title(scope: &Scope<'_>, selectors: &FieldSelectors) -> Option<String> {
    title_parts(scope, selectors).and_then(|(_, city)| clean_city(&city))
}
