use crate::extractor::{
    normalize::parse_price,
    template::{FieldSelectors, Hooks, NO_HOOKS, Scope, SiteProfile},
};

pub static PROFILE: SiteProfile = SiteProfile {
    name: "Cars24",
    hosts: &["cars24.com"],
    origin: Some("https://www.cars24.com"),
    card_selectors: &[
        "a[class*='styles_carCardWrapper']",
        "[class*='styles_normalCardWrapper']",
        "[data-testid='car-card']",
        "[class*='carCard']",
    ],
    card: FieldSelectors {
        container: &[],
        title: &["h3", "[class*='carName']", "[class*='title']"],
        price: &["[class*='styles_price']", "[class*='Price']", "strong"],
        model: &[],
        specs: &["[class*='styles_kmsFuel']", "ul li", "p[class*='spec']"],
        city: &["[class*='styles_location']", "[class*='location']"],
        seller: &[],
        images: &["img"],
        description: &[],
    },
    detail: FieldSelectors {
        container: &["[class*='styles_vdpContainer']", "main"],
        title: &["h1"],
        price: &["[class*='styles_finalPrice']", "[class*='Price']", "[class*='price']"],
        model: &[],
        specs: &["[class*='styles_overviewList'] li", "[class*='specs'] li", "ul li"],
        city: &["[class*='styles_location']", "[class*='location']"],
        seller: &[],
        images: &["[class*='gallery'] img", "[class*='carousel'] img", "img"],
        description: &["[class*='description']"],
    },
    card_hooks: Hooks {
        price: &[price_from_card_attribute],
        ..NO_HOOKS
    },
    detail_hooks: NO_HOOKS,
    scan_page_text: false,
};

/// The card anchor carries the list price as `data-price`; the visible price
/// is often the EMI teaser.
fn price_from_card_attribute(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<u64> {
    scope.element.value().attr("data-price").and_then(parse_price)
}
