use crate::extractor::{
    normalize::collapse_whitespace,
    template::{FieldSelectors, Hooks, NO_HOOKS, Scope, SiteProfile, first_text},
};

pub static PROFILE: SiteProfile = SiteProfile {
    name: "Spinny",
    hosts: &["spinny.com"],
    origin: Some("https://www.spinny.com"),
    card_selectors: &[
        "[class*='CarListingCard']",
        "[class*='styles__carCard']",
        "[class*='carCard']",
    ],
    card: FieldSelectors {
        container: &[],
        title: &["h3", "[class*='carName']"],
        price: &["[class*='price']", "[class*='Price']"],
        model: &["[class*='modelName']", "[class*='variant']"],
        specs: &["[class*='specs']", "[class*='carInfo'] li", "ul li"],
        city: &["[class*='hub']", "[class*='location']"],
        seller: &[],
        images: &["img"],
        description: &[],
    },
    detail: FieldSelectors {
        container: &["[class*='CarDetail']", "[class*='productDetail']", "main"],
        title: &["h1"],
        price: &["[class*='finalPrice']", "[class*='price']"],
        model: &["[class*='modelName']", "[class*='variant']"],
        specs: &["[class*='overview'] li", "[class*='specs'] li", "ul li"],
        city: &["[class*='hubName']", "[class*='location']"],
        seller: &[],
        images: &["[class*='gallery'] img", "[class*='slider'] img", "img"],
        description: &["[class*='description']"],
    },
    card_hooks: Hooks {
        title: &[title_from_make_and_model],
        ..NO_HOOKS
    },
    detail_hooks: Hooks {
        title: &[title_from_make_and_model],
        ..NO_HOOKS
    },
    scan_page_text: false,
};

/// Spinny renders make and model as separate elements with no combined heading.
fn title_from_make_and_model(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<String> {
    let make = first_text(scope.element, &["[class*='makeName']", "[class*='make']"])?;
    let model = first_text(scope.element, &["[class*='modelName']"])?;
    Some(collapse_whitespace(&format!("{} {}", make, model)))
}
