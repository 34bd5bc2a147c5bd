use crate::extractor::{
    normalize::collapse_whitespace,
    structured,
    template::{FieldSelectors, Hooks, NO_HOOKS, Scope, SiteProfile, first_element},
};

pub static PROFILE: SiteProfile = SiteProfile {
    name: "CarDekho",
    hosts: &["cardekho.com"],
    origin: Some("https://www.cardekho.com"),
    card_selectors: &[
        "div.gsc_col-xs-12.holder",
        "[class*='NewUcExCard']",
        "[class*='usedCarCard']",
        "li[class*='cardWrap']",
    ],
    card: FieldSelectors {
        container: &[],
        title: &["h3 a", "h3", "[class*='title']"],
        price: &["[class*='Price']", "[class*='price']"],
        model: &[],
        specs: &["[class*='dotsDetails']", "[class*='kmsDriven']", "ul.gsc_row li"],
        city: &["[class*='distanceText']", "[class*='location']", "[class*='city']"],
        seller: &["[class*='dealerName']"],
        images: &["img[class*='cardImg']", "figure img", "img"],
        description: &[],
    },
    detail: FieldSelectors {
        container: &["[class*='vdpWrap']", "[class*='overviewCard']", "main"],
        title: &["h1", "[class*='carName']"],
        price: &["[class*='priceSection'] [class*='price']", "[class*='Price']"],
        model: &["[class*='variantName']"],
        specs: &["[class*='overviewTop'] li", "[class*='specsAllList'] li", "ul li"],
        city: &["[class*='location']", "[class*='cityName']"],
        seller: &["[class*='sellerName']", "[class*='dealerName']"],
        images: &["[class*='gallery'] img", "[class*='slick'] img", "img"],
        description: &["[class*='overviewDesc']", "[class*='description']"],
    },
    card_hooks: Hooks {
        title: &[title_from_link_attribute],
        ..NO_HOOKS
    },
    detail_hooks: Hooks {
        price: &[structured::price],
        images: &[structured::images],
        year: &[structured::year],
        distance: &[structured::distance],
        ..NO_HOOKS
    },
    scan_page_text: false,
};

/// Card headings are clipped with an ellipsis; the link `title` keeps the full name.
fn title_from_link_attribute(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<String> {
    let link = first_element(scope.element, &["h3 a[title]", "a[title]"])?;
    let title = collapse_whitespace(link.value().attr("title")?);
    (!title.is_empty()).then_some(title)
}
