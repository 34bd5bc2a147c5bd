use crate::extractor::{
    classify::CARD_SELECTORS,
    structured,
    template::{FieldSelectors, Hooks, NO_HOOKS, SiteProfile},
};

/// Broad, site-agnostic selectors. Detail pages read JSON-LD first and fall
/// back to scanning the whole body text; cards only ever read their own text.
pub static PROFILE: SiteProfile = SiteProfile {
    name: "Private",
    hosts: &[],
    origin: None,
    card_selectors: CARD_SELECTORS,
    card: FieldSelectors {
        container: &[],
        title: &[
            "h2",
            "h3",
            "h4",
            "[class*='title']",
            "[class*='Title']",
            "[class*='name']",
            "a[title]",
        ],
        price: &["[data-price]", "[class*='price']", "[class*='Price']", "[itemprop='price']"],
        model: &["[class*='model']", "[itemprop='model']"],
        specs: &["[class*='spec']", "[class*='detail']", "[class*='info']", "ul li"],
        city: &["[class*='location']", "[class*='city']", "[itemprop='addressLocality']"],
        seller: &["[class*='dealer']", "[class*='seller']"],
        images: &["img"],
        description: &[],
    },
    detail: FieldSelectors {
        container: &[],
        title: &["h1", "meta[property='og:title']", "title"],
        price: &[
            "[itemprop='price']",
            "[class*='price'] [class*='amount']",
            "[class*='price']",
            "[class*='Price']",
        ],
        model: &["[itemprop='model']", "[class*='model']", "[class*='variant']"],
        specs: &[
            "[class*='spec'] li",
            "[class*='overview'] li",
            "[class*='detail'] li",
            "table tr",
            "dl",
        ],
        city: &["[itemprop='addressLocality']", "[class*='location']", "[class*='city']"],
        seller: &["[class*='dealer-name']", "[class*='seller-name']", "[class*='sellerName']"],
        images: &[
            "[class*='gallery'] img",
            "[class*='carousel'] img",
            "[class*='slider'] img",
            "[class*='swiper'] img",
            "main img",
            "img",
        ],
        description: &["[itemprop='description']", "[class*='description']", "[class*='comments']"],
    },
    card_hooks: NO_HOOKS,
    detail_hooks: Hooks {
        title: &[structured::title],
        price: &[structured::price],
        model: &[structured::model],
        year: &[structured::year],
        distance: &[structured::distance],
        ownership: &[structured::ownership],
        city: &[structured::city],
        images: &[structured::images],
        description: &[structured::description],
    },
    scan_page_text: true,
};
