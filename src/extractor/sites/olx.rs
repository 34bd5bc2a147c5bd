use crate::extractor::template::{FieldSelectors, NO_HOOKS, SiteProfile};

pub static PROFILE: SiteProfile = SiteProfile {
    name: "OLX",
    hosts: &["olx.in"],
    origin: Some("https://www.olx.in"),
    card_selectors: &["li[data-aut-id='itemBox']", "[data-aut-id='itemBox']"],
    card: FieldSelectors {
        container: &[],
        title: &["[data-aut-id='itemTitle']"],
        price: &["[data-aut-id='itemPrice']"],
        model: &[],
        specs: &["[data-aut-id='itemDetails']", "[data-aut-id='itemSubTitle']"],
        city: &["[data-aut-id='item-location']"],
        seller: &[],
        images: &["figure img", "img"],
        description: &[],
    },
    detail: FieldSelectors {
        container: &["[data-aut-id='ad-page']", "main"],
        title: &["[data-aut-id='itemTitle']", "h1"],
        price: &["[data-aut-id='itemPrice']"],
        model: &["[data-aut-id='value_model']"],
        specs: &["[data-aut-id='itemParams']", "[data-aut-id='itemParams'] span"],
        city: &["[data-aut-id='itemLocation']", "[data-aut-id='item-location']"],
        seller: &["[data-aut-id='profileCard'] [data-aut-id='name']", "[data-aut-id='profileCard'] a"],
        images: &["[data-aut-id='defaultImg']", "figure img", "img"],
        description: &["[data-aut-id='itemDescriptionContent']"],
    },
    card_hooks: NO_HOOKS,
    detail_hooks: NO_HOOKS,
    scan_page_text: false,
};
