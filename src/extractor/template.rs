//! The one extraction template every site profile runs through.
//!
//! Each field is read by an ordered chain of strategies: the profile's own
//! hooks first, then the default strategies below. The first `Some` wins.
//! A listing only comes out the other end if it passes the completeness gate.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

use crate::extractor::{
    images::{collect_images, filter_urls},
    model::{ListingKind, NormalizedListing},
    normalize::{
        UNKNOWN_CITY, clean_city, collapse_whitespace, current_year, derive_model, extract_city,
        extract_distance, extract_ownership, extract_year, find_currency_price, parse_price,
        truncate_chars,
    },
    reject::is_noise_title,
    structured,
};

pub const MAX_DESCRIPTION_CHARS: usize = 2000;

static EMI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bemi\b|/\s*mo(?:nth)?\b|per\s+month").expect("Failed to compile EMI regex")
});

/// One field strategy. `None` means "not here, ask the next one".
pub type Strategy<T> = fn(&Scope<'_>, &FieldSelectors) -> Option<T>;

/// CSS selector lists for one extractor family of one site, most specific first.
#[derive(Debug)]
pub struct FieldSelectors {
    /// Detail pages only: the element that holds the listing. Falls back to the whole document.
    pub container: &'static [&'static str],
    pub title: &'static [&'static str],
    pub price: &'static [&'static str],
    pub model: &'static [&'static str],
    /// Short spec lines ("2019 · 45,000 km · 1st owner") scanned before the full text.
    pub specs: &'static [&'static str],
    pub city: &'static [&'static str],
    pub seller: &'static [&'static str],
    pub images: &'static [&'static str],
    pub description: &'static [&'static str],
}

/// Site-specific strategies, tried before the defaults.
pub struct Hooks {
    pub title: &'static [Strategy<String>],
    pub price: &'static [Strategy<u64>],
    pub model: &'static [Strategy<String>],
    pub year: &'static [Strategy<i32>],
    pub distance: &'static [Strategy<u64>],
    pub ownership: &'static [Strategy<u8>],
    pub city: &'static [Strategy<String>],
    pub images: &'static [Strategy<Vec<String>>],
    pub description: &'static [Strategy<String>],
}

pub const NO_HOOKS: Hooks = Hooks {
    title: &[],
    price: &[],
    model: &[],
    year: &[],
    distance: &[],
    ownership: &[],
    city: &[],
    images: &[],
    description: &[],
};

/// Everything a strategy may look at for one listing.
pub struct Scope<'a> {
    pub element: ElementRef<'a>,
    pub document: &'a Html,
    /// Origin relative image paths are resolved against.
    pub base: Url,
    pub kind: ListingKind,
    /// Visible text of `element`.
    pub text: String,
    /// Visible text of the whole body; only set for the generic last-resort pass.
    pub page_text: Option<String>,
    /// schema.org vehicle object from JSON-LD, detail pages only.
    pub structured: Option<serde_json::Value>,
}

/// An external site (or the generic fallback) expressed as data plus hooks.
pub struct SiteProfile {
    pub name: &'static str,
    /// Registrable hosts; subdomains match too. Empty for the generic profile.
    pub hosts: &'static [&'static str],
    pub origin: Option<&'static str>,
    pub card_selectors: &'static [&'static str],
    pub card: FieldSelectors,
    pub detail: FieldSelectors,
    pub card_hooks: Hooks,
    pub detail_hooks: Hooks,
    /// Scan the whole body text when the detail container yields nothing.
    pub scan_page_text: bool,
}

impl SiteProfile {
    pub fn is_generic(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.trim_start_matches("www.").to_ascii_lowercase();
        self.hosts
            .iter()
            .any(|known| host == *known || host.ends_with(&format!(".{}", known)))
    }

    fn image_base(&self, page_url: &Url) -> Url {
        self.origin
            .and_then(|origin| Url::parse(origin).ok())
            .unwrap_or_else(|| page_url.clone())
    }

    /// Card elements for the best-matching selector variant, outermost only.
    pub fn find_cards<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        let mut best: Vec<ElementRef<'a>> = Vec::new();
        for css in self.card_selectors {
            let Ok(selector) = Selector::parse(css) else {
                continue;
            };
            let cards = outermost(document.select(&selector).collect());
            if cards.len() > best.len() {
                best = cards;
            }
        }
        best
    }

    /// One record from one catalog card, or `None` if the card fails the gate.
    pub fn extract_card(
        &self,
        card: ElementRef<'_>,
        document: &Html,
        page_url: &Url,
    ) -> Option<NormalizedListing> {
        let scope = Scope {
            element: card,
            document,
            base: self.image_base(page_url),
            kind: ListingKind::Card,
            text: visible_text(card),
            page_text: None,
            structured: None,
        };
        self.build(&scope, &self.card, &self.card_hooks)
    }

    /// The single record a detail page describes, or `None`.
    pub fn extract_detail(&self, document: &Html, page_url: &Url) -> Option<NormalizedListing> {
        let element = first_element(document.root_element(), self.detail.container)
            .unwrap_or_else(|| document.root_element());
        let page_text = self.scan_page_text.then(|| body_text(document));
        let scope = Scope {
            element,
            document,
            base: self.image_base(page_url),
            kind: ListingKind::Detail,
            text: visible_text(element),
            page_text,
            structured: structured::find_vehicle(document),
        };
        self.build(&scope, &self.detail, &self.detail_hooks)
    }

    fn build(
        &self,
        scope: &Scope<'_>,
        selectors: &FieldSelectors,
        hooks: &Hooks,
    ) -> Option<NormalizedListing> {
        let title = run_chain(hooks.title, DEFAULT_TITLE, scope, selectors)?;
        if is_noise_title(&title) {
            return None;
        }

        let price = run_chain(hooks.price, DEFAULT_PRICE, scope, selectors).filter(|price| *price > 0)?;

        let images = run_chain(hooks.images, DEFAULT_IMAGES, scope, selectors)?;

        let model = run_chain(hooks.model, DEFAULT_MODEL, scope, selectors)
            .unwrap_or_else(|| derive_model(&title));
        let year_of_purchase =
            run_chain(hooks.year, DEFAULT_YEAR, scope, selectors).unwrap_or_else(current_year);
        let distance_driven =
            run_chain(hooks.distance, DEFAULT_DISTANCE, scope, selectors).unwrap_or(0);
        let ownership_count =
            run_chain(hooks.ownership, DEFAULT_OWNERSHIP, scope, selectors).unwrap_or(1);
        let city = run_chain(hooks.city, DEFAULT_CITY, scope, selectors).unwrap_or_else(|| UNKNOWN_CITY.to_string());
        let owner_name = first_text(scope.element, selectors.seller)
            .filter(|seller| seller.chars().count() < 60)
            .unwrap_or_else(|| format!("{} Seller", self.name));
        let description = match scope.kind {
            ListingKind::Detail => {
                run_chain(hooks.description, DEFAULT_DESCRIPTION, scope, selectors)
            }
            ListingKind::Card => None,
        };

        let listing = NormalizedListing {
            images,
            title,
            model,
            price,
            owner_name,
            year_of_purchase,
            distance_driven,
            ownership_count,
            city,
            description,
        };
        listing.is_complete().then_some(listing)
    }
}

const DEFAULT_TITLE: &[Strategy<String>] = &[title_from_selectors];
const DEFAULT_PRICE: &[Strategy<u64>] = &[price_from_selectors, price_from_text, price_from_page_text];
const DEFAULT_IMAGES: &[Strategy<Vec<String>>] = &[images_from_selectors, images_from_meta];
const DEFAULT_MODEL: &[Strategy<String>] = &[model_from_selectors];
const DEFAULT_YEAR: &[Strategy<i32>] = &[year_from_text];
const DEFAULT_DISTANCE: &[Strategy<u64>] = &[distance_from_text];
const DEFAULT_OWNERSHIP: &[Strategy<u8>] = &[ownership_from_text];
const DEFAULT_CITY: &[Strategy<String>] = &[city_from_selectors, city_from_text];
const DEFAULT_DESCRIPTION: &[Strategy<String>] = &[description_from_selectors, description_from_meta];

pub fn run_chain<T>(
    hooks: &[Strategy<T>],
    defaults: &[Strategy<T>],
    scope: &Scope<'_>,
    selectors: &FieldSelectors,
) -> Option<T> {
    hooks
        .iter()
        .chain(defaults)
        .find_map(|strategy| strategy(scope, selectors))
}

/// Drops matches nested inside another match (`.car-card` vs `.car-card__img`).
pub fn outermost(elements: Vec<ElementRef<'_>>) -> Vec<ElementRef<'_>> {
    let ids: HashSet<_> = elements.iter().map(|element| element.id()).collect();
    elements
        .into_iter()
        .filter(|element| !element.ancestors().any(|ancestor| ids.contains(&ancestor.id())))
        .collect()
}

const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg"];

/// Text a reader would see: script/style bodies excluded, whitespace collapsed.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_TAGS.contains(&el.name()))
        });
        if !hidden {
            parts.push(&**text);
        }
    }
    collapse_whitespace(&parts.join(" "))
}

pub fn body_text(document: &Html) -> String {
    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());
    visible_text(body)
}

/// Text of a matched element; `<meta>` contributes its `content`.
fn element_text(element: ElementRef<'_>) -> String {
    if element.value().name() == "meta" {
        return element
            .value()
            .attr("content")
            .map(collapse_whitespace)
            .unwrap_or_default();
    }
    visible_text(element)
}

pub fn first_element<'a>(scope: ElementRef<'a>, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        scope.select(&selector).next()
    })
}

/// Every non-empty text matched by `selectors` under `scope`, in selector order.
pub fn texts(scope: ElementRef<'_>, selectors: &[&str]) -> Vec<String> {
    let mut out = Vec::new();
    for css in selectors {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        out.extend(
            scope
                .select(&selector)
                .map(element_text)
                .filter(|text| !text.is_empty()),
        );
    }
    out
}

pub fn first_text(scope: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    texts(scope, selectors).into_iter().next()
}

fn meta(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("content"))
        .map(collapse_whitespace)
        .find(|content| !content.is_empty())
}

/// "Used Honda City in Pune | SiteName" → "Used Honda City in Pune".
pub fn strip_site_suffix(title: &str) -> String {
    let title = title.split(" | ").next().unwrap_or(title);
    collapse_whitespace(title)
}

/// The first candidate decides: a teaser headline in the title slot means the
/// element is an article, not a listing, so later candidates are not consulted.
fn title_from_selectors(scope: &Scope<'_>, selectors: &FieldSelectors) -> Option<String> {
    first_text(scope.element, selectors.title).map(|title| strip_site_suffix(&title))
}

fn price_from_selectors(scope: &Scope<'_>, selectors: &FieldSelectors) -> Option<u64> {
    for css in selectors.price {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        for element in scope.element.select(&selector) {
            let value = element.value();
            if let Some(price) = ["data-price", "content", "value"]
                .iter()
                .filter_map(|attr| value.attr(attr))
                .find_map(parse_price)
            {
                return Some(price);
            }
            let text = element_text(element);
            if EMI_REGEX.is_match(&text) {
                continue;
            }
            if let Some(price) = parse_price(&text) {
                return Some(price);
            }
        }
    }
    None
}

fn price_from_text(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<u64> {
    find_currency_price(&scope.text)
}

fn price_from_page_text(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<u64> {
    scope.page_text.as_deref().and_then(find_currency_price)
}

fn model_from_selectors(scope: &Scope<'_>, selectors: &FieldSelectors) -> Option<String> {
    first_text(scope.element, selectors.model).filter(|model| model.chars().count() <= 80)
}

/// Spec lines, then the element text, then (generic only) the whole body.
fn scan_text<T>(scope: &Scope<'_>, selectors: &FieldSelectors, parse: fn(&str) -> Option<T>) -> Option<T> {
    texts(scope.element, selectors.specs)
        .iter()
        .find_map(|spec| parse(spec))
        .or_else(|| parse(&scope.text))
        .or_else(|| scope.page_text.as_deref().and_then(parse))
}

fn year_from_text(scope: &Scope<'_>, selectors: &FieldSelectors) -> Option<i32> {
    scan_text(scope, selectors, extract_year)
}

fn distance_from_text(scope: &Scope<'_>, selectors: &FieldSelectors) -> Option<u64> {
    scan_text(scope, selectors, extract_distance)
}

fn ownership_from_text(scope: &Scope<'_>, selectors: &FieldSelectors) -> Option<u8> {
    scan_text(scope, selectors, extract_ownership)
}

/// First selector match under the length limit, first comma segment.
fn city_from_selectors(scope: &Scope<'_>, selectors: &FieldSelectors) -> Option<String> {
    texts(scope.element, selectors.city)
        .iter()
        .find_map(|text| clean_city(text))
}

fn city_from_text(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<String> {
    scope.page_text.as_deref().and_then(extract_city)
}

fn images_from_selectors(scope: &Scope<'_>, selectors: &FieldSelectors) -> Option<Vec<String>> {
    let images = collect_images(scope.element, selectors.images, &scope.base, scope.kind.image_cap());
    (!images.is_empty()).then_some(images)
}

/// `og:image` for detail pages whose gallery is script-rendered.
fn images_from_meta(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<Vec<String>> {
    if scope.kind != ListingKind::Detail {
        return None;
    }
    let og_image = meta(scope.document, "meta[property='og:image']")?;
    let images = filter_urls([og_image.as_str()], &scope.base, scope.kind.image_cap());
    (!images.is_empty()).then_some(images)
}

fn description_from_selectors(scope: &Scope<'_>, selectors: &FieldSelectors) -> Option<String> {
    first_text(scope.element, selectors.description)
        .map(|text| truncate_chars(&text, MAX_DESCRIPTION_CHARS))
}

fn description_from_meta(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<String> {
    meta(scope.document, "meta[property='og:description']")
        .or_else(|| meta(scope.document, "meta[name='description']"))
        .map(|text| truncate_chars(&text, MAX_DESCRIPTION_CHARS))
}
