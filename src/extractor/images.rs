//! Image candidate filtering: content photos in, logos and chrome out.

use scraper::{ElementRef, Selector};
use std::collections::HashSet;
use url::Url;

use crate::extractor::normalize::parse_dimension;

/// Attributes that may carry an image URL, in priority order. The `srcset`
/// variants contribute their first entry only.
const IMAGE_ATTRIBUTES: &[&str] = &[
    "src",
    "data-src",
    "data-lazy-src",
    "data-original",
    "data-lazy",
    "data-url",
    "srcset",
    "data-srcset",
];

/// Matched anywhere in the URL.
const DECORATIVE_MARKERS: &[&str] = &[
    "logo",
    "icon",
    "sprite",
    "placeholder",
    "avatar",
    "no-image",
    "noimage",
    "default-car",
];

/// Matched against whole URL tokens, so "star" never rejects "mustard-red.jpg".
const DECORATIVE_TOKENS: &[&str] = &[
    "badge",
    "loader",
    "loading",
    "spinner",
    "blank",
    "pixel",
    "transparent",
    "emoji",
    "flag",
    "banner",
    "rating",
    "star",
    "whatsapp",
    "playstore",
    "appstore",
];

const DECORATIVE_EXTENSIONS: &[&str] = &[".svg", ".gif", ".ico"];

const TRACKING_HOSTS: &[&str] = &["doubleclick.net", "facebook.com", "google-analytics.com"];

const MIN_DIMENSION: u32 = 60;

/// What the filter knows about one image reference.
#[derive(Debug, Clone, Default)]
pub struct ImageCandidate<'a> {
    pub url: &'a str,
    pub alt: Option<&'a str>,
    pub class: Option<&'a str>,
    pub width: Option<&'a str>,
    pub height: Option<&'a str>,
}

impl<'a> ImageCandidate<'a> {
    pub fn from_url(url: &'a str) -> Self {
        Self {
            url,
            ..Self::default()
        }
    }

    fn from_element(url: &'a str, element: &ElementRef<'a>) -> Self {
        let value = element.value();
        Self {
            url,
            alt: value.attr("alt"),
            class: value.attr("class"),
            width: value.attr("width"),
            height: value.attr("height"),
        }
    }
}

/// `true` for something that looks like a photo of the car.
pub fn is_content_image(candidate: &ImageCandidate<'_>) -> bool {
    let url = candidate.url.trim().to_lowercase();
    if url.is_empty() || url.starts_with("data:") || url.starts_with("javascript:") {
        return false;
    }

    let path = url.split(['?', '#']).next().unwrap_or_default();
    if DECORATIVE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return false;
    }
    if DECORATIVE_MARKERS.iter().any(|marker| url.contains(marker)) {
        return false;
    }
    if url
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| DECORATIVE_TOKENS.contains(&token))
    {
        return false;
    }
    if TRACKING_HOSTS.iter().any(|host| url.contains(host)) {
        return false;
    }

    let attribute_flags = [candidate.class, candidate.alt]
        .into_iter()
        .flatten()
        .map(str::to_lowercase)
        .any(|attr| {
            ["logo", "icon", "avatar", "sprite", "badge"]
                .iter()
                .any(|marker| attr.contains(marker))
        });
    if attribute_flags {
        return false;
    }

    let too_small = [candidate.width, candidate.height]
        .into_iter()
        .flatten()
        .filter_map(parse_dimension)
        .any(|px| px < MIN_DIMENSION);
    !too_small
}

fn first_srcset_entry(srcset: &str) -> Option<&str> {
    srcset
        .split(',')
        .next()
        .and_then(|entry| entry.split_whitespace().next())
}

/// The best URL an element offers, following `IMAGE_ATTRIBUTES` order.
pub fn image_source<'a>(element: &ElementRef<'a>) -> Option<&'a str> {
    let value = element.value();
    IMAGE_ATTRIBUTES.iter().find_map(|attr| {
        let raw = value.attr(attr)?.trim();
        let raw = if attr.ends_with("srcset") {
            first_srcset_entry(raw)?
        } else {
            raw
        };
        // A lazy-loading placeholder in `src` must not hide the real `data-src`.
        (!raw.is_empty() && !raw.starts_with("data:")).then_some(raw)
    })
}

/// Absolute, filtered, de-duplicated image URLs from `selectors` under `scope`.
pub fn collect_images(
    scope: ElementRef<'_>,
    selectors: &[&str],
    base: &Url,
    cap: usize,
) -> Vec<String> {
    let mut images = Vec::new();
    let mut seen = HashSet::new();

    for css in selectors {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        for element in scope.select(&selector) {
            let Some(raw) = image_source(&element) else {
                continue;
            };
            if !is_content_image(&ImageCandidate::from_element(raw, &element)) {
                continue;
            }
            let Some(absolute) = absolutize(raw, base) else {
                continue;
            };
            if seen.insert(absolute.clone()) {
                images.push(absolute);
                if images.len() >= cap {
                    return images;
                }
            }
        }
    }

    images
}

/// Filters, absolutizes and de-duplicates bare URLs (structured data, meta tags).
pub fn filter_urls<'a>(urls: impl IntoIterator<Item = &'a str>, base: &Url, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| is_content_image(&ImageCandidate::from_url(url)))
        .filter_map(|url| absolutize(url, base))
        .filter(|url| seen.insert(url.clone()))
        .take(cap)
        .collect()
}

pub fn absolutize(raw: &str, base: &Url) -> Option<String> {
    let joined = base.join(raw.trim()).ok()?;
    matches!(joined.scheme(), "http" | "https").then(|| joined.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_rejects_svg_and_logo_regardless_of_attributes() {
        let svg = ImageCandidate {
            url: "https://cdn.example.com/cars/swift-front.svg",
            alt: Some("Maruti Swift"),
            width: Some("800"),
            ..ImageCandidate::default()
        };
        assert!(!is_content_image(&svg));

        let logo = ImageCandidate {
            url: "https://cdn.example.com/brand-logo-large.jpg",
            width: Some("1200"),
            height: Some("800"),
            ..ImageCandidate::default()
        };
        assert!(!is_content_image(&logo));
        assert!(!is_content_image(&ImageCandidate::from_url("/static/icon.svg?v=2")));
    }

    #[test]
    fn test_accepts_photo() {
        let photo = ImageCandidate {
            url: "https://images.example.com/used/2019-honda-city/front.jpg?w=640",
            alt: Some("2019 Honda City"),
            width: Some("640"),
            ..ImageCandidate::default()
        };
        assert!(is_content_image(&photo));
    }

    #[test]
    fn test_rejects_tiny_and_inline_images() {
        let tiny = ImageCandidate {
            url: "https://example.com/thumb.jpg",
            width: Some("16"),
            ..ImageCandidate::default()
        };
        assert!(!is_content_image(&tiny));
        assert!(!is_content_image(&ImageCandidate::from_url("data:image/png;base64,AAAA")));
    }

    #[test]
    fn test_lazy_attribute_wins_over_placeholder() {
        let html = Html::parse_fragment(
            r#"<img src="data:image/gif;base64,R0l" data-src="/photos/a.jpg">
               <img srcset="/photos/b-320.jpg 320w, /photos/b-640.jpg 640w">"#,
        );
        let base = Url::parse("https://www.example.com/used-cars/").unwrap();
        let images = collect_images(html.root_element(), &["img"], &base, 10);
        assert_eq!(
            images,
            vec![
                "https://www.example.com/photos/a.jpg".to_string(),
                "https://www.example.com/photos/b-320.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_collect_dedupes_and_caps() {
        let html = Html::parse_fragment(
            &(0..20)
                .map(|i| format!(r#"<img src="//img.example.com/car-{}.jpg"><img src="//img.example.com/car-{}.jpg">"#, i, i))
                .collect::<String>(),
        );
        let base = Url::parse("https://www.example.com").unwrap();
        let images = collect_images(html.root_element(), &["img"], &base, 10);
        assert_eq!(images.len(), 10);
        assert_eq!(images[0], "https://img.example.com/car-0.jpg");
        assert_eq!(images[1], "https://img.example.com/car-1.jpg");
    }
}
