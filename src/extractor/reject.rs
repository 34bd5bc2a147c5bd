use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

const MAX_TITLE_CHARS: usize = 100;
const MIN_EDITORIAL_HEADINGS: usize = 2;

/// Article-teaser vocabulary. A listing title never reads like this.
static NOISE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(best|top\s+\d+|reviews?|upcoming|news|compare|comparison|vs\.?|versus|launch(?:ed|es)?|expected|price\s+list|things\s+to\s+know|buying\s+guide|tips)\b",
    )
    .expect("Failed to compile title noise regex")
});

/// `true` when a candidate title is empty, too long, or editorial.
pub fn is_noise_title(title: &str) -> bool {
    let title = title.trim();
    title.is_empty() || title.chars().count() > MAX_TITLE_CHARS || NOISE_REGEX.is_match(title)
}

fn select_texts(document: &Html, css: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|element| element.text().collect::<String>())
        .collect()
}

fn meta_content(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .find_map(|element| element.value().attr("content").map(str::to_string))
}

/// Heuristic for "this is a blog post / buying guide, not an inventory page".
///
/// Used only to word the failure message once every extractor came back
/// empty; it never stops extraction on its own.
pub fn looks_editorial(document: &Html) -> bool {
    if meta_content(document, "meta[property='og:type']")
        .is_some_and(|og_type| og_type.eq_ignore_ascii_case("article"))
    {
        return true;
    }

    let headline_is_noise = select_texts(document, "title, h1")
        .iter()
        .any(|text| NOISE_REGEX.is_match(text));
    if headline_is_noise {
        return true;
    }

    let noisy_subheadings = select_texts(document, "h2, h3")
        .iter()
        .filter(|text| NOISE_REGEX.is_match(text))
        .count();
    let articles = select_texts(document, "article [itemprop='articleBody'], article time").len();

    noisy_subheadings >= MIN_EDITORIAL_HEADINGS || articles > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_editorial_titles() {
        assert!(is_noise_title("Best Cars Under 5 Lakh in Delhi"));
        assert!(is_noise_title("Top 10 SUVs of the year"));
        assert!(is_noise_title("Creta vs Seltos: which one to buy"));
        assert!(is_noise_title("Upcoming Tata launches"));
        assert!(is_noise_title("Hyundai i20 Review"));
    }

    #[test]
    fn test_reject_empty_and_overlong_titles() {
        assert!(is_noise_title("   "));
        assert!(is_noise_title(&"Maruti Swift ".repeat(10)));
    }

    #[test]
    fn test_accept_listing_titles() {
        assert!(!is_noise_title("2019 Honda City VX CVT"));
        assert!(!is_noise_title("Maruti Suzuki Baleno Alpha"));
        assert!(!is_noise_title("Toyota Innova Crysta 2.4 GX"));
    }

    #[test]
    fn test_editorial_page_detection() {
        let article = Html::parse_document(
            r#"<html><head><meta property="og:type" content="article"></head><body></body></html>"#,
        );
        assert!(looks_editorial(&article));

        let guide = Html::parse_document(
            "<html><body><h1>Best Cars Under 5 Lakh in Delhi</h1></body></html>",
        );
        assert!(looks_editorial(&guide));

        let inventory =
            Html::parse_document("<html><body><h1>Used Cars in Pune</h1></body></html>");
        assert!(!looks_editorial(&inventory));
    }
}
