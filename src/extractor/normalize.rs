//! Pure converters from raw page fragments to typed listing values.
//!
//! Every function here is heuristic. The plausibility bounds are part of the
//! contract: a value outside them is treated as "not found" so the caller can
//! fall back to its default instead of surfacing garbage.

use chrono::{Datelike, Utc};
use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const MIN_YEAR: i32 = 1990;
pub const MAX_DISTANCE_KM: u64 = 1_000_000;
pub const MAX_OWNERS: u8 = 10;
pub const MAX_CITY_CHARS: usize = 50;
pub const UNKNOWN_CITY: &str = "Unknown";

const LAKH: u64 = 100_000;
const CRORE: u64 = 10_000_000;

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static PRICE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:(₹|\brs\b\.?|\binr\b)\s*)?(\d[\d,]*(?:\.\d+)?)\s*(crores?\b|cr\b|lakhs?\b|lacs?\b|lac\b|l\b)?",
    )
    .expect("Invalid price regex")
});

static LABELLED_YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:year|model|reg(?:istration|istered|n)?|mfg|manufactur\w*)\b[^0-9]{0,15}\b((?:19|20)\d{2})\b")
        .expect("Invalid labelled year regex")
});

static YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").expect("Invalid year regex"));

static DISTANCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*(k|lakhs?|lacs?)?\s*(?:kms?|kilomet(?:er|re)s?)\b")
        .expect("Invalid distance regex")
});

static LABELLED_DISTANCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:kms?|kilomet(?:er|re)s?|odometer|mileage)\s*(?:driven|done|run)?\s*[:\-]?\s*(\d[\d,]*)")
        .expect("Invalid labelled distance regex")
});

static ORDINAL_OWNER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*(?:st|nd|rd|th)\s+owner").expect("Invalid ordinal owner regex")
});

static WORD_OWNER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth)\s+owner")
        .expect("Invalid word owner regex")
});

static LABELLED_OWNER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:owners?|ownership|no\.?\s+of\s+owners?)\s*[:\-]\s*(\d{1,2})\b")
        .expect("Invalid labelled owner regex")
});

static COUNT_OWNER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s+owners?\b").expect("Invalid owner count regex")
});

static LABELLED_CITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:location|city|located\s+in)\s*[:\-]?\s*([A-Za-z][A-Za-z .]{1,40})")
        .expect("Invalid city regex")
});

pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Collapses every whitespace run (including newlines and NBSP) to one space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").into_owned()
}

/// Truncates on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}

/// `"12.5"` scaled by `multiplier` without going through floating point.
fn scaled_amount(number: &str, multiplier: u64) -> Option<u64> {
    let digits: String = number.chars().filter(|c| *c != ',').collect();
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits.as_str(), ""),
    };

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut amount = whole.checked_mul(multiplier)?;

    // Fractions only make sense under a multiplier ("5.5 lakh"); "₹4,999.00" keeps the rupees.
    if multiplier > 1 && !fraction.is_empty() {
        let mut scale = multiplier;
        for digit in fraction.chars().filter_map(|c| c.to_digit(10)) {
            scale /= 10;
            if scale == 0 {
                break;
            }
            amount = amount.checked_add(u64::from(digit) * scale)?;
        }
    }

    Some(amount)
}

fn multiplier_for(unit: Option<&str>) -> u64 {
    match unit.map(|u| u.to_lowercase()) {
        Some(u) if u.starts_with("cr") => CRORE,
        Some(u) if u.starts_with('l') => LAKH,
        _ => 1,
    }
}

fn price_from_captures(caps: &Captures<'_>) -> Option<u64> {
    let unit = caps.get(3).map(|m| m.as_str());
    let price = scaled_amount(caps.get(2)?.as_str(), multiplier_for(unit))?;
    (price > 0).then_some(price)
}

/// Parses Indian-format prices: `"₹12,50,000"`, `"5.5 Lakh"`, `"Rs. 1.2 Cr"`.
///
/// A token carrying a currency marker or a lakh/crore unit wins over a bare
/// number; a bare number is only used when nothing better is present.
pub fn parse_price(text: &str) -> Option<u64> {
    let mut bare = None;
    for caps in PRICE_REGEX.captures_iter(text) {
        let qualified = caps.get(1).is_some() || caps.get(3).is_some();
        if qualified {
            if let Some(price) = price_from_captures(&caps) {
                return Some(price);
            }
        } else if bare.is_none() {
            bare = price_from_captures(&caps);
        }
    }
    bare
}

/// Only currency-prefixed tokens; used when scanning free text where bare
/// numbers are more likely years or kilometres.
pub fn find_currency_price(text: &str) -> Option<u64> {
    PRICE_REGEX
        .captures_iter(text)
        .filter(|caps| caps.get(1).is_some())
        .find_map(|caps| price_from_captures(&caps))
}

fn plausible_year(raw: &str) -> Option<i32> {
    let year: i32 = raw.parse().ok()?;
    (MIN_YEAR..=current_year()).contains(&year).then_some(year)
}

/// First year within `1990..=current year`; labelled years ("Reg. Year 2017") first.
pub fn extract_year(text: &str) -> Option<i32> {
    LABELLED_YEAR_REGEX
        .captures_iter(text)
        .chain(YEAR_REGEX.captures_iter(text))
        .find_map(|caps| plausible_year(caps.get(1)?.as_str()))
}

/// Kilometres driven, below 1,000,000.
pub fn extract_distance(text: &str) -> Option<u64> {
    let plausible = |km: u64| (km < MAX_DISTANCE_KM).then_some(km);

    DISTANCE_REGEX
        .captures_iter(text)
        .filter(|caps| caps.get(0).is_some_and(|m| !is_unit_label(&text[m.end()..])))
        .find_map(|caps| {
            let multiplier = match caps.get(2).map(|m| m.as_str().to_lowercase()) {
                Some(unit) if unit == "k" => 1_000,
                Some(_) => LAKH,
                None => 1,
            };
            scaled_amount(caps.get(1)?.as_str(), multiplier).and_then(plausible)
        })
        .or_else(|| {
            LABELLED_DISTANCE_REGEX
                .captures_iter(text)
                .find_map(|caps| scaled_amount(caps.get(1)?.as_str(), 1).and_then(plausible))
        })
}

/// "Kms Driven: 54,000": the unit is a label and the number before it is unrelated.
fn is_unit_label(rest: &str) -> bool {
    let rest = rest.trim_start().to_lowercase();
    let rest = ["driven", "done", "run"]
        .iter()
        .find_map(|word| rest.strip_prefix(word))
        .unwrap_or(rest.as_str());
    rest.trim_start().starts_with(':')
}

fn ordinal_word(word: &str) -> Option<u8> {
    let n = match word.to_lowercase().as_str() {
        "first" => 1,
        "second" => 2,
        "third" => 3,
        "fourth" => 4,
        "fifth" => 5,
        "sixth" => 6,
        "seventh" => 7,
        "eighth" => 8,
        "ninth" => 9,
        "tenth" => 10,
        _ => return None,
    };
    Some(n)
}

/// Number of previous owners, `1..=10`.
pub fn extract_ownership(text: &str) -> Option<u8> {
    let plausible = |n: u8| (1..=MAX_OWNERS).contains(&n).then_some(n);
    let numeric = |caps: Captures<'_>| caps.get(1)?.as_str().parse::<u8>().ok().and_then(plausible);

    ORDINAL_OWNER_REGEX
        .captures_iter(text)
        .find_map(numeric)
        .or_else(|| {
            WORD_OWNER_REGEX
                .captures_iter(text)
                .find_map(|caps| ordinal_word(caps.get(1)?.as_str()))
        })
        .or_else(|| LABELLED_OWNER_REGEX.captures_iter(text).find_map(numeric))
        .or_else(|| COUNT_OWNER_REGEX.captures_iter(text).find_map(numeric))
}

/// Short location string to its first comma segment ("Andheri West, Mumbai" stays
/// "Andheri West"). Rejects anything that reads like a paragraph.
pub fn clean_city(raw: &str) -> Option<String> {
    let raw = collapse_whitespace(raw);
    if raw.is_empty() || raw.chars().count() >= MAX_CITY_CHARS {
        return None;
    }
    let first = raw.split(',').next()?.trim();
    let first = first
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim();
    (!first.is_empty()).then(|| first.to_string())
}

/// City mentioned with a label in free text ("Location: Pune").
pub fn extract_city(text: &str) -> Option<String> {
    LABELLED_CITY_REGEX
        .captures_iter(text)
        .find_map(|caps| clean_city(caps.get(1)?.as_str()))
}

/// Drops the leading brand token (and a leading model year, "2019 Honda City"
/// → "City"); a one-word title is its own model.
pub fn derive_model(title: &str) -> String {
    let mut tokens: Vec<&str> = title.split_whitespace().collect();
    if tokens.len() > 2 && tokens[0].len() == 4 && plausible_year(tokens[0]).is_some() {
        tokens.remove(0);
    }
    match tokens.split_first() {
        Some((brand, [])) => brand.to_string(),
        Some((_, rest)) => rest.join(" "),
        None => String::new(),
    }
}

/// `width="300"` / `height="300px"` style attribute values.
pub fn parse_dimension(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
