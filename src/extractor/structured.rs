//! schema.org vehicle data from `<script type="application/ld+json">`.
//!
//! Dealer sites that render their gallery client-side usually still ship a
//! `Car` / `Vehicle` / `Product` object for search engines. These strategies
//! read it and are wired in as detail hooks.

use scraper::{Html, Selector};
use serde_json::Value;

use crate::extractor::{
    images::filter_urls,
    normalize::{
        MAX_DISTANCE_KM, MAX_OWNERS, clean_city, collapse_whitespace, extract_distance,
        extract_year, parse_price, truncate_chars,
    },
    template::{FieldSelectors, MAX_DESCRIPTION_CHARS, Scope},
};

const VEHICLE_TYPES: &[&str] = &["Car", "Vehicle", "MotorizedVehicle", "Product", "IndividualProduct"];

const YEAR_KEYS: &[&str] = &[
    "vehicleModelDate",
    "modelDate",
    "productionDate",
    "dateVehicleFirstRegistered",
    "purchaseDate",
];

const MILES_TO_METRES: u64 = 1609;

fn type_names(item: &Value) -> Vec<&str> {
    match item.get("@type") {
        Some(Value::String(name)) => vec![name.as_str()],
        Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn has_type(item: &Value, wanted: &[&str]) -> bool {
    type_names(item)
        .iter()
        .any(|name| wanted.iter().any(|w| name.eq_ignore_ascii_case(w)))
}

/// An `Offer` wrapping the car: hoist `itemOffered` and keep the offer as its `offers`.
fn from_offer(item: &Value) -> Option<Value> {
    let mut offered = item.get("itemOffered")?.clone();
    if !has_type(&offered, VEHICLE_TYPES) {
        return None;
    }
    if let Value::Object(map) = &mut offered {
        map.entry("offers").or_insert_with(|| item.clone());
    }
    Some(offered)
}

fn walk(value: &Value, found: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                walk(item, found);
            }
        }
        Value::Object(map) => {
            if let Some(graph) = map.get("@graph") {
                walk(graph, found);
            }
            if has_type(value, VEHICLE_TYPES) {
                found.push(value.clone());
            } else if has_type(value, &["Offer"]) {
                found.extend(from_offer(value));
            }
        }
        _ => {}
    }
}

/// The first vehicle-like JSON-LD object on the page. `Car`/`Vehicle` beats a
/// plain `Product`, since shops often add one `Product` per related ad.
pub fn find_vehicle(document: &Html) -> Option<Value> {
    let selector = Selector::parse("script[type='application/ld+json']").ok()?;

    let mut found = Vec::new();
    for script in document.select(&selector) {
        let json_text = script.text().collect::<String>();
        if json_text.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(json_text.trim()) {
            Ok(value) => walk(&value, &mut found),
            Err(e) => tracing::debug!("Skipping malformed JSON-LD block: {}", e),
        }
    }

    let vehicle = found
        .iter()
        .position(|item| !has_type(item, &["Product", "IndividualProduct"]))
        .unwrap_or(0);
    (!found.is_empty()).then(|| found.swap_remove(vehicle))
}

/// A string, or the `name` of a nested object (`"brand": {"name": "Honda"}`).
fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => collapse_whitespace(text),
        Value::Object(map) => return map.get("name").and_then(text_of),
        Value::Array(items) => return items.iter().find_map(text_of),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn amount_of(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| *n >= 0.0).map(|n| n.round() as u64)),
        Value::String(text) => parse_price(text),
        _ => None,
    }
}

fn offers(vehicle: &Value) -> Vec<&Value> {
    match vehicle.get("offers") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(offer @ Value::Object(_)) => vec![offer],
        _ => Vec::new(),
    }
}

fn vehicle<'s>(scope: &'s Scope<'_>) -> Option<&'s Value> {
    scope.structured.as_ref()
}

pub fn title(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<String> {
    vehicle(scope)?.get("name").and_then(text_of)
}

pub fn price(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<u64> {
    let vehicle = vehicle(scope)?;
    offers(vehicle)
        .into_iter()
        .find_map(|offer| {
            ["price", "lowPrice"]
                .iter()
                .filter_map(|key| offer.get(key))
                .chain(offer.pointer("/priceSpecification/price"))
                .find_map(amount_of)
        })
        .filter(|price| *price > 0)
}

/// `model` alone; the brand is already the first word of every title.
pub fn model(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<String> {
    vehicle(scope)?.get("model").and_then(text_of)
}

pub fn year(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<i32> {
    let vehicle = vehicle(scope)?;
    YEAR_KEYS.iter().filter_map(|key| vehicle.get(key)).find_map(|value| match value {
        Value::Number(number) => extract_year(&number.to_string()),
        Value::String(text) => extract_year(text),
        _ => None,
    })
}

/// `mileageFromOdometer` as a `QuantitativeValue`, a number, or free text.
/// Values tagged `SMI` are converted from miles.
pub fn distance(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<u64> {
    let mileage = vehicle(scope)?.get("mileageFromOdometer")?;
    let km = match mileage {
        Value::Object(map) => {
            let value = map.get("value").and_then(amount_of)?;
            let miles = map
                .get("unitCode")
                .and_then(Value::as_str)
                .is_some_and(|unit| unit.eq_ignore_ascii_case("SMI"));
            if miles { value.checked_mul(MILES_TO_METRES)? / 1000 } else { value }
        }
        Value::Number(_) => amount_of(mileage)?,
        Value::String(text) => extract_distance(text).or_else(|| parse_price(text))?,
        _ => return None,
    };
    (km < MAX_DISTANCE_KM).then_some(km)
}

pub fn ownership(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<u8> {
    let owners = vehicle(scope)?.get("numberOfPreviousOwners").and_then(amount_of)?;
    u8::try_from(owners)
        .ok()
        .filter(|n| (1..=MAX_OWNERS).contains(n))
}

pub fn city(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<String> {
    let vehicle = vehicle(scope)?;
    let mut candidates: Vec<&Value> = Vec::new();
    for offer in offers(vehicle) {
        candidates.extend(offer.pointer("/availableAtOrFrom/address/addressLocality"));
        candidates.extend(offer.pointer("/seller/address/addressLocality"));
        candidates.extend(offer.pointer("/areaServed/name"));
    }
    candidates.extend(vehicle.pointer("/address/addressLocality"));
    candidates
        .into_iter()
        .filter_map(Value::as_str)
        .find_map(clean_city)
}

pub fn images(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<Vec<String>> {
    let image = vehicle(scope)?.get("image")?;
    let mut urls: Vec<&str> = Vec::new();
    match image {
        Value::String(url) => urls.push(url.as_str()),
        Value::Array(items) => urls.extend(items.iter().filter_map(image_url)),
        Value::Object(_) => urls.extend(image_url(image)),
        _ => {}
    }
    let images = filter_urls(urls, &scope.base, scope.kind.image_cap());
    (!images.is_empty()).then_some(images)
}

/// `"https://..."` or an `ImageObject` with `url` / `contentUrl`.
fn image_url(value: &Value) -> Option<&str> {
    match value {
        Value::String(url) => Some(url.as_str()),
        Value::Object(map) => map
            .get("url")
            .or_else(|| map.get("contentUrl"))
            .and_then(Value::as_str),
        _ => None,
    }
}

pub fn description(scope: &Scope<'_>, _selectors: &FieldSelectors) -> Option<String> {
    vehicle(scope)?
        .get("description")
        .and_then(text_of)
        .map(|text| truncate_chars(&text, MAX_DESCRIPTION_CHARS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::model::ListingKind;
    use url::Url;

    const CAR_PAGE: &str = r#"<html><head>
        <script type="application/ld+json">{"@context":"https://schema.org","@type":"BreadcrumbList","itemListElement":[]}</script>
        <script type="application/ld+json">
        {"@context":"https://schema.org","@graph":[
            {"@type":"Product","name":"Related: Maruti Baleno","offers":{"price":"500000"}},
            {"@type":"Car","name":"2018 Hyundai Creta SX",
             "brand":{"@type":"Brand","name":"Hyundai"},"model":"Creta",
             "vehicleModelDate":"2018","numberOfPreviousOwners":2,
             "mileageFromOdometer":{"@type":"QuantitativeValue","value":"52000","unitCode":"KMT"},
             "image":["https://img.example.in/creta/1.jpg",{"@type":"ImageObject","url":"/creta/2.jpg"},"/static/logo.png"],
             "description":"Well maintained, all services at the authorised dealer.",
             "offers":{"@type":"Offer","price":1125000,"priceCurrency":"INR",
                "availableAtOrFrom":{"@type":"Place","address":{"addressLocality":"Pune, Maharashtra"}}}}
        ]}
        </script></head><body></body></html>"#;

    fn with_scope<R>(markup: &str, check: impl FnOnce(&Scope<'_>) -> R) -> R {
        let document = Html::parse_document(markup);
        let scope = Scope {
            element: document.root_element(),
            document: &document,
            base: Url::parse("https://dealer.example.in/cars/creta-1").unwrap(),
            kind: ListingKind::Detail,
            text: String::new(),
            page_text: None,
            structured: find_vehicle(&document),
        };
        check(&scope)
    }

    fn no_selectors() -> FieldSelectors {
        FieldSelectors {
            container: &[],
            title: &[],
            price: &[],
            model: &[],
            specs: &[],
            city: &[],
            seller: &[],
            images: &[],
            description: &[],
        }
    }

    #[test]
    fn test_car_beats_related_product() {
        with_scope(CAR_PAGE, |scope| {
            let s = no_selectors();
            assert_eq!(title(scope, &s).as_deref(), Some("2018 Hyundai Creta SX"));
            assert_eq!(price(scope, &s), Some(1_125_000));
            assert_eq!(model(scope, &s).as_deref(), Some("Creta"));
            assert_eq!(year(scope, &s), Some(2018));
            assert_eq!(distance(scope, &s), Some(52_000));
            assert_eq!(ownership(scope, &s), Some(2));
            assert_eq!(city(scope, &s).as_deref(), Some("Pune"));
            assert_eq!(
                images(scope, &s).unwrap(),
                vec![
                    "https://img.example.in/creta/1.jpg".to_string(),
                    "https://dealer.example.in/creta/2.jpg".to_string(),
                ]
            );
            assert!(description(scope, &s).unwrap().starts_with("Well maintained"));
        });
    }

    #[test]
    fn test_offer_wrapping_vehicle() {
        let markup = r#"<script type="application/ld+json">
            [{"@type":"Offer","price":"₹ 6.75 Lakh",
              "itemOffered":{"@type":["Vehicle","Product"],"name":"Honda Amaze VX",
                "mileageFromOdometer":{"value":10000,"unitCode":"SMI"}}}]
            </script>"#;
        with_scope(markup, |scope| {
            let s = no_selectors();
            assert_eq!(title(scope, &s).as_deref(), Some("Honda Amaze VX"));
            assert_eq!(price(scope, &s), Some(675_000));
            assert_eq!(distance(scope, &s), Some(16_090));
        });
    }

    #[test]
    fn test_malformed_or_missing_blocks() {
        let markup = r#"<script type="application/ld+json">{not json</script>
            <script type="application/ld+json">{"@type":"Organization","name":"Dealer"}</script>"#;
        with_scope(markup, |scope| {
            assert!(scope.structured.is_none());
            assert_eq!(title(scope, &no_selectors()), None);
        });
    }
}
