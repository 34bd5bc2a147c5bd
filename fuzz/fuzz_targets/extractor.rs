#![no_main]

use libfuzzer_sys::fuzz_target;
use scraper::Html;
use url::Url;

use carscout::extractor::{classify, extract_catalog, extract_detail, looks_editorial};

// Calls the extractors directly: the engine's unwind guard would hide panics.
fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);
    let document = Html::parse_document(&html);

    for raw in ["https://dealer.example.in/stock", "https://www.olx.in/cars_c84"] {
        let url = Url::parse(raw).unwrap();
        let _ = classify(&url, &document);
        let _ = extract_catalog(&document, &url);
        let _ = extract_detail(&document, &url);
    }
    let _ = looks_editorial(&document);
});
