use scraper::Html;
use std::fs;
use url::Url;

use crate::extractor::{
    MAX_CARDS, PageType, classify, extract_catalog, extract_detail, looks_editorial,
};

fn fixture(name: &str) -> Html {
    let html = fs::read_to_string(format!("src/extractor/tests/fixtures/{}", name))
        .expect("Failed to read test fixture");
    Html::parse_document(&html)
}

fn url(raw: &str) -> Url {
    Url::parse(raw).unwrap()
}

#[test]
fn test_olx_catalog() {
    let document = fixture("olx_catalog.html");
    let page = url("https://www.olx.in/mumbai_g4058997/cars_c84");
    let records = extract_catalog(&document, &page);

    // editorial card, image-less card, duplicate card and price-less card are dropped
    let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Maruti Suzuki Swift VXI", "Hyundai i20 Asta"]);

    let swift = &records[0];
    assert_eq!(swift.price, 425_000);
    assert_eq!(swift.year_of_purchase, 2016);
    assert_eq!(swift.distance_driven, 68_000);
    assert_eq!(swift.ownership_count, 1);
    // first segment of "Andheri East, Mumbai"
    assert_eq!(swift.city, "Andheri East");
    assert_eq!(swift.owner_name, "OLX Seller");
    assert_eq!(
        swift.images,
        vec!["https://apollo.olx.in/v1/files/swift-front-1762349871/image;s=300x600"]
    );
    assert!(swift.description.is_none());

    let i20 = &records[1];
    assert_eq!(i20.price, 610_000);
    assert_eq!(i20.city, "Bangalore");
    assert_eq!(
        i20.images,
        vec!["https://apollo.olx.in/v1/files/i20-asta-1762349875/image;s=300x600"]
    );
}

#[test]
fn test_cars24_catalog_prefers_data_price() {
    let document = fixture("cars24_catalog.html");
    let page = url("https://www.cars24.com/buy-used-cars-pune/");
    let records = extract_catalog(&document, &page);
    assert_eq!(records.len(), 2);

    let city = &records[0];
    assert_eq!(city.title, "2019 Honda City VX CVT");
    assert_eq!(city.model, "City VX CVT");
    assert_eq!(city.price, 875_000);
    assert_eq!(city.year_of_purchase, 2019);
    assert_eq!(city.distance_driven, 35_000);
    assert_eq!(city.city, "Pune");

    let nexon = &records[1];
    assert_eq!(nexon.price, 620_000);
    assert_eq!(nexon.ownership_count, 2);
    assert_eq!(nexon.city, "Hinjewadi");
    assert_eq!(
        nexon.images,
        vec!["https://fastly-production.24c.in/hello-ar/dev/uploads/8d2d/tata-nexon.jpg?w=360"]
    );
}

#[test]
fn test_spinny_catalog_joins_make_and_model() {
    let document = fixture("spinny_catalog.html");
    let page = url("https://www.spinny.com/used-cars-in-bangalore/s/");
    let records = extract_catalog(&document, &page);
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].title, "Tata Nexon XZ Plus");
    assert_eq!(records[0].model, "Nexon XZ Plus");
    assert_eq!(records[0].price, 780_000);
    assert_eq!(records[0].year_of_purchase, 2021);
    assert_eq!(records[0].distance_driven, 18_750);

    assert_eq!(records[1].title, "Maruti Suzuki Baleno Alpha");
    assert_eq!(records[1].price, 645_000);
    assert_eq!(records[1].ownership_count, 2);
}

#[test]
fn test_cardekho_catalog_uses_full_link_title() {
    let document = fixture("cardekho_catalog.html");
    let page = url("https://www.cardekho.com/used-cars+in+pune");
    let records = extract_catalog(&document, &page);

    // the "Top 5" teaser card is dropped
    assert_eq!(records.len(), 2);

    let venue = &records[0];
    assert_eq!(venue.title, "2020 Hyundai Venue SX Plus Turbo DCT");
    assert_eq!(venue.model, "Venue SX Plus Turbo DCT");
    assert_eq!(venue.price, 925_000);
    assert_eq!(venue.year_of_purchase, 2020);
    assert_eq!(venue.distance_driven, 45_210);
    assert_eq!(venue.ownership_count, 2);
    assert_eq!(venue.city, "Wakad");
    assert_eq!(venue.owner_name, "Shree Auto Hub");
    assert_eq!(
        venue.images,
        vec!["https://images10.gaadi.com/usedcar_image/4512345/original/venue-front.jpg?imwidth=420"]
    );

    // no link title, so the heading text is used as is
    let baleno = &records[1];
    assert_eq!(baleno.title, "2018 Maruti Baleno Zeta");
    assert_eq!(baleno.price, 640_000);
    assert_eq!(baleno.year_of_purchase, 2018);
    assert_eq!(baleno.city, "Pune");
    assert_eq!(baleno.owner_name, "CarDekho Seller");
    assert_eq!(
        baleno.images,
        vec!["https://www.cardekho.com/images/used/baleno-zeta-side.jpg"]
    );
}

#[test]
fn test_cardekho_detail_prefers_structured_data() {
    let document = fixture("cardekho_detail.html");
    let page = url("https://www.cardekho.com/used-car-details/used-hyundai-creta-1-6-sx-2019-cars-pune_4601122.htm");
    let listing = extract_detail(&document, &page).expect("listing");

    assert_eq!(listing.title, "Hyundai Creta 1.6 SX");
    assert_eq!(listing.model, "1.6 SX");
    assert_eq!(listing.price, 1_245_000);
    assert_eq!(listing.year_of_purchase, 2019);
    assert_eq!(listing.distance_driven, 38_500);
    assert_eq!(listing.ownership_count, 2);
    assert_eq!(listing.city, "Baner");
    assert_eq!(listing.owner_name, "Pune Car Bazaar");
    assert_eq!(
        listing.images,
        vec![
            "https://images10.gaadi.com/usedcar_image/4601122/original/creta-front.jpg",
            "https://images10.gaadi.com/usedcar_image/4601122/original/creta-rear.jpg",
        ]
    );
    assert_eq!(
        listing.description.as_deref(),
        Some("Company serviced, new tyres, insurance valid till March.")
    );
}

#[test]
fn test_cars24_detail() {
    let document = fixture("cars24_detail.html");
    let page = url("https://www.cars24.com/buy-used-honda-amaze-2019-cars-pune-10031187/");
    let listing = extract_detail(&document, &page).expect("listing");

    assert_eq!(listing.title, "2019 Honda Amaze 1.2 VX MT");
    assert_eq!(listing.model, "Amaze 1.2 VX MT");
    // the EMI line below the price is ignored
    assert_eq!(listing.price, 635_000);
    assert_eq!(listing.year_of_purchase, 2019);
    assert_eq!(listing.distance_driven, 41_830);
    assert_eq!(listing.ownership_count, 2);
    assert_eq!(listing.city, "Hadapsar");
    assert_eq!(listing.owner_name, "Cars24 Seller");
    // header logo sits outside the listing container
    assert_eq!(
        listing.images,
        vec![
            "https://fastly-production.24c.in/hello-ar/dev/uploads/amaze/front.jpg?w=720",
            "https://www.cars24.com/hello-ar/dev/uploads/amaze/interior.jpg?w=720",
        ]
    );
}

#[test]
fn test_spinny_detail_joins_make_and_model() {
    let document = fixture("spinny_detail.html");
    let page = url("https://www.spinny.com/buy-used-cars/bangalore/maruti-suzuki/dzire/whitefield/8822134/");
    let listing = extract_detail(&document, &page).expect("listing");

    assert_eq!(listing.title, "Maruti Suzuki Dzire ZXI AMT");
    assert_eq!(listing.model, "Dzire ZXI AMT");
    assert_eq!(listing.price, 715_000);
    assert_eq!(listing.year_of_purchase, 2020);
    assert_eq!(listing.distance_driven, 27_400);
    assert_eq!(listing.ownership_count, 1);
    assert_eq!(listing.city, "Whitefield");
    assert_eq!(listing.owner_name, "Spinny Seller");
    // lazy-loaded image resolved through data-src
    assert_eq!(
        listing.images,
        vec![
            "https://mda.spinny.com/sp-file-system/public/2024-05-10/8822134/file-front.jpg",
            "https://mda.spinny.com/sp-file-system/public/2024-05-10/8822134/file-side.jpg",
        ]
    );
    assert_eq!(
        listing.description.as_deref(),
        Some("Spinny assured, 200-point inspection passed.")
    );
}

#[test]
fn test_olx_detail() {
    let document = fixture("olx_detail.html");
    let page = url("https://www.olx.in/item/maruti-suzuki-swift-vxi-iid-1789234561");
    let listing = extract_detail(&document, &page).expect("listing");

    assert_eq!(listing.title, "Maruti Suzuki Swift VXI 2017");
    assert_eq!(listing.model, "Swift");
    assert_eq!(listing.price, 460_000);
    assert_eq!(listing.year_of_purchase, 2017);
    assert_eq!(listing.distance_driven, 52_000);
    assert_eq!(listing.ownership_count, 2);
    assert_eq!(listing.city, "Kothrud");
    assert_eq!(listing.owner_name, "Rohan K");
    assert_eq!(
        listing.images,
        vec![
            "https://apollo.olx.in/v1/files/swift-vxi-1789234561/image;s=780x0",
            "https://apollo.olx.in/v1/files/swift-vxi-rear-1789234561/image;s=780x0",
        ]
    );
    assert_eq!(
        listing.description.as_deref(),
        Some("Single owner, all papers clear, insurance till Dec.")
    );
}

#[test]
fn test_carwale_detail() {
    let document = fixture("carwale_detail.html");
    let page = url("https://www.carwale.com/used/mumbai/honda-city-2018-d1234567/");
    assert_eq!(classify(&page, &document), PageType::Detail);

    let listing = extract_detail(&document, &page).expect("listing");
    assert_eq!(listing.title, "2018 Honda City VX");
    assert_eq!(listing.model, "City VX");
    assert_eq!(listing.price, 895_000);
    assert_eq!(listing.year_of_purchase, 2018);
    assert_eq!(listing.distance_driven, 62_400);
    assert_eq!(listing.ownership_count, 2);
    assert_eq!(listing.city, "Mumbai");
    assert_eq!(listing.owner_name, "Autohub Motors");
    assert_eq!(listing.images.len(), 2);
    assert_eq!(
        listing.description.as_deref(),
        Some("Single-handed, city driven car with full service history.")
    );
}

#[test]
fn test_generic_detail_from_json_ld() {
    let document = fixture("generic_jsonld_detail.html");
    let page = url("https://sunrise-motors.example.in/inventory/creta-sx");
    let listing = extract_detail(&document, &page).expect("listing");

    assert_eq!(listing.title, "2018 Hyundai Creta SX");
    assert_eq!(listing.model, "Creta SX");
    assert_eq!(listing.price, 1_125_000);
    assert_eq!(listing.year_of_purchase, 2018);
    assert_eq!(listing.distance_driven, 52_000);
    assert_eq!(listing.ownership_count, 2);
    assert_eq!(listing.city, "Nashik");
    assert_eq!(listing.owner_name, "Private Seller");
    assert_eq!(
        listing.images,
        vec![
            "https://sunrise-motors.example.in/media/creta/1.jpg",
            "https://sunrise-motors.example.in/media/creta/2.jpg",
        ]
    );
}

#[test]
fn test_generic_detail_from_meta_and_body_text() {
    let document = fixture("generic_text_detail.html");
    let page = url("https://autodealer.example.in/cars/ertiga-vxi");
    let listing = extract_detail(&document, &page).expect("listing");

    assert_eq!(listing.title, "Maruti Ertiga VXI 2017");
    assert_eq!(listing.price, 475_000);
    assert_eq!(listing.year_of_purchase, 2017);
    assert_eq!(listing.distance_driven, 54_000);
    assert_eq!(listing.ownership_count, 2);
    assert_eq!(listing.city, "Nagpur");
    assert_eq!(
        listing.images,
        vec!["https://autodealer.example.in/uploads/ertiga-front.jpg"]
    );
    assert_eq!(
        listing.description.as_deref(),
        Some("Family MPV in excellent condition.")
    );
}

#[test]
fn test_editorial_page_yields_nothing() {
    let document = fixture("editorial.html");
    let page = url("https://autonews.example.com/best-cars-under-5-lakh");

    assert!(extract_catalog(&document, &page).is_empty());
    assert!(extract_detail(&document, &page).is_none());
    assert!(looks_editorial(&document));
}

fn generic_card(i: usize) -> String {
    format!(
        r#"<div class="car-card">
            <h3>Maruti Swift VXI #{i}</h3>
            <span class="price">₹{price}</span>
            <img src="/photos/swift-{i}.jpg">
        </div>"#,
        i = i,
        price = 400_000 + i * 1_000,
    )
}

#[test]
fn test_card_iteration_is_capped() {
    let cards: String = (0..25).map(generic_card).collect();
    let document = Html::parse_document(&format!("<html><body>{}</body></html>", cards));
    let page = url("https://dealer.example.in/stock");

    let records = extract_catalog(&document, &page);
    assert_eq!(records.len(), MAX_CARDS);
    assert_eq!(records[0].price, 400_000);
    assert_eq!(records[19].title, "Maruti Swift VXI #19");
}

#[test]
fn test_completeness_gate_per_family() {
    let page = url("https://dealer.example.in/stock");

    let no_image = r#"<div class="car-card"><h3>Honda Jazz V</h3><span class="price">₹3,90,000</span></div>
                      <div class="car-card"><h3>Honda Jazz S</h3><span class="price">₹3,50,000</span></div>"#;
    let no_price = r#"<div class="car-card"><h3>Honda Jazz V</h3><img src="/a.jpg"></div>
                      <div class="car-card"><h3>Honda Jazz S</h3><img src="/b.jpg"></div>"#;
    let no_title = r#"<div class="car-card"><span class="price">₹3,90,000</span><img src="/a.jpg"></div>
                      <div class="car-card"><span class="price">₹3,50,000</span><img src="/b.jpg"></div>"#;
    for markup in [no_image, no_price, no_title] {
        let document = Html::parse_document(markup);
        assert!(extract_catalog(&document, &page).is_empty(), "{markup}");
    }

    let detail_without_images = Html::parse_document(
        "<html><body><h1>Honda Jazz V</h1><p>Price: ₹3,90,000</p></body></html>",
    );
    assert!(extract_detail(&detail_without_images, &url("https://www.cars24.com/buy-used-honda-jazz-2016-cars-pune-10029399/")).is_none());

    let detail_without_price = Html::parse_document(
        r#"<html><body><h1>Honda Jazz V</h1><img src="/jazz.jpg" width="800"></body></html>"#,
    );
    assert!(extract_detail(&detail_without_price, &page).is_none());
}

#[test]
fn test_known_site_falls_back_to_generic_cards() {
    // CarDekho host, but markup its own selectors do not know.
    let cards: String = (0..3).map(generic_card).collect();
    let document = Html::parse_document(&format!("<html><body>{}</body></html>", cards));
    let records = extract_catalog(&document, &url("https://www.cardekho.com/used-cars+in+pune"));

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].owner_name, "Private Seller");
    assert_eq!(records[0].images, vec!["https://www.cardekho.com/photos/swift-0.jpg"]);
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use crate::engine::{ExtractMode, extract_from_html};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(
            html in ".*",
            path in "/[a-z0-9/-]{0,40}"
        ) {
            let page = url(&format!("https://dealer.example.in{}", path));
            let document = Html::parse_document(&html);
            let _ = classify(&page, &document);
            let _ = extract_catalog(&document, &page);
            let _ = extract_detail(&document, &page);
        }

        #[test]
        fn test_records_always_complete(
            title in "[A-Za-z]{2,12}( [A-Za-z0-9]{1,8}){0,3}",
            price in "[0-9]{0,9}",
            image in prop::option::of("/img/[a-z]{1,10}\\.jpg"),
        ) {
            let img = image.map(|src| format!(r#"<img src="{}">"#, src)).unwrap_or_default();
            let html = format!(
                r#"<html><body><div class="car-card"><h3>{t}</h3><span class="price">₹{p}</span>{img}</div>
                   <div class="car-card"><h3>{t} II</h3><span class="price">₹{p}</span>{img}</div></body></html>"#,
                t = title, p = price, img = img,
            );
            if let Ok(records) = extract_from_html(&html, &url("https://dealer.example.in/stock"), ExtractMode::Auto) {
                for record in records {
                    prop_assert!(record.is_complete());
                    prop_assert!(record.images.len() <= 15);
                    prop_assert!((1..=10).contains(&record.ownership_count));
                }
            }
        }
    }
}
