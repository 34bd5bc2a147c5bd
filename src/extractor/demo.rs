//! Canned listings for URLs carrying the reserved `demo` / `test` token.
//!
//! Lets integrators exercise the whole pipeline without touching the network.
//! The records are constants: no clock, no randomness, so two calls serialize
//! to identical bytes.

use url::Url;

use crate::extractor::model::NormalizedListing;

const DEMO_TOKENS: &[&str] = &["demo", "test"];

pub fn is_demo_url(url: &Url) -> bool {
    let url = url.as_str().to_lowercase();
    DEMO_TOKENS.iter().any(|token| url.contains(token))
}

struct DemoCar {
    slug: &'static str,
    title: &'static str,
    model: &'static str,
    price: u64,
    owner: &'static str,
    year: i32,
    km: u64,
    owners: u8,
    city: &'static str,
}

const DEMO_CARS: [DemoCar; 5] = [
    DemoCar {
        slug: "maruti-swift-vxi",
        title: "Maruti Suzuki Swift VXI",
        model: "Swift VXI",
        price: 550_000,
        owner: "Rohit Sharma",
        year: 2019,
        km: 42_000,
        owners: 1,
        city: "Delhi",
    },
    DemoCar {
        slug: "hyundai-creta-sx",
        title: "Hyundai Creta SX 1.6",
        model: "Creta SX 1.6",
        price: 1_125_000,
        owner: "Priya Nair",
        year: 2018,
        km: 58_500,
        owners: 2,
        city: "Bangalore",
    },
    DemoCar {
        slug: "honda-city-vx-cvt",
        title: "Honda City VX CVT",
        model: "City VX CVT",
        price: 925_000,
        owner: "Amit Patel",
        year: 2020,
        km: 31_200,
        owners: 1,
        city: "Ahmedabad",
    },
    DemoCar {
        slug: "tata-nexon-xz-plus",
        title: "Tata Nexon XZ Plus",
        model: "Nexon XZ Plus",
        price: 780_000,
        owner: "Sneha Kulkarni",
        year: 2021,
        km: 18_750,
        owners: 1,
        city: "Pune",
    },
    DemoCar {
        slug: "toyota-innova-crysta-gx",
        title: "Toyota Innova Crysta 2.4 GX",
        model: "Innova Crysta 2.4 GX",
        price: 1_650_000,
        owner: "Karthik Iyer",
        year: 2017,
        km: 96_000,
        owners: 3,
        city: "Chennai",
    },
];

const DEMO_IMAGE_HOST: &str = "https://images.carscout.dev/demo";

/// Five complete records, always in the same order.
pub fn listings() -> Vec<NormalizedListing> {
    DEMO_CARS
        .iter()
        .map(|car| NormalizedListing {
            images: (1..=3)
                .map(|n| format!("{}/{}/{}.jpg", DEMO_IMAGE_HOST, car.slug, n))
                .collect(),
            title: car.title.to_string(),
            model: car.model.to_string(),
            price: car.price,
            owner_name: car.owner.to_string(),
            year_of_purchase: car.year,
            distance_driven: car.km,
            ownership_count: car.owners,
            city: car.city.to_string(),
            description: Some(format!(
                "{} {}, {} km, {} owner(s). Sample listing.",
                car.year, car.title, car.km, car.owners
            )),
        })
        .collect()
}
