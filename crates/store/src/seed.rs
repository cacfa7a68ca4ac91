//! Built-in demo catalog.
//!
//! The administrative load path: a representative product per line,
//! upserted by `model_code` so re-running is idempotent and refreshes
//! catalog fields.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use gfc_catalog::{Category, ProductDraft};

use crate::store::r#trait::{CatalogStore, StoreError};

fn pkr(rupees: i64) -> Decimal {
    Decimal::new(rupees * 100, 2)
}

fn usd(dollars: i64) -> Option<Decimal> {
    Some(Decimal::new(dollars * 100, 2))
}

fn specs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn entry(
    name: &str,
    model_code: &str,
    category: Category,
    tagline: &str,
    description: &str,
    image: &str,
    price_rs: i64,
    price_dollars: i64,
    features: &[&str],
    specifications: &[(&str, &str)],
    is_featured: bool,
    stock: i32,
) -> ProductDraft {
    ProductDraft {
        model_code: model_code.to_string(),
        name: name.to_string(),
        category,
        tagline: tagline.to_string(),
        description: description.to_string(),
        image_url: format!("https://www.gfcfans.com/cdn/shop/files/{image}"),
        image_local: None,
        price_pkr: pkr(price_rs),
        price_usd: usd(price_dollars),
        specifications: specs(specifications),
        features: features.iter().map(|f| f.to_string()).collect(),
        rating: 0.0,
        review_count: 0,
        is_active: true,
        is_featured,
        stock,
    }
}

/// The demo catalog data set.
pub fn seed_catalog() -> Vec<ProductDraft> {
    vec![
        entry(
            "Future",
            "GFC-FUTURE",
            Category::CeilingFan,
            "Modern Design with Premium Finish",
            "Advanced ceiling fan with modern design and silent operation. \
             Perfect for contemporary living spaces.",
            "future.jpg",
            15880,
            57,
            &["High Air Throw", "Silent Operation", "Durable Motor", "Modern Design"],
            &[
                ("RPM", "1400"),
                ("Power", "65W"),
                ("Diameter", "48 inches"),
                ("Warranty", "3 Years"),
                ("Material", "Aluminum"),
            ],
            true,
            50,
        ),
        entry(
            "Spring",
            "GFC-SPRING",
            Category::CeilingFan,
            "Classic Design with Powerful Performance",
            "Traditional ceiling fan combining classic aesthetics with modern \
             technology and energy efficiency.",
            "SPRING_3.jpg",
            15400,
            55,
            &["Energy Efficient", "Quiet Motor", "Classic Design", "Easy Installation"],
            &[
                ("RPM", "1380"),
                ("Power", "60W"),
                ("Diameter", "48 inches"),
                ("Warranty", "2 Years"),
                ("Material", "Steel"),
            ],
            true,
            45,
        ),
        entry(
            "Apex",
            "GFC-APEX",
            Category::CeilingFan,
            "Premium Quality Ceiling Fan",
            "Superior ceiling fan with enhanced air circulation and noise \
             reduction technology for maximum comfort.",
            "apex.jpg",
            10460,
            38,
            &["Premium Construction", "Noise Reduction", "Efficient Cooling", "Durable Finish"],
            &[
                ("RPM", "1350"),
                ("Power", "70W"),
                ("Diameter", "56 inches"),
                ("Warranty", "2 Years"),
                ("Material", "Steel"),
            ],
            false,
            60,
        ),
        entry(
            "Pedestal Elite",
            "GFC-PED-ELITE",
            Category::PedestalFan,
            "Adjustable Height with Remote Control",
            "Heavy-duty pedestal fan with adjustable height, oscillation and \
             remote control for flexible room cooling.",
            "pedestal-elite.jpg",
            12950,
            46,
            &["Remote Control", "Adjustable Height", "Wide Oscillation", "3 Speed Settings"],
            &[
                ("RPM", "1300"),
                ("Power", "110W"),
                ("Blade Size", "24 inches"),
                ("Warranty", "2 Years"),
            ],
            true,
            35,
        ),
        entry(
            "Bracket Breeze",
            "GFC-BRK-30",
            Category::BracketFan,
            "Compact Wall-Mounted Cooling",
            "Space-saving bracket fan with pull-cord speed control, ideal for \
             shops and kitchens.",
            "bracket-breeze.jpg",
            8750,
            31,
            &["Wall Mounted", "Pull-Cord Control", "Compact Body", "Low Noise"],
            &[
                ("RPM", "1380"),
                ("Power", "90W"),
                ("Blade Size", "18 inches"),
                ("Warranty", "1 Year"),
            ],
            false,
            40,
        ),
        entry(
            "Exhaust Pro",
            "GFC-EXH-12",
            Category::ExhaustFan,
            "Powerful Ventilation for Every Room",
            "High-suction exhaust fan with rust-proof body for kitchens and \
             bathrooms.",
            "exhaust-pro.jpg",
            4850,
            17,
            &["High Suction", "Rust-Proof Body", "Easy Cleaning", "Slim Profile"],
            &[
                ("RPM", "1450"),
                ("Power", "40W"),
                ("Blade Size", "12 inches"),
                ("Warranty", "1 Year"),
            ],
            false,
            80,
        ),
        entry(
            "Arctic Breeze",
            "GFC-AC-7000",
            Category::AirCooler,
            "Room Cooling with Ice Compartment",
            "Large-tank evaporative air cooler with dedicated ice compartment \
             and honeycomb cooling pads.",
            "arctic-breeze.jpg",
            38500,
            138,
            &["60L Tank", "Ice Compartment", "Honeycomb Pads", "Castor Wheels"],
            &[
                ("Tank Capacity", "60 Liters"),
                ("Power", "185W"),
                ("Air Throw", "40 ft"),
                ("Warranty", "1 Year"),
            ],
            true,
            25,
        ),
        entry(
            "WashMaster 10",
            "GFC-WM-10",
            Category::WashingMachine,
            "Heavy-Duty Twin Tub Washer",
            "10 kg twin-tub washing machine with powerful pulsator wash and \
             rust-resistant plastic body.",
            "washmaster-10.jpg",
            42999,
            154,
            &["10kg Capacity", "Twin Tub", "Powerful Pulsator", "Shock-Proof Body"],
            &[
                ("Capacity", "10 kg"),
                ("Power", "400W"),
                ("Spin Speed", "1300 RPM"),
                ("Warranty", "2 Years"),
            ],
            true,
            20,
        ),
        entry(
            "SpinDry 6",
            "GFC-SD-6",
            Category::Dryer,
            "Fast Spin Dryer",
            "6 kg capacity spin dryer with high-speed motor for quick drying in \
             humid weather.",
            "spindry-6.jpg",
            24500,
            88,
            &["6kg Capacity", "High Speed Spin", "Compact Design", "Low Power Draw"],
            &[
                ("Capacity", "6 kg"),
                ("Power", "300W"),
                ("Spin Speed", "1400 RPM"),
                ("Warranty", "2 Years"),
            ],
            false,
            15,
        ),
        entry(
            "Air Purifier (GF-400)",
            "GFC-400",
            Category::AirPurifier,
            "HEPA Air Purification System",
            "Advanced air purifier with HEPA filter technology for clean and \
             healthy air quality.",
            "gf-400.jpg",
            56999,
            205,
            &["HEPA Filter", "Smart Sensor", "Low Noise", "Compact Design"],
            &[
                ("Air Flow", "300 m³/h"),
                ("Power", "45W"),
                ("Coverage", "35-45 sqm"),
                ("Filter Life", "6-8 Months"),
                ("Warranty", "2 Years"),
            ],
            true,
            18,
        ),
        entry(
            "InstaWarm 55",
            "GFC-GY-55",
            Category::Geyser,
            "Instant Electric Water Heating",
            "55-litre electric geyser with fast heating element and automatic \
             thermostat cut-off.",
            "instawarm-55.jpg",
            33750,
            121,
            &["Fast Heating", "Auto Cut-Off", "Insulated Tank", "Safety Valve"],
            &[
                ("Capacity", "55 Liters"),
                ("Power", "1500W"),
                ("Thermostat", "Automatic"),
                ("Warranty", "3 Years"),
            ],
            false,
            22,
        ),
    ]
}

/// Upsert the demo catalog through the administrative path.
///
/// Logs per-row outcome; stops on the first store failure.
pub async fn load_seed(store: &dyn CatalogStore) -> Result<usize, StoreError> {
    let drafts = seed_catalog();
    let total = drafts.len();

    for draft in drafts {
        let model_code = draft.model_code.clone();
        match store.upsert_product(draft).await {
            Ok(product) => {
                tracing::info!(model_code = %product.model_code, id = product.id, "seeded product");
            }
            Err(e) => {
                tracing::error!(model_code = %model_code, error = %e, "failed to seed product");
                return Err(e);
            }
        }
    }

    tracing::info!(count = total, "seed catalog loaded");
    Ok(total)
}
