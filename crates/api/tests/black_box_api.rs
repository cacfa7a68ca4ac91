use std::sync::Arc;

use axum::extract::Request;
use axum::ServiceExt;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;

use gfc_catalog::{Category, NewContact, Product, ProductDraft};
use gfc_api::app::services::AppServices;

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over a fresh in-memory store, bound to an
        // ephemeral port.
        let services = Arc::new(AppServices::in_memory());
        let app = gfc_api::app::build_app(services.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
                .await
                .unwrap();
        });

        Self {
            base_url,
            services,
            handle,
        }
    }

    async fn seed(&self, draft: ProductDraft) -> Product {
        self.services
            .store()
            .upsert_product(draft)
            .await
            .expect("seeding a test product failed")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn draft(model_code: &str, name: &str, category: Category) -> ProductDraft {
    ProductDraft {
        model_code: model_code.to_string(),
        name: name.to_string(),
        category,
        tagline: "Built to last".to_string(),
        description: "Quiet, efficient appliance".to_string(),
        image_url: format!("https://cdn.example.com/{model_code}.jpg"),
        image_local: None,
        price_pkr: Decimal::new(1250000, 2),
        price_usd: None,
        specifications: Default::default(),
        features: vec!["Copper winding".to_string()],
        rating: 4.2,
        review_count: 17,
        is_active: true,
        is_featured: false,
        stock: 5,
    }
}

#[tokio::test]
async fn health_probe_responds() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn every_route_answers_with_and_without_a_trailing_slash() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let product = srv.seed(draft("GFC-N", "Norm Fan", Category::CeilingFan)).await;

    let get_paths = [
        "/api/products".to_string(),
        "/api/products/featured".to_string(),
        "/api/products/by_category".to_string(),
        "/api/products/categories".to_string(),
        format!("/api/products/{}", product.id),
        format!("/api/products/{}/related", product.id),
        "/api/contact".to_string(),
    ];
    for path in &get_paths {
        for suffix in ["", "/"] {
            let res = client
                .get(format!("{}{}{}", srv.base_url, path, suffix))
                .send()
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::OK, "GET {path}{suffix}");
        }
    }

    for (i, suffix) in ["", "/"].into_iter().enumerate() {
        let res = client
            .post(format!("{}/api/newsletter{}", srv.base_url, suffix))
            .json(&json!({ "email": format!("slash{i}@example.com") }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED, "POST /api/newsletter{suffix}");

        let res = client
            .post(format!("{}/api/contact{}", srv.base_url, suffix))
            .json(&json!({
                "name": "Ayesha Khan",
                "email": "ayesha@example.com",
                "phone": "+92-300-1234567",
                "subject": "Hours",
                "message": "When is the showroom open?",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED, "POST /api/contact{suffix}");
    }
}

#[tokio::test]
async fn inactive_products_are_hidden_everywhere() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let active = srv.seed(draft("GFC-A", "Visible Fan", Category::CeilingFan)).await;
    let mut hidden = draft("GFC-B", "Hidden Fan", Category::CeilingFan);
    hidden.is_active = false;
    hidden.is_featured = true;
    let hidden = srv.seed(hidden).await;

    // Listing
    let body: serde_json::Value = client
        .get(format!("{}/api/products/", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![active.id]);

    // Featured strip
    let body: serde_json::Value = client
        .get(format!("{}/api/products/featured/", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body.as_array().unwrap().is_empty());

    // Grouped view
    let body: serde_json::Value = client
        .get(format!("{}/api/products/by_category/", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let fans = body["ceiling_fan"].as_array().unwrap();
    assert_eq!(fans.len(), 1);
    assert_eq!(fans[0]["id"].as_i64().unwrap(), active.id);

    // Detail
    let res = client
        .get(format!("{}/api/products/{}/", srv.base_url, hidden.id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn featured_strip_caps_at_six() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for i in 0..7 {
        let mut d = draft(&format!("GFC-F{i}"), &format!("Featured {i}"), Category::CeilingFan);
        d.is_featured = true;
        srv.seed(d).await;
    }
    srv.seed(draft("GFC-PLAIN", "Plain Fan", Category::CeilingFan)).await;

    let body: serde_json::Value = client
        .get(format!("{}/api/products/featured/", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 6);
    assert!(items.iter().all(|p| p["is_featured"].as_bool().unwrap()));
}

#[tokio::test]
async fn by_category_caps_at_three_and_omits_empty_groups() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for i in 0..4 {
        srv.seed(draft(&format!("GFC-CF{i}"), &format!("Fan {i}"), Category::CeilingFan))
            .await;
    }
    srv.seed(draft("GFC-AC", "Arctic Breeze", Category::AirCooler)).await;

    let body: serde_json::Value = client
        .get(format!("{}/api/products/by_category/", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let groups = body.as_object().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups["ceiling_fan"].as_array().unwrap().len(), 3);
    assert_eq!(groups["air_cooler"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn related_products_share_the_category_and_exclude_the_seed() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut fan_ids = Vec::new();
    for i in 0..6 {
        let p = srv
            .seed(draft(&format!("GFC-R{i}"), &format!("Related {i}"), Category::CeilingFan))
            .await;
        fan_ids.push(p.id);
    }
    srv.seed(draft("GFC-GY", "InstaWarm", Category::Geyser)).await;

    let subject = fan_ids[0];
    let body: serde_json::Value = client
        .get(format!("{}/api/products/{}/related/", srv.base_url, subject))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 4);
    for item in items {
        assert_ne!(item["id"].as_i64().unwrap(), subject);
        assert_eq!(item["category"].as_str().unwrap(), "ceiling_fan");
    }
}

#[tokio::test]
async fn related_requires_a_resolvable_active_seed() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut inactive = draft("GFC-X", "Retired Fan", Category::CeilingFan);
    inactive.is_active = false;
    let inactive = srv.seed(inactive).await;

    for (path, reason) in [
        ("/api/products/999/related/".to_string(), "unknown id"),
        (format!("/api/products/{}/related/", inactive.id), "inactive seed"),
        ("/api/products/abc/related/".to_string(), "non-numeric id"),
    ] {
        let res = client
            .get(format!("{}{}", srv.base_url, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{reason}");
    }
}

#[tokio::test]
async fn listing_supports_filters_search_and_ordering() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut cheap = draft("GFC-CHEAP", "Budget Fan", Category::CeilingFan);
    cheap.price_pkr = Decimal::new(500000, 2);
    srv.seed(cheap).await;
    let mut dear = draft("GFC-DEAR", "Premium Fan", Category::CeilingFan);
    dear.price_pkr = Decimal::new(2500000, 2);
    srv.seed(dear).await;
    srv.seed(draft("GFC-WM", "WashMaster", Category::WashingMachine)).await;

    // Category filter
    let body: serde_json::Value = client
        .get(format!("{}/api/products/?category=washing_machine", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["model_code"].as_str().unwrap(), "GFC-WM");

    // Case-insensitive search over name
    let body: serde_json::Value = client
        .get(format!("{}/api/products/?search=PREMIUM", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["model_code"].as_str().unwrap(), "GFC-DEAR");

    // Explicit descending price ordering
    let body: serde_json::Value = client
        .get(format!("{}/api/products/?ordering=-price_pkr", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let codes: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["model_code"].as_str().unwrap())
        .collect();
    assert_eq!(codes[0], "GFC-DEAR");
}

#[tokio::test]
async fn malformed_listing_parameters_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for query in [
        "category=spaceship",
        "ordering=name",
        "is_featured=maybe",
        "page=0",
    ] {
        let res = client
            .get(format!("{}/api/products/?{}", srv.base_url, query))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{query}");
    }
}

#[tokio::test]
async fn category_listing_is_the_full_static_enumeration() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let body: serde_json::Value = client
        .get(format!("{}/api/products/categories/", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 9);
    assert_eq!(items[0], json!({ "id": "ceiling_fan", "name": "Ceiling Fan" }));
    assert!(items.iter().any(|c| c["id"] == "geyser"));
}

#[tokio::test]
async fn detail_projection_carries_bookkeeping_fields_listing_does_not() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let product = srv.seed(draft("GFC-P", "Projection Fan", Category::CeilingFan)).await;

    let listing: serde_json::Value = client
        .get(format!("{}/api/products/", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let card = &listing.as_array().unwrap()[0];
    assert!(card.get("created_at").is_none());
    assert!(card.get("is_active").is_none());
    assert!(card.get("image_local").is_none());

    let detail: serde_json::Value = client
        .get(format!("{}/api/products/{}/", srv.base_url, product.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(detail.get("created_at").is_some());
    assert!(detail.get("updated_at").is_some());
    assert_eq!(detail["is_active"].as_bool().unwrap(), true);
}

#[tokio::test]
async fn newsletter_subscription_is_idempotent() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/newsletter/", srv.base_url))
        .json(&json!({ "email": "fan@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "detail": "Subscribed successfully" }));

    let res = client
        .post(format!("{}/api/newsletter/", srv.base_url))
        .json(&json!({ "email": "fan@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "detail": "Already subscribed" }));

    let subscribers = srv.services.store().list_subscribers().await.unwrap();
    assert_eq!(subscribers.len(), 1);
    assert!(subscribers[0].is_active);
}

#[tokio::test]
async fn newsletter_requires_a_valid_email() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for payload in [json!({}), json!({ "email": "" }), json!({ "email": "   " })] {
        let res = client
            .post(format!("{}/api/newsletter/", srv.base_url))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "Email is required");
    }

    let res = client
        .post(format!("{}/api/newsletter/", srv.base_url))
        .json(&json!({ "email": "not-an-email" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn contact_round_trip_survives_product_deletion() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let product = srv.seed(draft("GFC-C", "Contact Fan", Category::CeilingFan)).await;

    let res = client
        .post(format!("{}/api/contact/", srv.base_url))
        .json(&json!({
            "name": "Ayesha Khan",
            "email": "ayesha@example.com",
            "phone": "+92-300-1234567",
            "subject": "Warranty question",
            "message": "Does this model ship with a 5-year warranty?",
            "product": product.id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "detail": "Message sent successfully" }));

    let listing: serde_json::Value = client
        .get(format!("{}/api/contact/", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = listing.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["product"].as_i64().unwrap(), product.id);
    assert!(items[0].get("is_read").is_none());

    // Deleting the product nulls the reference but keeps the message.
    assert!(srv.services.store().delete_product(product.id).await.unwrap());
    let listing: serde_json::Value = client
        .get(format!("{}/api/contact/", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = listing.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0]["product"].is_null());
}

#[tokio::test]
async fn contact_submissions_are_validated() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Missing fields
    let res = client
        .post(format!("{}/api/contact/", srv.base_url))
        .json(&json!({ "name": "Ayesha Khan" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Whitespace-only fields
    let res = client
        .post(format!("{}/api/contact/", srv.base_url))
        .json(&json!({
            "name": "   ",
            "email": "ayesha@example.com",
            "phone": "+92-300-1234567",
            "subject": "Hi",
            "message": "Hello",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Malformed email
    let res = client
        .post(format!("{}/api/contact/", srv.base_url))
        .json(&json!({
            "name": "Ayesha Khan",
            "email": "nope",
            "phone": "+92-300-1234567",
            "subject": "Hi",
            "message": "Hello",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Dangling product reference
    let res = client
        .post(format!("{}/api/contact/", srv.base_url))
        .json(&json!({
            "name": "Ayesha Khan",
            "email": "ayesha@example.com",
            "phone": "+92-300-1234567",
            "subject": "Hi",
            "message": "Hello",
            "product": 424242,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let contacts = srv.services.store().list_contacts().await.unwrap();
    assert!(contacts.is_empty());
}

#[tokio::test]
async fn contact_messages_can_be_triaged_through_the_store() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/contact/", srv.base_url))
        .json(&json!({
            "name": "Bilal Ahmed",
            "email": "bilal@example.com",
            "phone": "+92-321-7654321",
            "subject": "Dealer inquiry",
            "message": "Interested in stocking your coolers.",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let contacts = srv.services.store().list_contacts().await.unwrap();
    assert_eq!(contacts.len(), 1);
    assert!(!contacts[0].is_read);

    assert!(srv.services.store().mark_contact_read(contacts[0].id).await.unwrap());
    let contacts = srv.services.store().list_contacts().await.unwrap();
    assert!(contacts[0].is_read);

    // Unknown ids are reported, not errors.
    assert!(!srv.services.store().mark_contact_read(999).await.unwrap());
}

#[tokio::test]
async fn seed_catalog_loads_and_serves() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let count = gfc_store::load_seed(srv.services.store()).await.unwrap();
    assert!(count >= 9);

    let body: serde_json::Value = client
        .get(format!("{}/api/products/featured/", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let featured = body.as_array().unwrap();
    assert!(!featured.is_empty());
    assert!(featured.len() <= 6);

    // Every category group respects its cap.
    let body: serde_json::Value = client
        .get(format!("{}/api/products/by_category/", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    for (_, group) in body.as_object().unwrap() {
        assert!(group.as_array().unwrap().len() <= 3);
    }
}

#[tokio::test]
async fn pagination_is_stable_under_the_default_order() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for i in 0..5 {
        srv.seed(draft(&format!("GFC-PG{i}"), &format!("Page Fan {i}"), Category::CeilingFan))
            .await;
    }

    let page1: serde_json::Value = client
        .get(format!("{}/api/products/?page=1&page_size=2", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let page2: serde_json::Value = client
        .get(format!("{}/api/products/?page=2&page_size=2", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let ids1: Vec<i64> = page1.as_array().unwrap().iter().map(|p| p["id"].as_i64().unwrap()).collect();
    let ids2: Vec<i64> = page2.as_array().unwrap().iter().map(|p| p["id"].as_i64().unwrap()).collect();
    assert_eq!(ids1.len(), 2);
    assert_eq!(ids2.len(), 2);
    assert!(ids1.iter().all(|id| !ids2.contains(id)));

    let page3: serde_json::Value = client
        .get(format!("{}/api/products/?page=3&page_size=2", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page3.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn store_level_contact_insert_matches_http_projection() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    srv.services
        .store()
        .insert_contact(NewContact {
            name: "Sana Tariq".to_string(),
            email: "sana@example.com".to_string(),
            phone: "+92-333-0000000".to_string(),
            subject: "Spare parts".to_string(),
            message: "Looking for a replacement blade set.".to_string(),
            product_id: None,
        })
        .await
        .unwrap();

    let listing: serde_json::Value = client
        .get(format!("{}/api/contact/", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = listing.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Sana Tariq");
    assert!(items[0]["product"].is_null());
}
