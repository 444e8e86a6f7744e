//! End-to-end submission tests against the public API.
//!
//! Geocoding and notification are replaced by deterministic in-memory
//! doubles; nothing here touches the network.

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use immo_estimate::api::build_router;
use immo_estimate::config::AppConfig;
use immo_estimate::error::GeocodeError;
use immo_estimate::estimation::geocode::{AddressDetails, GeocodeMatch, Geocoder};
use immo_estimate::estimation::notify::{EstimateNotification, NotificationOutcome, Notifier};
use immo_estimate::estimation::{
    BaselineSource, EstimateRequest, EstimationService, PriceEstimate,
};
use immo_estimate::round_to_thousand;

const YEAR: i32 = 2025;

/// Geocoder with a fixed answer for every query
struct MockGeocoder {
    available: bool,
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn search(&self, address: &str) -> Result<Vec<GeocodeMatch>, GeocodeError> {
        if !self.available {
            return Err(GeocodeError::Decode("connection reset".to_string()));
        }
        Ok(vec![GeocodeMatch {
            lat: "46.52".to_string(),
            lon: "6.63".to_string(),
            display_name: address.to_string(),
            address: AddressDetails {
                suburb: Some("Ouchy".to_string()),
                city: Some("Lausanne".to_string()),
                ..Default::default()
            },
        }])
    }
}

#[derive(Default)]
struct MockNotifier {
    sent: Mutex<Vec<EstimateNotification>>,
    fail: bool,
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, notification: &EstimateNotification) -> Result<()> {
        if self.fail {
            return Err(anyhow::anyhow!("SMTP 554 transaction failed"));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

fn service(geocoding: bool, notifier: Arc<MockNotifier>) -> EstimationService {
    EstimationService::new(
        &AppConfig::default(),
        Arc::new(MockGeocoder {
            available: geocoding,
        }),
        notifier,
    )
    .with_current_year(YEAR)
}

fn geneva_apartment() -> EstimateRequest {
    EstimateRequest {
        category: Some("apartment".to_string()),
        region: Some("Genève".to_string()),
        municipality: Some("Genève-Ville".to_string()),
        postal_code: Some("1204".to_string()),
        street_address: Some("Rue du Rhône 1".to_string()),
        area: Some(80.0.into()),
        year_built: Some((i64::from(YEAR) - 10).into()),
        room_count: Some(3.0.into()),
        bathroom_count: Some(1.0.into()),
        has_balcony: true,
        has_terrace: false,
        view_type: None,
        ..Default::default()
    }
}

fn lausanne_land() -> EstimateRequest {
    EstimateRequest {
        category: Some("land".to_string()),
        region: Some("Vaud".to_string()),
        municipality: Some("Lausanne".to_string()),
        postal_code: Some("1003".to_string()),
        street_address: Some("Avenue de Rhodanie 2".to_string()),
        area: Some(500.0.into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_geneva_apartment_with_geocoding_down() {
    let notifier = Arc::new(MockNotifier::default());
    let service = service(false, notifier.clone());

    let submission = service.submit_tracked(&geneva_apartment()).await.unwrap();
    let estimate = submission.estimate;

    // Literal recomputation: fallback baseline 8500 × 1.8, then region,
    // category (3 rooms), view (none), exterior (balcony), age (10 years)
    let baseline = 8500.0 * 1.8;
    let raw = baseline * 80.0 * 1.8 * (1.0 + 0.05 * 3.0) * 1.0 * (1.0 + 0.05) * (1.0 - 10.0 * 0.005);

    assert_eq!(estimate.baseline_source, BaselineSource::Fallback);
    assert_eq!(estimate.regional_baseline_per_area, 15_300);
    assert_eq!(estimate.base_price, round_to_thousand(raw));
    assert_eq!(estimate.base_price, 2_527_000);
    assert_eq!(estimate.min_price, round_to_thousand(raw * 0.9));
    assert_eq!(estimate.max_price, round_to_thousand(raw * 1.1));
    assert_eq!(estimate.price_per_area, (raw / 80.0).round() as u64);

    assert_eq!(
        submission.notification.wait().await,
        NotificationOutcome::Delivered
    );
    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].estimated_value, 2_527_000);
}

#[tokio::test]
async fn test_land_needs_no_building_fields() {
    let service = service(true, Arc::new(MockNotifier::default()));

    let estimate = service.submit(&lausanne_land()).await.unwrap();

    // Lausanne 12000/m² × 500 m² × Vaud 1.5 × land 0.8, no age factor
    assert_eq!(estimate.baseline_source, BaselineSource::Geocoded);
    assert_eq!(estimate.regional_baseline_per_area, 12_000);
    assert_eq!(estimate.base_price, 7_200_000);
    assert_eq!(estimate.min_price, 6_480_000);
    assert_eq!(estimate.max_price, 7_920_000);
    assert_eq!(estimate.price_per_area, 14_400);
}

#[tokio::test]
async fn test_land_ignores_year_built() {
    let service = service(true, Arc::new(MockNotifier::default()));

    let old = EstimateRequest {
        year_built: Some(1820.0.into()),
        ..lausanne_land()
    };

    assert_eq!(
        service.submit(&old).await.unwrap(),
        service.submit(&lausanne_land()).await.unwrap()
    );
}

#[tokio::test]
async fn test_notification_failure_not_visible_to_caller() {
    let notifier = Arc::new(MockNotifier {
        fail: true,
        ..Default::default()
    });
    let failing = service(false, notifier);
    let working = service(false, Arc::new(MockNotifier::default()));

    let submission = failing.submit_tracked(&geneva_apartment()).await.unwrap();
    let estimate = submission.estimate;
    assert_eq!(
        submission.notification.wait().await,
        NotificationOutcome::Failed
    );

    assert_eq!(estimate, working.submit(&geneva_apartment()).await.unwrap());
}

#[tokio::test]
async fn test_invalid_submission_never_notifies() {
    let notifier = Arc::new(MockNotifier::default());
    let service = service(true, notifier.clone());

    let req = EstimateRequest {
        room_count: None,
        area: Some(0.0.into()),
        ..geneva_apartment()
    };

    let err = service.submit(&req).await.unwrap_err();
    assert!(err.has_field("area"));
    assert!(err.has_field("roomCount"));

    tokio::task::yield_now().await;
    assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_every_category_keeps_range_invariant() {
    let service = service(true, Arc::new(MockNotifier::default()));

    let requests = vec![
        geneva_apartment(),
        EstimateRequest {
            category: Some("house".to_string()),
            floor_count: Some(2.0.into()),
            view_type: Some("Lac".to_string()),
            ..geneva_apartment()
        },
        EstimateRequest {
            category: Some("villa".to_string()),
            bathroom_count: Some(3.0.into()),
            has_terrace: true,
            year_built: Some(1850.0.into()),
            ..geneva_apartment()
        },
        EstimateRequest {
            category: Some("building".to_string()),
            unit_count: Some(8.0.into()),
            avg_unit_room_count: Some(3.5.into()),
            region: Some("Tessin".to_string()),
            municipality: Some("Lugano".to_string()),
            ..geneva_apartment()
        },
        lausanne_land(),
    ];

    for req in requests {
        let e: PriceEstimate = service.submit(&req).await.unwrap();
        assert!(e.min_price <= e.base_price && e.base_price <= e.max_price);
        for price in [e.min_price, e.base_price, e.max_price] {
            assert_eq!(price % 1000, 0, "{:?}", req.category);
        }
    }
}

#[tokio::test]
async fn test_http_estimate_with_form_payload() {
    let app = build_router(Arc::new(service(false, Arc::new(MockNotifier::default()))));

    let payload = r#"{
        "propertyType": "apartment",
        "canton": "Genève",
        "city": "Genève-Ville",
        "postalCode": "1204",
        "address": "Rue du Rhône 1",
        "surface": 80,
        "yearBuilt": 2015,
        "rooms": 3,
        "bathrooms": 1,
        "hasBalcony": true,
        "hasTerrace": false,
        "view": ""
    }"#;

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/estimate")
                .header("content-type", "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["basePrice"], 2_527_000);
    assert_eq!(json["minPrice"], 2_275_000);
    assert_eq!(json["maxPrice"], 2_780_000);
    assert_eq!(json["pricePerArea"], 31_592);
    assert_eq!(json["regionalBaselinePerArea"], 15_300);
    assert_eq!(json["baselineSource"], "fallback");
}

async fn post_estimate(app: axum::Router, payload: &'static str) -> (StatusCode, serde_json::Value) {
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/estimate")
                .header("content-type", "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_http_estimate_with_text_inputs() {
    let app = build_router(Arc::new(service(false, Arc::new(MockNotifier::default()))));

    // Plain HTML inputs post every number as a string
    let payload = r#"{
        "propertyType": "apartment",
        "canton": "Genève",
        "city": "Genève-Ville",
        "postalCode": "1204",
        "address": "Rue du Rhône 1",
        "surface": "80",
        "yearBuilt": "2015",
        "rooms": "3",
        "bathrooms": "1",
        "floors": "",
        "buildingUnits": "",
        "unitsRooms": "",
        "hasBalcony": true,
        "hasTerrace": false,
        "view": ""
    }"#;

    let (status, json) = post_estimate(app, payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["basePrice"], 2_527_000);
    assert_eq!(json["pricePerArea"], 31_592);
}

#[tokio::test]
async fn test_http_bad_text_input_lists_fields() {
    let app = build_router(Arc::new(service(false, Arc::new(MockNotifier::default()))));

    let payload = r#"{
        "propertyType": "apartment",
        "canton": "Genève",
        "city": "Genève-Ville",
        "postalCode": "1204",
        "address": "Rue du Rhône 1",
        "surface": "eighty",
        "yearBuilt": "2015",
        "rooms": "3",
        "bathrooms": "one"
    }"#;

    let (status, json) = post_estimate(app, payload).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "validation failed");

    let fields: Vec<&str> = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["area", "bathroomCount"]);
}

#[tokio::test]
async fn test_http_address_lookup_found() {
    let app = build_router(Arc::new(service(true, Arc::new(MockNotifier::default()))));

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/address/lookup?address=Avenue%20de%20Rhodanie%202")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["valid"], true);
    assert_eq!(json["neighborhood"], "Ouchy");
    assert_eq!(json["displayName"], "Avenue de Rhodanie 2, Switzerland");
}
