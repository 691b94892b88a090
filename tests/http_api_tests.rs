//! Router-level integration tests.
//!
//! These drive the axum router directly with `tower::ServiceExt::oneshot`
//! against a seeded in-memory repository, exercising the full
//! handler → service → repository path including JSON (de)serialization.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use smartwaste::db::repositories::LocalRepository;
use smartwaste::db::repository::FullRepository;
use smartwaste::http::{create_router, AppState};

const CITIZEN_CNIC: &str = "35201-1234567-1";
const OPERATOR_CNIC: &str = "35202-7654321-9";

struct TestApp {
    router: Router,
    repo: LocalRepository,
    area_id: i32,
    warehouse_id: i32,
    category_id: i32,
}

/// Seed reference data and build a router over the shared repository.
async fn test_app() -> TestApp {
    let repo = LocalRepository::new();
    let area_id = repo.seed_area("Gulberg", "Lahore");
    let route_id = repo.seed_route("Gulberg Loop", area_id);
    let warehouse_id = repo.seed_warehouse("Gulberg Depot", area_id, 5_000.0);

    let state = AppState::new(Arc::new(repo.clone()) as Arc<dyn FullRepository>);
    let router = create_router(state);

    let app = TestApp {
        router,
        repo,
        area_id,
        warehouse_id,
        category_id: 0,
    };

    // Category via the API so the id matches what clients would see.
    let (status, body) = app
        .send(
            Method::POST,
            "/api/government/categories",
            Some(json!({"categoryName": "Plastic", "basePricePerKg": 40.0, "description": null})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = body["categoryId"].as_i64().unwrap() as i32;

    // One registered citizen and one operator on the route.
    let (status, _) = app
        .send(
            Method::POST,
            "/api/citizen/register",
            Some(json!({
                "cnic": CITIZEN_CNIC,
                "fullName": "Ali Raza",
                "phoneNumber": "03001234567",
                "areaId": area_id,
                "address": "12-B Main Boulevard",
                "password": "secret123"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/government/operators",
            Some(json!({
                "cnic": OPERATOR_CNIC,
                "fullName": "Bilal Ahmed",
                "phoneNumber": "03217654321",
                "routeId": route_id,
                "warehouseId": warehouse_id,
                "password": "op-password"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    TestApp {
        category_id,
        ..app
    }
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send_with_headers(method, uri, body, &[]).await
    }

    async fn send_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_listing(&self, weight: f64) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/citizen/listings",
                Some(json!({
                    "citizenId": CITIZEN_CNIC,
                    "categoryId": self.category_id,
                    "weight": weight
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["listingId"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app().await;

    let (status, body) = app.send(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_validate_cnic_endpoint() {
    let app = test_app().await;

    let (status, body) = app
        .send(Method::GET, "/api/auth/validate-cnic/55555-5555555-5", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);

    let (_, body) = app
        .send(Method::GET, "/api/auth/validate-cnic/bogus", None)
        .await;
    assert_eq!(body["valid"], false);
}

#[tokio::test]
async fn test_login_round_trip() {
    let app = test_app().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            Some(json!({"cnic": CITIZEN_CNIC, "password": "secret123"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["roleName"], "Citizen");
    assert_eq!(body["citizenId"], CITIZEN_CNIC);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            Some(json!({"cnic": CITIZEN_CNIC, "password": "nope"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid CNIC or password");
}

#[tokio::test]
async fn test_duplicate_registration_is_bad_request() {
    let app = test_app().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/citizen/register",
            Some(json!({
                "cnic": CITIZEN_CNIC,
                "fullName": "Someone Else",
                "phoneNumber": null,
                "areaId": app.area_id,
                "address": null,
                "password": "pw"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_listing_lifecycle_over_api() {
    let app = test_app().await;
    let listing_id = app.create_listing(2.5).await;

    // Estimated price followed the category rate.
    let (status, body) = app
        .send(
            Method::GET,
            &format!(
                "/api/citizen/price-estimate?categoryId={}&weight=2.5",
                app.category_id
            ),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estimatedPrice"], 100.0);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/citizen/listings/{}", CITIZEN_CNIC),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["status"], "Pending");
    assert_eq!(body[0]["estimatedPrice"], 100.0);
    assert_eq!(body[0]["categoryName"], "Plastic");

    // Cancel, then cancel again (no-op failure).
    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/citizen/listings/{}/cancel", listing_id),
            Some(json!({"citizenId": CITIZEN_CNIC})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/citizen/listings/{}/cancel", listing_id),
            Some(json!({"citizenId": CITIZEN_CNIC})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_collection_flow_over_api() {
    let app = test_app().await;
    let listing_id = app.create_listing(4.0).await;

    // Operator sees the pending point on their route.
    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/operator/collections/{}", OPERATOR_CNIC),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["listingId"], listing_id);

    let collect_body = json!({
        "operatorId": OPERATOR_CNIC,
        "listingId": listing_id,
        "collectedWeight": 4.0,
        "warehouseId": app.warehouse_id
    });
    let (status, body) = app
        .send(Method::POST, "/api/operator/collect", Some(collect_body.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paymentAmount"], 160.0);
    assert!(body["transactionId"].is_i64());
    assert_eq!(body["verificationCode"].as_str().unwrap().len(), 10);

    // Stock and warehouse totals moved.
    assert_eq!(app.repo.stock_weight(app.warehouse_id, app.category_id), 4.0);

    // Collecting the same listing again fails with 400 and no extra rows.
    let (status, _) = app
        .send(Method::POST, "/api/operator/collect", Some(collect_body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.repo.collection_count(), 1);

    // The payment reached the citizen's transaction history.
    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/citizen/transactions/{}", CITIZEN_CNIC),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["totalAmount"], 160.0);
    assert_eq!(body[0]["paymentStatus"], "Pending");

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/operator/history/{}", OPERATOR_CNIC),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_legacy_backend_header_does_not_change_results() {
    let app = test_app().await;
    app.create_listing(3.0).await;

    let uri = format!("/api/citizen/listings/{}", CITIZEN_CNIC);
    let (status_ef, body_ef) = app
        .send_with_headers(Method::GET, &uri, None, &[("X-Use-EF", "true")])
        .await;
    let (status_sp, body_sp) = app
        .send_with_headers(Method::GET, &uri, None, &[("X-Use-EF", "false")])
        .await;
    let (status_plain, body_plain) = app.send(Method::GET, &uri, None).await;

    assert_eq!(status_ef, StatusCode::OK);
    assert_eq!(status_ef, status_sp);
    assert_eq!(status_ef, status_plain);
    assert_eq!(body_ef, body_sp);
    assert_eq!(body_ef, body_plain);
}

#[tokio::test]
async fn test_not_found_mappings() {
    let app = test_app().await;

    let (status, _) = app
        .send(Method::GET, "/api/citizen/profile/99999-9999999-9", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::GET, "/api/operator/details/99999-9999999-9", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/government/complaint/status",
            Some(json!({"complaintId": 12345, "status": "Resolved"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_government_category_management() {
    let app = test_app().await;
    app.create_listing(2.0).await;

    // Price update cascades to the pending listing.
    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/government/categories/{}/price", app.category_id),
            Some(json!({"newPrice": 55.0})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .send(
            Method::GET,
            &format!("/api/citizen/listings/{}", CITIZEN_CNIC),
            None,
        )
        .await;
    assert_eq!(body[0]["estimatedPrice"], 110.0);

    let (_, body) = app.send(Method::GET, "/api/government/categories", None).await;
    assert_eq!(body[0]["basePricePerKg"], 55.0);

    // Delete, then delete again.
    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/government/categories/{}", app.category_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/government/categories/{}", app.category_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_government_reports_and_inventory() {
    let app = test_app().await;
    let listing_id = app.create_listing(10.0).await;
    app.send(
        Method::POST,
        "/api/operator/collect",
        Some(json!({
            "operatorId": OPERATOR_CNIC,
            "listingId": listing_id,
            "collectedWeight": 10.0,
            "warehouseId": app.warehouse_id
        })),
    )
    .await;

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/government/inventory?warehouseId={}", app.warehouse_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["currentInventory"], 10.0);
    assert_eq!(body[0]["capacityUsedPercent"], 0.2);

    let (status, body) = app
        .send(Method::GET, "/api/government/reports/high-yield-areas", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["areaName"], "Gulberg");
    assert_eq!(body[0]["totalListings"], 1);
    assert_eq!(body[0]["revenueRank"], 1);

    let (status, body) = app
        .send(
            Method::GET,
            "/api/government/reports/operator-performance",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["operatorId"], OPERATOR_CNIC);
    assert_eq!(body[0]["totalCollections"], 1);
    assert_eq!(body[0]["rating"], "New");
}

#[tokio::test]
async fn test_invalid_complaint_status_filter_is_bad_request() {
    let app = test_app().await;

    let (status, body) = app
        .send(Method::GET, "/api/government/complaints?status=Bogus", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}
