//! Workflow tests for the service layer against the in-memory backend.

use super::services;
use crate::api::{
    round_money, CitizenRegistration, CollectionRequest, ComplaintStatus, ListingId,
    ListingStatus, NewCategory, NewListing, NewOperator, WarehouseDeposit,
};
use crate::db::repositories::LocalRepository;
use crate::db::repository::RepositoryError;

const CITIZEN_CNIC: &str = "35201-1234567-1";
const OPERATOR_CNIC: &str = "35202-7654321-9";

struct Fixture {
    repo: LocalRepository,
    area_id: i32,
    route_id: i32,
    warehouse_id: i32,
    category_id: i32,
}

/// Seed an area/route/warehouse/category and one registered citizen plus
/// one operator assigned to the route.
async fn fixture() -> Fixture {
    let repo = LocalRepository::new();
    let area_id = repo.seed_area("Gulberg", "Lahore");
    let route_id = repo.seed_route("Gulberg Loop", area_id);
    let warehouse_id = repo.seed_warehouse("Gulberg Depot", area_id, 5_000.0);

    let category_id = services::create_category(
        &repo,
        &NewCategory {
            category_name: "Plastic".to_string(),
            base_price_per_kg: 40.0,
            description: Some("PET and HDPE".to_string()),
        },
    )
    .await
    .unwrap();

    services::register_citizen(
        &repo,
        &CitizenRegistration {
            cnic: CITIZEN_CNIC.to_string(),
            full_name: "Ali Raza".to_string(),
            phone_number: Some("03001234567".to_string()),
            area_id,
            address: Some("12-B Main Boulevard".to_string()),
            password: "secret123".to_string(),
        },
    )
    .await
    .unwrap();

    services::create_operator(
        &repo,
        &NewOperator {
            cnic: OPERATOR_CNIC.to_string(),
            full_name: "Bilal Ahmed".to_string(),
            phone_number: Some("03217654321".to_string()),
            route_id: Some(route_id),
            warehouse_id: Some(warehouse_id),
            password: Some("op-password".to_string()),
        },
    )
    .await
    .unwrap();

    Fixture {
        repo,
        area_id,
        route_id,
        warehouse_id,
        category_id,
    }
}

async fn pending_listing(fx: &Fixture, weight: f64) -> ListingId {
    services::create_listing(
        &fx.repo,
        &NewListing {
            citizen_id: CITIZEN_CNIC.to_string(),
            category_id: fx.category_id,
            weight,
        },
    )
    .await
    .unwrap()
    .listing_id
}

// ==================== Registration ====================

#[tokio::test]
async fn test_register_duplicate_cnic_fails_without_rows() {
    let fx = fixture().await;

    let result = services::register_citizen(
        &fx.repo,
        &CitizenRegistration {
            cnic: CITIZEN_CNIC.to_string(),
            full_name: "Someone Else".to_string(),
            phone_number: None,
            area_id: fx.area_id,
            address: None,
            password: "other".to_string(),
        },
    )
    .await;

    assert!(matches!(
        result,
        Err(RepositoryError::ValidationError { .. })
    ));
    // The original registration is untouched.
    let profile = services::my_profile(&fx.repo, CITIZEN_CNIC).await.unwrap();
    assert_eq!(profile.unwrap().full_name, "Ali Raza");
}

#[tokio::test]
async fn test_register_invalid_cnic_rejected() {
    let fx = fixture().await;

    let result = services::register_citizen(
        &fx.repo,
        &CitizenRegistration {
            cnic: "not-a-cnic".to_string(),
            full_name: "Bad Format".to_string(),
            phone_number: None,
            area_id: fx.area_id,
            address: None,
            password: "pw".to_string(),
        },
    )
    .await;

    assert!(matches!(
        result,
        Err(RepositoryError::ValidationError { .. })
    ));
    assert!(!fx.repo.has_user("not-a-cnic"));
}

#[tokio::test]
async fn test_register_invalid_phone_rejected() {
    let fx = fixture().await;

    let result = services::register_citizen(
        &fx.repo,
        &CitizenRegistration {
            cnic: "35299-0000000-1".to_string(),
            full_name: "Bad Phone".to_string(),
            phone_number: Some("12345".to_string()),
            area_id: fx.area_id,
            address: None,
            password: "pw".to_string(),
        },
    )
    .await;

    assert!(matches!(
        result,
        Err(RepositoryError::ValidationError { .. })
    ));
    assert!(!fx.repo.has_user("35299-0000000-1"));
}

// ==================== Login ====================

#[tokio::test]
async fn test_login_success_resolves_profile() {
    let fx = fixture().await;

    let result = services::login(&fx.repo, CITIZEN_CNIC, "secret123")
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(result.role_name.as_deref(), Some("Citizen"));
    assert_eq!(result.citizen_id.as_deref(), Some(CITIZEN_CNIC));
    assert!(result.operator_id.is_none());

    let op_result = services::login(&fx.repo, OPERATOR_CNIC, "op-password")
        .await
        .unwrap();
    assert!(op_result.success);
    assert_eq!(op_result.operator_id.as_deref(), Some(OPERATOR_CNIC));
}

#[tokio::test]
async fn test_login_failure_is_generic() {
    let fx = fixture().await;

    let wrong_password = services::login(&fx.repo, CITIZEN_CNIC, "wrong")
        .await
        .unwrap();
    let unknown_user = services::login(&fx.repo, "99999-9999999-9", "secret123")
        .await
        .unwrap();

    assert!(!wrong_password.success);
    assert!(!unknown_user.success);
    // Both failures must be indistinguishable.
    assert_eq!(wrong_password.message, unknown_user.message);
    assert!(wrong_password.user_id.is_none());
}

// ==================== Listings and pricing ====================

#[tokio::test]
async fn test_create_listing_prices_from_category_rate() {
    let fx = fixture().await;

    let created = services::create_listing(
        &fx.repo,
        &NewListing {
            citizen_id: CITIZEN_CNIC.to_string(),
            category_id: fx.category_id,
            weight: 2.5,
        },
    )
    .await
    .unwrap();

    assert_eq!(created.estimated_price, round_money(2.5 * 40.0));

    let listings = services::my_listings(&fx.repo, CITIZEN_CNIC).await.unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].status, ListingStatus::Pending);
    assert_eq!(listings[0].category_name, "Plastic");
    assert_eq!(listings[0].created_at, created.created_at);
}

#[tokio::test]
async fn test_create_listing_rejects_out_of_range_weight() {
    let fx = fixture().await;

    for weight in [0.0, 0.05, -3.0, 10_000.5] {
        let result = services::create_listing(
            &fx.repo,
            &NewListing {
                citizen_id: CITIZEN_CNIC.to_string(),
                category_id: fx.category_id,
                weight,
            },
        )
        .await;
        assert!(
            matches!(result, Err(RepositoryError::ValidationError { .. })),
            "weight {} should be rejected",
            weight
        );
    }
    assert_eq!(fx.repo.listing_count(), 0);
}

#[tokio::test]
async fn test_price_estimate_matches_local_multiply() {
    let fx = fixture().await;

    let estimate = services::price_estimate(&fx.repo, fx.category_id, 3.7)
        .await
        .unwrap();
    assert_eq!(estimate.category_name, "Plastic");
    assert_eq!(estimate.base_price_per_kg, 40.0);
    assert_eq!(estimate.estimated_price, round_money(3.7 * 40.0));

    let direct = services::calculate_price(&fx.repo, fx.category_id, 3.7)
        .await
        .unwrap();
    assert_eq!(estimate.estimated_price, direct);
}

#[tokio::test]
async fn test_price_estimate_unknown_category() {
    let fx = fixture().await;

    let result = services::price_estimate(&fx.repo, 999, 1.0).await;
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
}

// ==================== Cancellation ====================

#[tokio::test]
async fn test_cancel_only_own_pending_listing() {
    let fx = fixture().await;
    let listing_id = pending_listing(&fx, 5.0).await;

    // Wrong owner: no-op.
    assert!(!services::cancel_listing(&fx.repo, listing_id, "00000-0000000-0")
        .await
        .unwrap());

    // Owner cancels.
    assert!(services::cancel_listing(&fx.repo, listing_id, CITIZEN_CNIC)
        .await
        .unwrap());
    let listings = services::my_listings(&fx.repo, CITIZEN_CNIC).await.unwrap();
    assert_eq!(listings[0].status, ListingStatus::Cancelled);

    // Second cancel is a no-op failure.
    assert!(!services::cancel_listing(&fx.repo, listing_id, CITIZEN_CNIC)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_cancel_collected_listing_fails() {
    let fx = fixture().await;
    let listing_id = pending_listing(&fx, 5.0).await;

    services::collect_waste(
        &fx.repo,
        &CollectionRequest {
            operator_id: OPERATOR_CNIC.to_string(),
            listing_id,
            collected_weight: 5.0,
            warehouse_id: fx.warehouse_id,
        },
    )
    .await
    .unwrap();

    assert!(!services::cancel_listing(&fx.repo, listing_id, CITIZEN_CNIC)
        .await
        .unwrap());
}

// ==================== Collection workflow ====================

#[tokio::test]
async fn test_collect_waste_writes_all_records() {
    let fx = fixture().await;
    let listing_id = pending_listing(&fx, 4.2).await;

    let outcome = services::collect_waste(
        &fx.repo,
        &CollectionRequest {
            operator_id: OPERATOR_CNIC.to_string(),
            listing_id,
            collected_weight: 4.2,
            warehouse_id: fx.warehouse_id,
        },
    )
    .await
    .unwrap();

    // Exactly one collection row.
    assert_eq!(fx.repo.collection_count(), 1);
    let history = services::collection_history(&fx.repo, OPERATOR_CNIC)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].collection_id, outcome.collection_id);
    assert_eq!(history[0].listing_id, listing_id);

    // Listing flipped to Collected and linked to the payment.
    let listings = services::my_listings(&fx.repo, CITIZEN_CNIC).await.unwrap();
    assert_eq!(listings[0].status, ListingStatus::Collected);
    assert_eq!(listings[0].transaction_id, outcome.transaction_id);

    // Stock increased by the collected weight.
    assert_eq!(fx.repo.stock_weight(fx.warehouse_id, fx.category_id), 4.2);

    // Payment row created with the expected amount and code.
    let expected_amount = round_money(4.2 * 40.0);
    assert_eq!(outcome.payment_amount, Some(expected_amount));
    let code = outcome.verification_code.expect("verification code");
    assert_eq!(code.len(), 10);
    let transactions = services::my_transactions(&fx.repo, CITIZEN_CNIC)
        .await
        .unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].total_amount, expected_amount);
    assert_eq!(transactions[0].operator_id.as_deref(), Some(OPERATOR_CNIC));
}

#[tokio::test]
async fn test_collect_unknown_listing_leaves_no_partial_writes() {
    let fx = fixture().await;

    let result = services::collect_waste(
        &fx.repo,
        &CollectionRequest {
            operator_id: OPERATOR_CNIC.to_string(),
            listing_id: ListingId(404),
            collected_weight: 1.0,
            warehouse_id: fx.warehouse_id,
        },
    )
    .await;

    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    assert_eq!(fx.repo.collection_count(), 0);
    assert_eq!(fx.repo.stock_weight(fx.warehouse_id, fx.category_id), 0.0);
}

#[tokio::test]
async fn test_collect_non_pending_listing_rejected() {
    let fx = fixture().await;
    let listing_id = pending_listing(&fx, 2.0).await;

    let request = CollectionRequest {
        operator_id: OPERATOR_CNIC.to_string(),
        listing_id,
        collected_weight: 2.0,
        warehouse_id: fx.warehouse_id,
    };
    services::collect_waste(&fx.repo, &request).await.unwrap();

    // A second collection of the same listing must fail cleanly.
    let result = services::collect_waste(&fx.repo, &request).await;
    assert!(matches!(
        result,
        Err(RepositoryError::ValidationError { .. })
    ));
    assert_eq!(fx.repo.collection_count(), 1);
    assert_eq!(fx.repo.stock_weight(fx.warehouse_id, fx.category_id), 2.0);
}

#[tokio::test]
async fn test_collect_on_unhealthy_backend_writes_nothing() {
    let fx = fixture().await;
    let listing_id = pending_listing(&fx, 2.0).await;
    fx.repo.set_healthy(false);

    let result = services::collect_waste(
        &fx.repo,
        &CollectionRequest {
            operator_id: OPERATOR_CNIC.to_string(),
            listing_id,
            collected_weight: 2.0,
            warehouse_id: fx.warehouse_id,
        },
    )
    .await;

    assert!(matches!(
        result,
        Err(RepositoryError::ConnectionError { .. })
    ));
    fx.repo.set_healthy(true);
    assert_eq!(fx.repo.collection_count(), 0);
    let listings = services::my_listings(&fx.repo, CITIZEN_CNIC).await.unwrap();
    assert_eq!(listings[0].status, ListingStatus::Pending);
}

#[tokio::test]
async fn test_collect_without_category_skips_payment() {
    let fx = fixture().await;
    let listing_id = pending_listing(&fx, 3.0).await;

    // Category removed between listing creation and collection.
    services::delete_category(&fx.repo, fx.category_id)
        .await
        .unwrap();

    let outcome = services::collect_waste(
        &fx.repo,
        &CollectionRequest {
            operator_id: OPERATOR_CNIC.to_string(),
            listing_id,
            collected_weight: 3.0,
            warehouse_id: fx.warehouse_id,
        },
    )
    .await
    .unwrap();

    assert!(outcome.transaction_id.is_none());
    assert!(outcome.payment_amount.is_none());
    assert_eq!(outcome.message, "Collection recorded successfully");
    assert_eq!(fx.repo.collection_count(), 1);
}

// ==================== Deposits and collection points ====================

#[tokio::test]
async fn test_deposit_accumulates_stock() {
    let fx = fixture().await;

    for quantity in [10.0, 2.5] {
        services::deposit_waste(
            &fx.repo,
            &WarehouseDeposit {
                warehouse_id: fx.warehouse_id,
                category_id: fx.category_id,
                quantity,
            },
        )
        .await
        .unwrap();
    }

    assert_eq!(fx.repo.stock_weight(fx.warehouse_id, fx.category_id), 12.5);
    let inventory = services::warehouse_inventory(&fx.repo, Some(fx.warehouse_id))
        .await
        .unwrap();
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory[0].current_inventory, 12.5);
    assert_eq!(inventory[0].category_count, 1);
}

#[tokio::test]
async fn test_collection_points_follow_route_area() {
    let fx = fixture().await;
    let listing_id = pending_listing(&fx, 1.5).await;

    let points = services::collection_points(&fx.repo, OPERATOR_CNIC)
        .await
        .unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].listing_id, listing_id);
    assert_eq!(points[0].citizen_id, CITIZEN_CNIC);
    assert_eq!(points[0].area_name, "Gulberg");

    // Collected listings drop off the route.
    services::collect_waste(
        &fx.repo,
        &CollectionRequest {
            operator_id: OPERATOR_CNIC.to_string(),
            listing_id,
            collected_weight: 1.5,
            warehouse_id: fx.warehouse_id,
        },
    )
    .await
    .unwrap();
    let points = services::collection_points(&fx.repo, OPERATOR_CNIC)
        .await
        .unwrap();
    assert!(points.is_empty());
}

// ==================== Category price cascade ====================

#[tokio::test]
async fn test_price_update_cascades_to_pending_listings_only() {
    let fx = fixture().await;
    let pending = pending_listing(&fx, 2.0).await;
    let collected = pending_listing(&fx, 3.0).await;
    let original_collected_price = round_money(3.0 * 40.0);

    services::collect_waste(
        &fx.repo,
        &CollectionRequest {
            operator_id: OPERATOR_CNIC.to_string(),
            listing_id: collected,
            collected_weight: 3.0,
            warehouse_id: fx.warehouse_id,
        },
    )
    .await
    .unwrap();

    assert!(services::update_category_price(&fx.repo, fx.category_id, 55.0)
        .await
        .unwrap());

    let listings = services::my_listings(&fx.repo, CITIZEN_CNIC).await.unwrap();
    let pending_row = listings
        .iter()
        .find(|l| l.listing_id == pending)
        .expect("pending listing");
    let collected_row = listings
        .iter()
        .find(|l| l.listing_id == collected)
        .expect("collected listing");

    assert_eq!(pending_row.estimated_price, Some(round_money(2.0 * 55.0)));
    assert_eq!(
        collected_row.estimated_price,
        Some(original_collected_price)
    );
}

#[tokio::test]
async fn test_price_update_unknown_category_returns_false() {
    let fx = fixture().await;
    assert!(!services::update_category_price(&fx.repo, 999, 10.0)
        .await
        .unwrap());
}

// ==================== Government operations ====================

#[tokio::test]
async fn test_operator_lifecycle() {
    let fx = fixture().await;

    let details = services::operator_details(&fx.repo, OPERATOR_CNIC)
        .await
        .unwrap()
        .expect("operator exists");
    assert_eq!(details.route_id, Some(fx.route_id));
    assert!(details.route.is_some());

    assert!(services::deactivate_operator(&fx.repo, OPERATOR_CNIC)
        .await
        .unwrap());
    let details = services::operator_details(&fx.repo, OPERATOR_CNIC)
        .await
        .unwrap()
        .expect("operator exists");
    assert_eq!(details.status, crate::api::OperatorStatus::Offline);
    assert_eq!(details.route_id, None);

    assert!(
        services::assign_operator(&fx.repo, OPERATOR_CNIC, fx.route_id, fx.warehouse_id)
            .await
            .unwrap()
    );
    let details = services::operator_details(&fx.repo, OPERATOR_CNIC)
        .await
        .unwrap()
        .expect("operator exists");
    assert_eq!(details.route_id, Some(fx.route_id));
}

#[tokio::test]
async fn test_create_operator_generates_temporary_password() {
    let fx = fixture().await;

    let created = services::create_operator(
        &fx.repo,
        &NewOperator {
            cnic: "35203-1111111-3".to_string(),
            full_name: "New Operator".to_string(),
            phone_number: None,
            route_id: None,
            warehouse_id: None,
            password: None,
        },
    )
    .await
    .unwrap();

    let password = created.temporary_password.expect("generated password");
    assert_eq!(password.len(), 12);
    let login = services::login(&fx.repo, "35203-1111111-3", &password)
        .await
        .unwrap();
    assert!(login.success);
}

#[tokio::test]
async fn test_high_yield_areas_ranked_by_revenue() {
    let fx = fixture().await;
    pending_listing(&fx, 2.0).await;

    // Second area with a richer listing.
    let other_area = fx.repo.seed_area("Clifton", "Karachi");
    services::register_citizen(
        &fx.repo,
        &CitizenRegistration {
            cnic: "42301-2222222-2".to_string(),
            full_name: "Sara Khan".to_string(),
            phone_number: None,
            area_id: other_area,
            address: None,
            password: "pw123456".to_string(),
        },
    )
    .await
    .unwrap();
    services::create_listing(
        &fx.repo,
        &NewListing {
            citizen_id: "42301-2222222-2".to_string(),
            category_id: fx.category_id,
            weight: 100.0,
        },
    )
    .await
    .unwrap();

    let reports = services::high_yield_areas(&fx.repo, None, None)
        .await
        .unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].area_name, "Clifton");
    assert_eq!(reports[0].revenue_rank, 1);
    assert_eq!(reports[1].area_name, "Gulberg");
    assert_eq!(reports[1].revenue_rank, 2);
    assert_eq!(reports[0].total_revenue, round_money(100.0 * 40.0));
}

#[tokio::test]
async fn test_complaint_workflow() {
    let fx = fixture().await;
    let complaint_id =
        fx.repo
            .seed_complaint(CITIZEN_CNIC, Some(OPERATOR_CNIC), "Missed pickup", "No show");

    let active = services::my_complaints(&fx.repo, OPERATOR_CNIC).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].complaint_id, complaint_id);
    assert_eq!(active[0].citizen_name, "Ali Raza");

    assert!(
        services::update_complaint_status(&fx.repo, complaint_id, ComplaintStatus::Resolved)
            .await
            .unwrap()
    );
    // Resolved complaints are no longer active for the operator.
    let active = services::my_complaints(&fx.repo, OPERATOR_CNIC).await.unwrap();
    assert!(active.is_empty());

    let resolved = services::complaints(&fx.repo, Some(ComplaintStatus::Resolved))
        .await
        .unwrap();
    assert_eq!(resolved.len(), 1);

    // Unknown complaint id.
    assert!(
        !services::update_complaint_status(&fx.repo, 9999, ComplaintStatus::Closed)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_performance_report_counts_collections_and_complaints() {
    let fx = fixture().await;
    for _ in 0..3 {
        let listing_id = pending_listing(&fx, 1.0).await;
        services::collect_waste(
            &fx.repo,
            &CollectionRequest {
                operator_id: OPERATOR_CNIC.to_string(),
                listing_id,
                collected_weight: 1.0,
                warehouse_id: fx.warehouse_id,
            },
        )
        .await
        .unwrap();
    }
    fx.repo
        .seed_complaint(CITIZEN_CNIC, Some(OPERATOR_CNIC), "Late", "Arrived late");

    let report = services::operator_performance_report(&fx.repo).await.unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].total_collections, 3);
    assert_eq!(report[0].total_weight_kg, 3.0);
    assert_eq!(report[0].complaints, 1);
    assert_eq!(report[0].rating, "New");

    let performance = services::my_performance(&fx.repo, OPERATOR_CNIC)
        .await
        .unwrap()
        .expect("performance row");
    assert_eq!(performance.total_pickups, 3);
    assert_eq!(
        performance.total_collected_amount,
        round_money(3.0 * 40.0)
    );
}
