//! Trait-level tests for the in-memory repository backend.

use smartwaste::api::{
    CitizenRegistration, ComplaintStatus, ListingId, NewCategory, NewListing, NewOperator,
};
use smartwaste::auth::hash_password;
use smartwaste::db::repositories::LocalRepository;
use smartwaste::db::repository::{
    AuthRepository, CitizenRepository, GovernmentRepository, OperatorRepository, RepositoryError,
};

fn registration(cnic: &str, area_id: i32) -> CitizenRegistration {
    CitizenRegistration {
        cnic: cnic.to_string(),
        full_name: "Test Citizen".to_string(),
        phone_number: Some("03001112223".to_string()),
        area_id,
        address: None,
        password: "unused-here".to_string(),
    }
}

#[tokio::test]
async fn test_health_toggle() {
    let repo = LocalRepository::new();
    assert!(repo.health_check().await.unwrap());

    repo.set_healthy(false);
    assert!(!repo.health_check().await.unwrap());

    // Mutations are refused while unhealthy.
    let result = repo
        .create_category(&NewCategory {
            category_name: "Glass".to_string(),
            base_price_per_kg: 10.0,
            description: None,
        })
        .await;
    assert!(matches!(
        result,
        Err(RepositoryError::ConnectionError { .. })
    ));
}

#[tokio::test]
async fn test_authenticate_checks_hash_and_role() {
    let repo = LocalRepository::new();
    let area_id = repo.seed_area("Saddar", "Karachi");
    let hash = hash_password("pw");
    repo.register_citizen(&registration("11111-1111111-1", area_id), &hash)
        .await
        .unwrap();

    let found = repo
        .authenticate("11111-1111111-1", &hash)
        .await
        .unwrap()
        .expect("credentials match");
    assert_eq!(found.role, smartwaste::api::Role::Citizen);
    assert_eq!(found.citizen_id.as_deref(), Some("11111-1111111-1"));

    assert!(repo
        .authenticate("11111-1111111-1", &hash_password("wrong"))
        .await
        .unwrap()
        .is_none());
    assert!(repo
        .authenticate("22222-2222222-2", &hash)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_register_rejects_unknown_area() {
    let repo = LocalRepository::new();

    let result = repo
        .register_citizen(&registration("11111-1111111-1", 42), "hash")
        .await;

    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    assert!(!repo.has_user("11111-1111111-1"));
}

#[tokio::test]
async fn test_clear_resets_counters() {
    let repo = LocalRepository::new();
    let area_id = repo.seed_area("Saddar", "Karachi");
    assert_eq!(area_id, 1);

    repo.clear();
    // Counters restart after clear.
    assert_eq!(repo.seed_area("Saddar", "Karachi"), 1);
}

#[tokio::test]
async fn test_area_ordering_by_city_then_name() {
    let repo = LocalRepository::new();
    repo.seed_area("Gulberg", "Lahore");
    repo.seed_area("Clifton", "Karachi");
    repo.seed_area("Saddar", "Karachi");

    let areas = repo.list_areas().await.unwrap();
    let names: Vec<&str> = areas.iter().map(|a| a.area_name.as_str()).collect();
    assert_eq!(names, vec!["Clifton", "Saddar", "Gulberg"]);
}

#[tokio::test]
async fn test_category_ordering_and_lookup() {
    let repo = LocalRepository::new();
    for (name, price) in [("Plastic", 40.0), ("Glass", 15.0), ("Metal", 120.0)] {
        repo.create_category(&NewCategory {
            category_name: name.to_string(),
            base_price_per_kg: price,
            description: None,
        })
        .await
        .unwrap();
    }

    let categories = repo.list_categories().await.unwrap();
    let names: Vec<&str> = categories.iter().map(|c| c.category_name.as_str()).collect();
    assert_eq!(names, vec!["Glass", "Metal", "Plastic"]);

    assert!(repo.get_category(1).await.unwrap().is_some());
    assert!(repo.get_category(99).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_category_name_rejected() {
    let repo = LocalRepository::new();
    let category = NewCategory {
        category_name: "Plastic".to_string(),
        base_price_per_kg: 40.0,
        description: None,
    };
    repo.create_category(&category).await.unwrap();

    let result = repo.create_category(&category).await;
    assert!(matches!(
        result,
        Err(RepositoryError::ValidationError { .. })
    ));
}

#[tokio::test]
async fn test_deposit_to_unknown_warehouse_rejected() {
    let repo = LocalRepository::new();

    let result = repo.deposit_waste(7, 1, 5.0).await;
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    assert_eq!(repo.stock_weight(7, 1), 0.0);
}

#[tokio::test]
async fn test_stock_accumulates_across_deposits() {
    let repo = LocalRepository::new();
    let area_id = repo.seed_area("Gulberg", "Lahore");
    let warehouse_id = repo.seed_warehouse("Depot", area_id, 100.0);

    repo.deposit_waste(warehouse_id, 1, 5.0).await.unwrap();
    repo.deposit_waste(warehouse_id, 1, 2.5).await.unwrap();
    repo.deposit_waste(warehouse_id, 2, 1.0).await.unwrap();

    assert_eq!(repo.stock_weight(warehouse_id, 1), 7.5);
    assert_eq!(repo.stock_weight(warehouse_id, 2), 1.0);

    let inventory = repo.warehouse_inventory(None).await.unwrap();
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory[0].current_inventory, 8.5);
    assert_eq!(inventory[0].category_count, 2);
    assert_eq!(inventory[0].available_capacity, 91.5);
}

#[tokio::test]
async fn test_cancel_requires_matching_owner_and_status() {
    let repo = LocalRepository::new();
    let area_id = repo.seed_area("Gulberg", "Lahore");
    let hash = hash_password("pw");
    repo.register_citizen(&registration("11111-1111111-1", area_id), &hash)
        .await
        .unwrap();
    repo.create_category(&NewCategory {
        category_name: "Plastic".to_string(),
        base_price_per_kg: 40.0,
        description: None,
    })
    .await
    .unwrap();

    let created = repo
        .create_listing(&NewListing {
            citizen_id: "11111-1111111-1".to_string(),
            category_id: 1,
            weight: 3.0,
        })
        .await
        .unwrap();

    assert!(!repo
        .cancel_listing(ListingId(999), "11111-1111111-1")
        .await
        .unwrap());
    assert!(!repo
        .cancel_listing(created.listing_id, "99999-9999999-9")
        .await
        .unwrap());
    assert!(repo
        .cancel_listing(created.listing_id, "11111-1111111-1")
        .await
        .unwrap());
    assert!(!repo
        .cancel_listing(created.listing_id, "11111-1111111-1")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_operator_complaint_status_flow() {
    let repo = LocalRepository::new();
    let area_id = repo.seed_area("Gulberg", "Lahore");
    let hash = hash_password("pw");
    repo.register_citizen(&registration("11111-1111111-1", area_id), &hash)
        .await
        .unwrap();
    repo.create_operator(
        &NewOperator {
            cnic: "22222-2222222-2".to_string(),
            full_name: "Op".to_string(),
            phone_number: None,
            route_id: None,
            warehouse_id: None,
            password: None,
        },
        &hash,
    )
    .await
    .unwrap();
    let complaint_id =
        repo.seed_complaint("11111-1111111-1", Some("22222-2222222-2"), "Late", "Late again");

    assert!(repo
        .update_complaint_status(complaint_id, ComplaintStatus::InProgress)
        .await
        .unwrap());
    let active = repo.complaints_for_operator("22222-2222222-2").await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].status, ComplaintStatus::InProgress);

    assert!(repo
        .update_complaint_status(complaint_id, ComplaintStatus::Closed)
        .await
        .unwrap());
    assert!(repo
        .complaints_for_operator("22222-2222222-2")
        .await
        .unwrap()
        .is_empty());

    let closed = repo
        .list_complaints(Some(ComplaintStatus::Closed))
        .await
        .unwrap();
    assert_eq!(closed.len(), 1);
    assert!(repo
        .list_complaints(Some(ComplaintStatus::Open))
        .await
        .unwrap()
        .is_empty());
}
