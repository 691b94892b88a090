use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Integer, Nullable, Text, Timestamptz};

use super::schema::{
    areas, categories, citizens, collections, complaints, operators, routes, transaction_records,
    users, warehouse_stock, warehouses, waste_listings,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub user_id: String,
    pub password_hash: String,
    pub role_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub user_id: String,
    pub password_hash: String,
    pub role_id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = citizens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CitizenRow {
    pub citizen_id: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub area_id: i32,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = operators)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OperatorRow {
    pub operator_id: String,
    pub full_name: String,
    pub phone_number: String,
    pub route_id: Option<i32>,
    pub warehouse_id: Option<i32>,
    pub status: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = operators)]
pub struct NewOperatorRow {
    pub operator_id: String,
    pub full_name: String,
    pub phone_number: String,
    pub route_id: Option<i32>,
    pub warehouse_id: Option<i32>,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = areas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AreaRow {
    pub area_id: i32,
    pub area_name: String,
    pub city: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub category_id: i32,
    pub category_name: String,
    pub base_price_per_kg: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
pub struct NewCategoryRow {
    pub category_name: String,
    pub base_price_per_kg: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = routes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RouteRow {
    pub route_id: i32,
    pub route_name: String,
    pub area_id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = warehouses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WarehouseRow {
    pub warehouse_id: i32,
    pub warehouse_name: String,
    pub area_id: i32,
    pub address: String,
    pub capacity: f64,
    pub current_inventory: f64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = warehouse_stock)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // Some fields used only for database operations
pub struct WarehouseStockRow {
    pub warehouse_id: i32,
    pub category_id: i32,
    pub current_weight: f64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = waste_listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WasteListingRow {
    pub listing_id: i64,
    pub created_at: DateTime<Utc>,
    pub citizen_id: String,
    pub category_id: i32,
    pub weight: f64,
    pub status: String,
    pub estimated_price: Option<f64>,
    pub transaction_id: Option<i64>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = waste_listings)]
pub struct NewWasteListingRow {
    pub created_at: DateTime<Utc>,
    pub citizen_id: String,
    pub category_id: i32,
    pub weight: f64,
    pub status: String,
    pub estimated_price: Option<f64>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = collections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CollectionRow {
    pub collection_id: i64,
    pub collected_date: DateTime<Utc>,
    pub operator_id: String,
    pub listing_id: i64,
    pub warehouse_id: i32,
    pub collected_weight: f64,
    pub photo_proof: Option<String>,
    pub is_verified: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = collections)]
pub struct NewCollectionRow {
    pub collected_date: DateTime<Utc>,
    pub operator_id: String,
    pub listing_id: i64,
    pub warehouse_id: i32,
    pub collected_weight: f64,
    pub is_verified: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = transaction_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TransactionRecordRow {
    pub transaction_id: i64,
    pub transaction_date: DateTime<Utc>,
    pub citizen_id: String,
    pub operator_id: Option<String>,
    pub total_amount: f64,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub verification_code: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transaction_records)]
pub struct NewTransactionRecordRow {
    pub transaction_date: DateTime<Utc>,
    pub citizen_id: String,
    pub operator_id: Option<String>,
    pub total_amount: f64,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub verification_code: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = complaints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ComplaintRow {
    pub complaint_id: i64,
    pub citizen_id: String,
    pub operator_id: Option<String>,
    pub complaint_type: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

// ==================== View/report rows (raw SQL reads) ====================

/// Row shape of the citizen profile view query.
#[derive(Debug, Clone, QueryableByName)]
pub struct CitizenProfileSqlRow {
    #[diesel(sql_type = Text)]
    pub citizen_id: String,
    #[diesel(sql_type = Text)]
    pub full_name: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub phone_number: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub address: Option<String>,
    #[diesel(sql_type = Integer)]
    pub area_id: i32,
    #[diesel(sql_type = Text)]
    pub area_name: String,
    #[diesel(sql_type = Text)]
    pub city: String,
    #[diesel(sql_type = Timestamptz)]
    pub member_since: DateTime<Utc>,
}

/// Row shape of the operator collection points view query.
#[derive(Debug, Clone, QueryableByName)]
pub struct CollectionPointSqlRow {
    #[diesel(sql_type = Text)]
    pub operator_id: String,
    #[diesel(sql_type = Text)]
    pub operator_name: String,
    #[diesel(sql_type = Nullable<Integer>)]
    pub route_id: Option<i32>,
    #[diesel(sql_type = Nullable<Text>)]
    pub route_name: Option<String>,
    #[diesel(sql_type = BigInt)]
    pub listing_id: i64,
    #[diesel(sql_type = Text)]
    pub citizen_id: String,
    #[diesel(sql_type = Text)]
    pub citizen_name: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub phone_number: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub address: Option<String>,
    #[diesel(sql_type = Text)]
    pub area_name: String,
    #[diesel(sql_type = Text)]
    pub category_name: String,
    #[diesel(sql_type = Double)]
    pub weight: f64,
    #[diesel(sql_type = Nullable<Double>)]
    pub estimated_price: Option<f64>,
    #[diesel(sql_type = Text)]
    pub status: String,
}

/// Row shape of the warehouse inventory view query.
#[derive(Debug, Clone, QueryableByName)]
pub struct WarehouseInventorySqlRow {
    #[diesel(sql_type = Integer)]
    pub warehouse_id: i32,
    #[diesel(sql_type = Text)]
    pub warehouse_name: String,
    #[diesel(sql_type = Text)]
    pub area_name: String,
    #[diesel(sql_type = Text)]
    pub city: String,
    #[diesel(sql_type = Double)]
    pub capacity: f64,
    #[diesel(sql_type = Double)]
    pub current_inventory: f64,
    #[diesel(sql_type = BigInt)]
    pub category_count: i64,
}

/// Row shape of the operator performance view query.
#[derive(Debug, Clone, QueryableByName)]
pub struct OperatorPerformanceSqlRow {
    #[diesel(sql_type = Text)]
    pub operator_id: String,
    #[diesel(sql_type = Text)]
    pub full_name: String,
    #[diesel(sql_type = Text)]
    pub phone_number: String,
    #[diesel(sql_type = Nullable<Integer>)]
    pub route_id: Option<i32>,
    #[diesel(sql_type = Nullable<Integer>)]
    pub warehouse_id: Option<i32>,
    #[diesel(sql_type = BigInt)]
    pub total_pickups: i64,
    #[diesel(sql_type = Double)]
    pub total_collected_weight: f64,
    #[diesel(sql_type = Double)]
    pub total_collected_amount: f64,
}

/// Row shape of the active complaints view query.
#[derive(Debug, Clone, QueryableByName)]
pub struct ComplaintDetailSqlRow {
    #[diesel(sql_type = BigInt)]
    pub complaint_id: i64,
    #[diesel(sql_type = Text)]
    pub complaint_type: String,
    #[diesel(sql_type = Text)]
    pub description: String,
    #[diesel(sql_type = Text)]
    pub status: String,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
    #[diesel(sql_type = Text)]
    pub citizen_id: String,
    #[diesel(sql_type = Text)]
    pub citizen_name: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub phone_number: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub operator_id: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub operator_name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub route_name: Option<String>,
    #[diesel(sql_type = Text)]
    pub area_name: String,
    #[diesel(sql_type = BigInt)]
    pub days_open: i64,
}

/// Row shape of the high-yield area report query.
#[derive(Debug, Clone, QueryableByName)]
pub struct HighYieldAreaSqlRow {
    #[diesel(sql_type = Integer)]
    pub area_id: i32,
    #[diesel(sql_type = Text)]
    pub area_name: String,
    #[diesel(sql_type = Text)]
    pub city: String,
    #[diesel(sql_type = BigInt)]
    pub total_listings: i64,
    #[diesel(sql_type = Double)]
    pub total_weight: f64,
    #[diesel(sql_type = Double)]
    pub total_revenue: f64,
    #[diesel(sql_type = BigInt)]
    pub revenue_rank: i64,
}

/// Row shape of the operator performance report query.
#[derive(Debug, Clone, QueryableByName)]
pub struct OperatorReportSqlRow {
    #[diesel(sql_type = Text)]
    pub operator_id: String,
    #[diesel(sql_type = Text)]
    pub full_name: String,
    #[diesel(sql_type = BigInt)]
    pub total_collections: i64,
    #[diesel(sql_type = Double)]
    pub total_weight_kg: f64,
    #[diesel(sql_type = BigInt)]
    pub complaints: i64,
}
