use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Queryable)]
#[diesel(table_name = crate::schema::customers)]
pub struct Customer {
    pub id: i32,      // Int4
    pub name: String, // Text
}

#[derive(Debug, Serialize, Deserialize, Queryable)]
#[diesel(table_name = crate::schema::shopkeepers)]
pub struct Shopkeeper {
    pub id: i32,      // Int4
    pub name: String, // Text
}

#[derive(Debug, Queryable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub stakeholder_id: i32,
}

/// Product identity is supplied by the shopkeeper at upload time, so the
/// same struct inserts and loads.
#[derive(Debug, Serialize, Deserialize, Queryable, Insertable, Clone)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,             // Int4
    pub seller_id: i32,      // Int4
    pub name: String,        // Text
    pub standard_price: i64, // Int8
    pub min_price: i64,      // Int8
    pub max_price: i64,      // Int8
}

#[derive(Debug, Serialize, Queryable)]
#[diesel(table_name = crate::schema::offers)]
pub struct Offer {
    pub id: i32,
    pub customer_id: i32,
    pub product_id: i32,
    pub offered_price: i64,
    pub status: String,
    pub offered_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::offers)]
pub struct NewOffer {
    pub customer_id: i32,
    pub product_id: i32,
    pub offered_price: i64,
    pub status: String,
    pub offered_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Queryable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub customer_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub order_date: NaiveDate,
    pub final_price: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder {
    pub customer_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub order_date: NaiveDate,
    pub final_price: i64,
}

#[derive(Debug, Serialize, Queryable, Insertable)]
#[diesel(table_name = crate::schema::leaderboard)]
pub struct LeaderboardEntry {
    pub customer_id: i32,
    pub points: i64,
    pub last_updated: NaiveDateTime,
}
