//! Reporting queries for shopkeepers and admins. These are read-only
//! aggregates, written as raw SQL with explicit float casts so the
//! averages come back as plain doubles.

use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Integer, Nullable, Text};
use serde::Serialize;

use crate::db;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize, QueryableByName)]
#[serde(rename_all = "camelCase")]
pub struct SellerProductStats {
    #[diesel(sql_type = Text)]
    pub product_name: String,
    #[diesel(sql_type = BigInt)]
    pub total_offers: i64,
    #[diesel(sql_type = Nullable<Double>)]
    pub avg_offer_price: Option<f64>,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub max_offer: Option<i64>,
}

#[derive(Debug, Serialize, QueryableByName)]
#[serde(rename_all = "camelCase")]
pub struct HighValueCustomer {
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Integer)]
    pub customer_id: i32,
}

#[derive(Serialize)]
pub struct ReportResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Vec<T>,
}

/// Per-product offer statistics for one shopkeeper. Products whose average
/// offer is under 1000 are filtered out by the HAVING clause, which also
/// drops products with no offers at all.
pub async fn seller_stats(
    State(state): State<AppState>,
    Path(seller_id): Path<i32>,
) -> Result<Json<ReportResponse<SellerProductStats>>, ApiError> {
    let data = db::run_blocking(&state.pool, move |conn| {
        let stats = diesel::sql_query(
            "SELECT p.name AS product_name, \
                    COUNT(o.id) AS total_offers, \
                    AVG(o.offered_price)::float8 AS avg_offer_price, \
                    MAX(o.offered_price) AS max_offer \
             FROM products p \
             LEFT JOIN offers o ON o.product_id = p.id \
             WHERE p.seller_id = $1 \
             GROUP BY p.name \
             HAVING AVG(o.offered_price) >= 1000 \
             ORDER BY COUNT(o.id) DESC",
        )
        .bind::<Integer, _>(seller_id)
        .load::<SellerProductStats>(conn)?;
        Ok(stats)
    })
    .await?;

    Ok(Json(ReportResponse {
        success: true,
        message: "Shopkeeper sales statistics (only shows products with avg offer >= 1000)."
            .to_string(),
        data,
    }))
}

/// Customers who have made at least one offer above the global average
/// offered price.
pub async fn high_value_customers(
    State(state): State<AppState>,
) -> Result<Json<ReportResponse<HighValueCustomer>>, ApiError> {
    let data = db::run_blocking(&state.pool, |conn| {
        let rows = diesel::sql_query(
            "SELECT DISTINCT c.name AS name, c.id AS customer_id \
             FROM customers c \
             JOIN offers o ON o.customer_id = c.id \
             WHERE o.offered_price > (SELECT AVG(offered_price) FROM offers)",
        )
        .load::<HighValueCustomer>(conn)?;
        Ok(rows)
    })
    .await?;

    Ok(Json(ReportResponse {
        success: true,
        message: "Customers who offered more than the global average offer price.".to_string(),
        data,
    }))
}
