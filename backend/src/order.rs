use axum::extract::{Path, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use serde::Serialize;

use crate::db;
use crate::error::ApiError;
use crate::pricing::OfferStatus;
use crate::schema::{customers, orders, products, shopkeepers};
use crate::store;
use crate::AppState;

/// Fixed reward credited to the customer for a successful bargain.
pub const REWARD_POINTS: i64 = 100;

#[derive(Debug, Clone, Copy)]
pub struct AcceptedOffer {
    pub order_id: i32,
    pub points_awarded: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptOfferResponse {
    pub success: bool,
    pub order_id: i32,
    pub points_awarded: i64,
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrderRow {
    pub order_id: i32,
    pub order_date: NaiveDate,
    pub final_price: i64,
    pub quantity: i32,
    pub product_name: String,
    pub standard_price: i64,
    pub shopkeeper_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerOrderRow {
    pub order_id: i32,
    pub order_date: NaiveDate,
    pub final_price: i64,
    pub quantity: i32,
    pub product_name: String,
    pub product_id: i32,
    pub customer_name: String,
}

/// Converts a Pending offer into an order plus a leaderboard credit.
///
/// All three effects run inside one database transaction: the offer is read
/// with a locking SELECT filtered to Pending, the order is inserted with the
/// offered price as its final price, the offer moves to its terminal
/// Accepted (Manual) status, and the customer's points are credited with an
/// atomic upsert. Any failure rolls the whole sequence back; a second
/// acceptance of the same offer fails the Pending filter and mutates
/// nothing. Auto-accepted offers never reach this path, so they never
/// produce orders.
pub fn accept_offer(conn: &mut PgConnection, offer_id: i32) -> Result<AcceptedOffer, ApiError> {
    conn.transaction::<_, ApiError, _>(|conn| {
        let pending = match store::find_pending_offer_for_update(conn, offer_id) {
            Ok(row) => row,
            Err(diesel::result::Error::NotFound) => {
                return Err(ApiError::PreconditionFailed(
                    "Offer not found or already processed.".to_string(),
                ))
            }
            Err(e) => return Err(ApiError::Transaction(e.to_string())),
        };

        let order_id = store::insert_order(
            conn,
            pending.customer_id,
            pending.product_id,
            1,
            Utc::now().date_naive(),
            pending.offered_price,
        )
        .map_err(|e| ApiError::Transaction(e.to_string()))?;

        store::update_offer_status(conn, offer_id, OfferStatus::AcceptedManual)
            .map_err(|e| ApiError::Transaction(e.to_string()))?;

        store::credit_leaderboard(conn, pending.customer_id, REWARD_POINTS)
            .map_err(|e| ApiError::Transaction(e.to_string()))?;

        log::info!(
            "Offer {} accepted: order {} created for customer {}",
            offer_id,
            order_id,
            pending.customer_id
        );
        Ok(AcceptedOffer {
            order_id,
            points_awarded: REWARD_POINTS,
        })
    })
}

pub async fn accept_offer_handler(
    State(state): State<AppState>,
    Path(offer_id): Path<i32>,
) -> Result<Json<AcceptOfferResponse>, ApiError> {
    let accepted = db::run_blocking(&state.pool, move |conn| accept_offer(conn, offer_id)).await?;

    Ok(Json(AcceptOfferResponse {
        success: true,
        order_id: accepted.order_id,
        points_awarded: accepted.points_awarded,
        message: format!(
            "Offer accepted. Order ID {} created, and {} points awarded.",
            accepted.order_id, accepted.points_awarded
        ),
    }))
}

pub async fn customer_orders(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
) -> Result<Json<Vec<CustomerOrderRow>>, ApiError> {
    let rows = db::run_blocking(&state.pool, move |conn| {
        let loaded = orders::table
            .inner_join(products::table.inner_join(shopkeepers::table))
            .filter(orders::customer_id.eq(customer_id))
            .order(orders::order_date.desc())
            .select((
                orders::id,
                orders::order_date,
                orders::final_price,
                orders::quantity,
                products::name,
                products::standard_price,
                shopkeepers::name,
            ))
            .load::<(i32, NaiveDate, i64, i32, String, i64, String)>(conn)?;
        Ok(loaded)
    })
    .await?;

    let rows = rows
        .into_iter()
        .map(
            |(order_id, order_date, final_price, quantity, product_name, standard_price, shopkeeper_name)| {
                CustomerOrderRow {
                    order_id,
                    order_date,
                    final_price,
                    quantity,
                    product_name,
                    standard_price,
                    shopkeeper_name,
                }
            },
        )
        .collect();
    Ok(Json(rows))
}

pub async fn seller_orders(
    State(state): State<AppState>,
    Path(seller_id): Path<i32>,
) -> Result<Json<Vec<SellerOrderRow>>, ApiError> {
    let rows = db::run_blocking(&state.pool, move |conn| {
        let loaded = orders::table
            .inner_join(products::table)
            .inner_join(customers::table)
            .filter(products::seller_id.eq(seller_id))
            .order(orders::order_date.desc())
            .select((
                orders::id,
                orders::order_date,
                orders::final_price,
                orders::quantity,
                products::name,
                products::id,
                customers::name,
            ))
            .load::<(i32, NaiveDate, i64, i32, String, i32, String)>(conn)?;
        Ok(loaded)
    })
    .await?;

    let rows = rows
        .into_iter()
        .map(
            |(order_id, order_date, final_price, quantity, product_name, product_id, customer_name)| {
                SellerOrderRow {
                    order_id,
                    order_date,
                    final_price,
                    quantity,
                    product_name,
                    product_id,
                    customer_name,
                }
            },
        )
        .collect();
    Ok(Json(rows))
}
