use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db;
use crate::error::ApiError;
use crate::pricing::{self, OfferStatus};
use crate::product::MutationResponse;
use crate::schema::{customers, offers, products};
use crate::store;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOfferRequest {
    pub customer_id: i32,
    pub product_id: i32,
    pub offered_price: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOfferResponse {
    pub success: bool,
    pub offer_id: i32,
    pub status: OfferStatus,
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerOfferRow {
    pub offer_id: i32,
    pub offered_price: i64,
    pub offer_status: String,
    pub product_name: String,
    pub product_id: i32,
    pub standard_price: i64,
    pub min_price: i64,
    pub max_price: i64,
    pub customer_name: String,
}

#[derive(Debug)]
pub struct BargainOutcome {
    pub offer_id: i32,
    pub status: OfferStatus,
    pub message: String,
}

/// Bargain submission: classify the offered price against the product's
/// bounds and persist the offer with the resulting status. A single insert,
/// no transaction.
pub fn submit_bargain(
    conn: &mut PgConnection,
    customer_id: i32,
    product_id: i32,
    offered_price: i64,
) -> Result<BargainOutcome, ApiError> {
    if offered_price < 0 {
        return Err(ApiError::Validation(
            "Offered price must be non-negative.".to_string(),
        ));
    }

    let bounds = match store::find_product_price_bounds(conn, product_id) {
        Ok(bounds) => bounds,
        Err(diesel::result::Error::NotFound) => {
            return Err(ApiError::NotFound("Product not found.".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let decision = pricing::evaluate(offered_price, bounds.min_price, bounds.standard_price);
    let offer_id = store::insert_offer(
        conn,
        customer_id,
        product_id,
        offered_price,
        decision.status,
        Utc::now().naive_utc(),
    )?;

    log::info!(
        "Offer {} on product {} classified as {}",
        offer_id,
        product_id,
        decision.status.as_db_str()
    );
    Ok(BargainOutcome {
        offer_id,
        status: decision.status,
        message: decision.message,
    })
}

pub async fn submit_offer(
    State(state): State<AppState>,
    Json(req): Json<SubmitOfferRequest>,
) -> Result<Json<SubmitOfferResponse>, ApiError> {
    let outcome = db::run_blocking(&state.pool, move |conn| {
        submit_bargain(conn, req.customer_id, req.product_id, req.offered_price)
    })
    .await?;

    Ok(Json(SubmitOfferResponse {
        success: true,
        offer_id: outcome.offer_id,
        status: outcome.status,
        message: outcome.message,
    }))
}

/// Offers awaiting a decision on the seller's products, highest first.
/// Auto-accepted offers are included so the shopkeeper sees what sold at
/// the standard price.
pub async fn seller_offers(
    State(state): State<AppState>,
    Path(seller_id): Path<i32>,
) -> Result<Json<Vec<SellerOfferRow>>, ApiError> {
    let rows = db::run_blocking(&state.pool, move |conn| {
        let loaded = offers::table
            .inner_join(products::table)
            .inner_join(customers::table)
            .filter(products::seller_id.eq(seller_id))
            .filter(offers::status.eq_any([
                OfferStatus::Pending.as_db_str(),
                OfferStatus::AcceptedAuto.as_db_str(),
            ]))
            .order(offers::offered_price.desc())
            .select((
                offers::id,
                offers::offered_price,
                offers::status,
                products::name,
                products::id,
                products::standard_price,
                products::min_price,
                products::max_price,
                customers::name,
            ))
            .load::<(i32, i64, String, String, i32, i64, i64, i64, String)>(conn)?;
        Ok(loaded)
    })
    .await?;

    let rows = rows
        .into_iter()
        .map(
            |(
                offer_id,
                offered_price,
                offer_status,
                product_name,
                product_id,
                standard_price,
                min_price,
                max_price,
                customer_name,
            )| SellerOfferRow {
                offer_id,
                offered_price,
                offer_status,
                product_name,
                product_id,
                standard_price,
                min_price,
                max_price,
                customer_name,
            },
        )
        .collect();
    Ok(Json(rows))
}

pub async fn delete_offer(
    State(state): State<AppState>,
    Path(offer_id): Path<i32>,
) -> Result<Json<MutationResponse>, ApiError> {
    db::run_blocking(&state.pool, move |conn| {
        let affected = diesel::delete(offers::table.find(offer_id)).execute(conn)?;
        if affected == 0 {
            return Err(ApiError::NotFound(format!(
                "Offer ID {} not found.",
                offer_id
            )));
        }
        Ok(())
    })
    .await?;

    Ok(Json(MutationResponse {
        success: true,
        message: format!("Offer {} successfully deleted.", offer_id),
    }))
}
