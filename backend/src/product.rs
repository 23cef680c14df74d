use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db;
use crate::error::ApiError;
use crate::models::Product;
use crate::schema::products;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub product_id: i32,
    pub product_name: String,
    pub standard_price: i64,
    pub min_price: i64,
    pub max_price: i64,
    pub seller_id: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaxPriceRequest {
    pub new_max_price: i64,
}

#[derive(Serialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
}

/// Fetches the whole catalog.
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let all = db::run_blocking(&state.pool, |conn| {
        Ok(products::table
            .order(products::id.desc())
            .load::<Product>(conn)?)
    })
    .await?;
    Ok(Json(all))
}

/// Fetches a single product, price bounds included.
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<Json<Product>, ApiError> {
    let product = db::run_blocking(&state.pool, move |conn| {
        products::table
            .find(product_id)
            .first::<Product>(conn)
            .optional()?
            .ok_or_else(|| ApiError::NotFound("Product not found.".to_string()))
    })
    .await?;
    Ok(Json(product))
}

pub async fn seller_products(
    State(state): State<AppState>,
    Path(seller_id): Path<i32>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let listed = db::run_blocking(&state.pool, move |conn| {
        Ok(products::table
            .filter(products::seller_id.eq(seller_id))
            .order(products::id.desc())
            .load::<Product>(conn)?)
    })
    .await?;
    Ok(Json(listed))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<MutationResponse>), ApiError> {
    db::run_blocking(&state.pool, move |conn| {
        let new_product = Product {
            id: req.product_id,
            seller_id: req.seller_id,
            name: req.product_name.clone(),
            standard_price: req.standard_price,
            min_price: req.min_price,
            max_price: req.max_price,
        };
        diesel::insert_into(products::table)
            .values(&new_product)
            .execute(conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => ApiError::Conflict("Product ID already exists.".to_string()),
                other => other.into(),
            })?;
        Ok(())
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            success: true,
            message: "Product uploaded successfully!".to_string(),
        }),
    ))
}

pub async fn update_max_price(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Json(req): Json<UpdateMaxPriceRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let new_max_price = req.new_max_price;
    db::run_blocking(&state.pool, move |conn| {
        let affected = diesel::update(products::table.find(product_id))
            .set(products::max_price.eq(new_max_price))
            .execute(conn)?;
        if affected == 0 {
            return Err(ApiError::NotFound(format!(
                "Product ID {} not found.",
                product_id
            )));
        }
        Ok(())
    })
    .await?;

    Ok(Json(MutationResponse {
        success: true,
        message: format!(
            "Product {} max price updated to {}.",
            product_id, new_max_price
        ),
    }))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<Json<MutationResponse>, ApiError> {
    db::run_blocking(&state.pool, move |conn| {
        let affected = diesel::delete(products::table.find(product_id)).execute(conn)?;
        if affected == 0 {
            return Err(ApiError::NotFound(format!(
                "Product ID {} not found.",
                product_id
            )));
        }
        Ok(())
    })
    .await?;

    Ok(Json(MutationResponse {
        success: true,
        message: format!("Product {} successfully deleted.", product_id),
    }))
}
