use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::Serialize;

use crate::db;
use crate::error::ApiError;
use crate::models::{Customer, LeaderboardEntry};
use crate::schema::{customers, leaderboard};
use crate::AppState;

#[derive(Serialize)]
pub struct LeaderboardRow {
    pub name: String,
    pub points: i64,
}

/// Top ten customers by accumulated bargain points.
pub async fn top_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaderboardRow>>, ApiError> {
    let rows = db::run_blocking(&state.pool, |conn| {
        let loaded = leaderboard::table
            .inner_join(customers::table)
            .order(leaderboard::points.desc())
            .limit(10)
            .load::<(LeaderboardEntry, Customer)>(conn)?;
        Ok(loaded)
    })
    .await?;

    let rows = rows
        .into_iter()
        .map(|(entry, customer)| LeaderboardRow {
            name: customer.name,
            points: entry.points,
        })
        .collect();
    Ok(Json(rows))
}
