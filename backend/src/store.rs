//! Minimal repository contracts consumed by the bargain and acceptance
//! workflows. Free functions over a live connection so they compose inside
//! a `Connection::transaction` closure.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::models::{NewOffer, NewOrder, Offer};
use crate::pricing::OfferStatus;
use crate::schema::{leaderboard, offers, orders, products};

#[derive(Debug, Clone, Copy)]
pub struct PriceBounds {
    pub min_price: i64,
    pub standard_price: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct PendingOffer {
    pub customer_id: i32,
    pub product_id: i32,
    pub offered_price: i64,
}

pub fn find_product_price_bounds(
    conn: &mut PgConnection,
    product_id: i32,
) -> QueryResult<PriceBounds> {
    let (min_price, standard_price) = products::table
        .find(product_id)
        .select((products::min_price, products::standard_price))
        .first::<(i64, i64)>(conn)?;
    Ok(PriceBounds {
        min_price,
        standard_price,
    })
}

pub fn insert_offer(
    conn: &mut PgConnection,
    customer_id: i32,
    product_id: i32,
    offered_price: i64,
    status: OfferStatus,
    offered_at: NaiveDateTime,
) -> QueryResult<i32> {
    let new_offer = NewOffer {
        customer_id,
        product_id,
        offered_price,
        status: status.as_db_str().to_string(),
        offered_at,
    };
    diesel::insert_into(offers::table)
        .values(&new_offer)
        .returning(offers::id)
        .get_result(conn)
}

/// Locking read of a Pending offer.
///
/// Issues `SELECT ... FOR UPDATE` filtered to `status = 'Pending'`, so the
/// caller MUST already hold an open transaction: the row lock is what
/// serializes concurrent acceptances of the same offer, and exactly one of
/// them observes the Pending row. Returns `Error::NotFound` both when the
/// offer does not exist and when it is no longer Pending.
pub fn find_pending_offer_for_update(
    conn: &mut PgConnection,
    offer_id: i32,
) -> QueryResult<PendingOffer> {
    let row = offers::table
        .filter(offers::id.eq(offer_id))
        .filter(offers::status.eq(OfferStatus::Pending.as_db_str()))
        .for_update()
        .first::<Offer>(conn)?;
    Ok(PendingOffer {
        customer_id: row.customer_id,
        product_id: row.product_id,
        offered_price: row.offered_price,
    })
}

pub fn update_offer_status(
    conn: &mut PgConnection,
    offer_id: i32,
    status: OfferStatus,
) -> QueryResult<usize> {
    diesel::update(offers::table.find(offer_id))
        .set(offers::status.eq(status.as_db_str()))
        .execute(conn)
}

pub fn insert_order(
    conn: &mut PgConnection,
    customer_id: i32,
    product_id: i32,
    quantity: i32,
    order_date: NaiveDate,
    final_price: i64,
) -> QueryResult<i32> {
    let new_order = NewOrder {
        customer_id,
        product_id,
        quantity,
        order_date,
        final_price,
    };
    diesel::insert_into(orders::table)
        .values(&new_order)
        .returning(orders::id)
        .get_result(conn)
}

/// Credits `points` to the customer's leaderboard entry as one atomic
/// insert-or-add, so concurrent acceptances for the same customer never
/// race a read against a write.
pub fn credit_leaderboard(
    conn: &mut PgConnection,
    customer_id: i32,
    points: i64,
) -> QueryResult<()> {
    let now = Utc::now().naive_utc();
    diesel::insert_into(leaderboard::table)
        .values((
            leaderboard::customer_id.eq(customer_id),
            leaderboard::points.eq(points),
            leaderboard::last_updated.eq(now),
        ))
        .on_conflict(leaderboard::customer_id)
        .do_update()
        .set((
            leaderboard::points.eq(leaderboard::points + points),
            leaderboard::last_updated.eq(now),
        ))
        .execute(conn)?;
    Ok(())
}
