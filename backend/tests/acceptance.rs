//! Database-backed scenario tests for the bargain and acceptance
//! workflows. They run against the database named by `TEST_DATABASE_URL`
//! and are skipped when that variable is unset. Each test opens its own
//! connection, never commits (test transaction), and works on temporary
//! tables, so no fixtures or migrations are required in the target
//! database.

use bargain_bazaar_backend::error::ApiError;
use bargain_bazaar_backend::models::Order;
use bargain_bazaar_backend::offer::submit_bargain;
use bargain_bazaar_backend::order::{accept_offer, REWARD_POINTS};
use bargain_bazaar_backend::pricing::OfferStatus;
use bargain_bazaar_backend::schema::{customers, leaderboard, offers, orders, products, shopkeepers};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;

fn test_conn() -> Option<PgConnection> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let mut conn = PgConnection::establish(&url).expect("TEST_DATABASE_URL must be reachable");
    conn.begin_test_transaction()
        .expect("failed to begin test transaction");
    // Temporary tables shadow any real ones for the lifetime of this
    // connection, keeping tests self-contained.
    conn.batch_execute(
        "CREATE TEMPORARY TABLE customers (
             id SERIAL PRIMARY KEY,
             name TEXT NOT NULL
         );
         CREATE TEMPORARY TABLE shopkeepers (
             id SERIAL PRIMARY KEY,
             name TEXT NOT NULL
         );
         CREATE TEMPORARY TABLE products (
             id INT4 PRIMARY KEY,
             seller_id INT4 NOT NULL,
             name TEXT NOT NULL,
             standard_price INT8 NOT NULL,
             min_price INT8 NOT NULL,
             max_price INT8 NOT NULL
         );
         CREATE TEMPORARY TABLE offers (
             id SERIAL PRIMARY KEY,
             customer_id INT4 NOT NULL,
             product_id INT4 NOT NULL,
             offered_price INT8 NOT NULL,
             status VARCHAR(20) NOT NULL,
             offered_at TIMESTAMP NOT NULL
         );
         CREATE TEMPORARY TABLE orders (
             id SERIAL PRIMARY KEY,
             customer_id INT4 NOT NULL,
             product_id INT4 NOT NULL,
             quantity INT4 NOT NULL,
             order_date DATE NOT NULL,
             final_price INT8 NOT NULL
         );
         CREATE TEMPORARY TABLE leaderboard (
             customer_id INT4 PRIMARY KEY,
             points INT8 NOT NULL,
             last_updated TIMESTAMP NOT NULL
         );",
    )
    .expect("failed to create temporary tables");
    Some(conn)
}

fn seed_customer(conn: &mut PgConnection, id: i32, name: &str) {
    diesel::insert_into(customers::table)
        .values((customers::id.eq(id), customers::name.eq(name)))
        .execute(conn)
        .expect("seed customer");
}

fn seed_shopkeeper(conn: &mut PgConnection, id: i32, name: &str) {
    diesel::insert_into(shopkeepers::table)
        .values((shopkeepers::id.eq(id), shopkeepers::name.eq(name)))
        .execute(conn)
        .expect("seed shopkeeper");
}

fn seed_product(conn: &mut PgConnection, id: i32, seller_id: i32, min: i64, standard: i64) {
    diesel::insert_into(products::table)
        .values((
            products::id.eq(id),
            products::seller_id.eq(seller_id),
            products::name.eq(format!("product-{}", id)),
            products::standard_price.eq(standard),
            products::min_price.eq(min),
            products::max_price.eq(standard * 2),
        ))
        .execute(conn)
        .expect("seed product");
}

fn offer_status(conn: &mut PgConnection, offer_id: i32) -> String {
    offers::table
        .find(offer_id)
        .select(offers::status)
        .first(conn)
        .expect("offer row")
}

fn order_count(conn: &mut PgConnection) -> i64 {
    orders::table.count().get_result(conn).expect("order count")
}

fn customer_points(conn: &mut PgConnection, customer_id: i32) -> Option<i64> {
    leaderboard::table
        .find(customer_id)
        .select(leaderboard::points)
        .first(conn)
        .optional()
        .expect("leaderboard read")
}

#[test]
fn rejected_offer_is_still_recorded() {
    let Some(mut conn) = test_conn() else { return };
    seed_shopkeeper(&mut conn, 1, "Meena");
    seed_customer(&mut conn, 7, "Asha");
    seed_product(&mut conn, 3, 1, 100, 500);

    let outcome = submit_bargain(&mut conn, 7, 3, 50).expect("bargain");
    assert_eq!(outcome.status, OfferStatus::RejectedAi);
    assert_eq!(offer_status(&mut conn, outcome.offer_id), "Rejected (AI)");
}

#[test]
fn mid_range_offer_is_pending() {
    let Some(mut conn) = test_conn() else { return };
    seed_shopkeeper(&mut conn, 1, "Meena");
    seed_customer(&mut conn, 7, "Asha");
    seed_product(&mut conn, 3, 1, 100, 500);

    let outcome = submit_bargain(&mut conn, 7, 3, 300).expect("bargain");
    assert_eq!(outcome.status, OfferStatus::Pending);
    assert_eq!(offer_status(&mut conn, outcome.offer_id), "Pending");
}

#[test]
fn bargain_against_unknown_product_is_not_found() {
    let Some(mut conn) = test_conn() else { return };
    seed_customer(&mut conn, 7, "Asha");

    let err = submit_bargain(&mut conn, 7, 999, 300).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    let offers_recorded: i64 = offers::table.count().get_result(&mut conn).unwrap();
    assert_eq!(offers_recorded, 0);
}

#[test]
fn accepting_pending_offer_creates_order_and_credits_points() {
    let Some(mut conn) = test_conn() else { return };
    seed_shopkeeper(&mut conn, 1, "Meena");
    seed_customer(&mut conn, 7, "Asha");
    seed_product(&mut conn, 3, 1, 100, 500);
    let offer_id = submit_bargain(&mut conn, 7, 3, 300).expect("bargain").offer_id;

    let accepted = accept_offer(&mut conn, offer_id).expect("accept");
    assert_eq!(accepted.points_awarded, REWARD_POINTS);

    let order: Order = orders::table
        .find(accepted.order_id)
        .first(&mut conn)
        .expect("order row");
    assert_eq!(order.customer_id, 7);
    assert_eq!(order.product_id, 3);
    assert_eq!(order.quantity, 1);
    assert_eq!(order.final_price, 300);
    assert_eq!(offer_status(&mut conn, offer_id), "Accepted (Manual)");
    assert_eq!(customer_points(&mut conn, 7), Some(100));
}

#[test]
fn second_acceptance_is_blocked_and_state_unchanged() {
    let Some(mut conn) = test_conn() else { return };
    seed_shopkeeper(&mut conn, 1, "Meena");
    seed_customer(&mut conn, 7, "Asha");
    seed_product(&mut conn, 3, 1, 100, 500);
    let offer_id = submit_bargain(&mut conn, 7, 3, 300).expect("bargain").offer_id;
    accept_offer(&mut conn, offer_id).expect("first accept");

    let err = accept_offer(&mut conn, offer_id).unwrap_err();
    assert!(matches!(err, ApiError::PreconditionFailed(_)));
    assert_eq!(order_count(&mut conn), 1);
    assert_eq!(customer_points(&mut conn, 7), Some(100));
}

#[test]
fn auto_accepted_offer_never_converts_to_order() {
    let Some(mut conn) = test_conn() else { return };
    seed_shopkeeper(&mut conn, 1, "Meena");
    seed_customer(&mut conn, 7, "Asha");
    seed_product(&mut conn, 3, 1, 100, 500);

    let outcome = submit_bargain(&mut conn, 7, 3, 600).expect("bargain");
    assert_eq!(outcome.status, OfferStatus::AcceptedAuto);

    // Only Pending offers pass the acceptance precondition.
    let err = accept_offer(&mut conn, outcome.offer_id).unwrap_err();
    assert!(matches!(err, ApiError::PreconditionFailed(_)));
    assert_eq!(order_count(&mut conn), 0);
    assert_eq!(customer_points(&mut conn, 7), None);
}

#[test]
fn accepting_missing_offer_leaves_no_residue() {
    let Some(mut conn) = test_conn() else { return };
    seed_customer(&mut conn, 7, "Asha");

    let err = accept_offer(&mut conn, 4242).unwrap_err();
    assert!(matches!(err, ApiError::PreconditionFailed(_)));
    assert_eq!(order_count(&mut conn), 0);
    assert_eq!(customer_points(&mut conn, 7), None);
}

#[test]
fn leaderboard_credit_is_additive_across_acceptances() {
    let Some(mut conn) = test_conn() else { return };
    seed_shopkeeper(&mut conn, 1, "Meena");
    seed_customer(&mut conn, 7, "Asha");
    seed_product(&mut conn, 3, 1, 100, 500);

    let first = submit_bargain(&mut conn, 7, 3, 300).expect("bargain").offer_id;
    let second = submit_bargain(&mut conn, 7, 3, 450).expect("bargain").offer_id;
    accept_offer(&mut conn, first).expect("accept first");
    accept_offer(&mut conn, second).expect("accept second");

    assert_eq!(customer_points(&mut conn, 7), Some(200));
    let rows: i64 = leaderboard::table.count().get_result(&mut conn).unwrap();
    assert_eq!(rows, 1);
    assert_eq!(order_count(&mut conn), 2);
}
