use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod leaderboard;
pub mod models;
pub mod offer;
pub mod order;
pub mod pricing;
pub mod product;
pub mod reports;
pub mod schema;
pub mod store;

#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub pool: db::DbPool,
}

pub fn router(state: AppState) -> Router {
    // Product mutations carry the seller's bearer token; browsing,
    // bargaining and acceptance are open.
    let protected_routes = Router::new()
        .route("/shopkeeper/products", post(product::create_product))
        .route("/shopkeeper/products/:id/price", put(product::update_max_price))
        .route("/shopkeeper/products/:id", delete(product::delete_product))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authenticate,
        ));

    Router::new()
        .route("/", get(|| async { "BargainBazaar backend online." }))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/products", get(product::list_products))
        .route("/products/:id", get(product::get_product))
        .route("/offers", post(offer::submit_offer))
        .route("/offers/:id/accept", post(order::accept_offer_handler))
        .route("/offers/:id", delete(offer::delete_offer))
        .route("/shopkeepers/:id/products", get(product::seller_products))
        .route("/shopkeepers/:id/offers", get(offer::seller_offers))
        .route("/shopkeepers/:id/orders", get(order::seller_orders))
        .route("/shopkeepers/:id/stats", get(reports::seller_stats))
        .route("/customers/:id/orders", get(order::customer_orders))
        .route("/leaderboard", get(leaderboard::top_customers))
        .route(
            "/reports/high-value-customers",
            get(reports::high_value_customers),
        )
        .merge(protected_routes)
        .with_state(state)
}
