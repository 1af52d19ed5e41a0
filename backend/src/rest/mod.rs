//! HTTP surface: one module per dashboard page, assembled into the router.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::auth;
use crate::state::AppState;

pub mod analytics;
pub mod appointments;
pub mod auth_routes;
pub mod calendar;
pub mod customers;
pub mod orders;
pub mod products;

/// Build the full API router over the given state.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/signup", post(auth_routes::sign_up))
        .route("/auth/signin", post(auth_routes::sign_in))
        .route("/auth/signout", post(auth_routes::sign_out))
        .route("/auth/session", get(auth_routes::session))
        .route("/auth/preferences", put(auth_routes::update_preferences))
        .route("/auth/onboarding", post(auth_routes::complete_onboarding))
        .route("/calendar", get(calendar::window))
        .route("/appointments", post(appointments::create))
        .route(
            "/appointments/:id",
            put(appointments::update).delete(appointments::delete),
        )
        .route("/customers", get(customers::list).post(customers::create))
        .route("/customers/stats", get(customers::stats))
        .route(
            "/customers/:id",
            put(customers::update).delete(customers::delete),
        )
        .route("/products", get(products::list).post(products::create))
        .route("/products/stats", get(products::stats))
        .route(
            "/products/:id",
            put(products::update).delete(products::delete),
        )
        .route("/orders", post(orders::create))
        .route("/orders/recent", get(orders::recent))
        .route("/orders/:id/status", put(orders::update_status))
        .route("/dashboard/stats", get(appointments::dashboard_stats))
        .route("/analytics", get(analytics::summary));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
        .with_state(state)
}
