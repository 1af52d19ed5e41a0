//! Shared fixtures for service and handler tests.

use chrono::Utc;

use crate::db::DbConnection;
use crate::models::new_id;
use crate::state::AppState;

pub async fn test_db() -> DbConnection {
    DbConnection::init_test()
        .await
        .expect("Failed to create test database")
}

pub async fn test_state() -> (AppState, DbConnection) {
    let db = test_db().await;
    (AppState::new(db.clone(), "test-key".to_string()), db)
}

/// Insert a seller row directly and return its id.
pub async fn seed_seller(db: &DbConnection, email: &str) -> String {
    let id = new_id();
    sqlx::query(
        "INSERT INTO sellers (id, email, password_hash, preferences, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(email)
    .bind("unused-hash")
    .bind("{}")
    .bind(Utc::now().to_rfc3339())
    .execute(db.pool())
    .await
    .expect("Failed to seed seller");
    id
}

/// Insert an order row with a fixed timestamp, no product.
pub async fn seed_order(
    db: &DbConnection,
    seller_id: &str,
    amount: f64,
    status: &str,
    created_at: &str,
) -> String {
    insert_order(db, seller_id, None, amount, status, created_at).await
}

/// Insert an order row tied to a product.
pub async fn seed_order_for_product(
    db: &DbConnection,
    seller_id: &str,
    product_id: &str,
    amount: f64,
    status: &str,
    created_at: &str,
) -> String {
    insert_order(db, seller_id, Some(product_id), amount, status, created_at).await
}

async fn insert_order(
    db: &DbConnection,
    seller_id: &str,
    product_id: Option<&str>,
    amount: f64,
    status: &str,
    created_at: &str,
) -> String {
    let id = new_id();
    sqlx::query(
        r#"INSERT INTO orders
           (id, amount, status, tracking_url, created_at, customer_id, product_id, seller_id)
           VALUES (?, ?, ?, NULL, ?, NULL, ?, ?)"#,
    )
    .bind(&id)
    .bind(amount)
    .bind(status)
    .bind(created_at)
    .bind(product_id)
    .bind(seller_id)
    .execute(db.pool())
    .await
    .expect("Failed to seed order");
    id
}
