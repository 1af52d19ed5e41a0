//! Order tracking behind the recent-orders table.

use chrono::Utc;
use tracing::info;

use crate::db::DbConnection;
use crate::error::ApiError;
use crate::models::{new_id, OrderRow};
use shared::{Order, OrderPayload, OrderStatus};

const SELECT_ORDER: &str = r#"
    SELECT o.id, o.amount, o.status, o.tracking_url, o.created_at,
           o.customer_id, c.full_name AS customer_name, c.whatsapp_number AS customer_whatsapp,
           o.product_id, p.name AS product_name, p.price AS product_price
    FROM orders o
    LEFT JOIN customers c ON c.id = o.customer_id
    LEFT JOIN products p ON p.id = o.product_id
"#;

#[derive(Clone)]
pub struct OrderService {
    db: DbConnection,
}

impl OrderService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Newest orders first, joined with customer and product summaries.
    pub async fn recent(&self, seller_id: &str, limit: u32) -> Result<Vec<Order>, ApiError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{SELECT_ORDER} WHERE o.seller_id = ? ORDER BY o.created_at DESC LIMIT ?"
        ))
        .bind(seller_id)
        .bind(i64::from(limit))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    pub async fn get(&self, seller_id: &str, id: &str) -> Result<Order, ApiError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "{SELECT_ORDER} WHERE o.seller_id = ? AND o.id = ? LIMIT 1"
        ))
        .bind(seller_id)
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(ApiError::NotFound("order"))?;

        Ok(row.into())
    }

    pub async fn create(&self, seller_id: &str, payload: &OrderPayload) -> Result<Order, ApiError> {
        validate(payload)?;
        let id = new_id();

        info!("Creating order for seller {}", seller_id);

        sqlx::query(
            r#"INSERT INTO orders
               (id, amount, status, tracking_url, created_at, customer_id, product_id, seller_id)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(payload.amount)
        .bind(&payload.status)
        .bind(&payload.tracking_url)
        .bind(Utc::now().to_rfc3339())
        .bind(&payload.customer_id)
        .bind(&payload.product_id)
        .bind(seller_id)
        .execute(self.db.pool())
        .await?;

        self.get(seller_id, &id).await
    }

    pub async fn update_status(
        &self,
        seller_id: &str,
        id: &str,
        status: &str,
    ) -> Result<Order, ApiError> {
        if OrderStatus::parse(status).is_none() {
            return Err(ApiError::validation(format!("unknown order status {:?}", status)));
        }

        info!("Updating order {} to {:?}", id, status);

        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ? AND seller_id = ?")
            .bind(status)
            .bind(id)
            .bind(seller_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("order"));
        }
        self.get(seller_id, id).await
    }
}

fn validate(payload: &OrderPayload) -> Result<(), ApiError> {
    if OrderStatus::parse(&payload.status).is_none() {
        return Err(ApiError::validation(format!(
            "unknown order status {:?}",
            payload.status
        )));
    }
    if !payload.amount.is_finite() || payload.amount < 0.0 {
        return Err(ApiError::validation("amount must be a non-negative number"));
    }
    Ok(())
}
