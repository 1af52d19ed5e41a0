//! Customer records for the customers page and the appointment selector.

use tracing::info;

use crate::db::DbConnection;
use crate::error::ApiError;
use crate::models::{new_id, CustomerRow};
use shared::{Customer, CustomerPayload, CustomerStats};

/// Order threshold at which a customer counts as VIP.
const VIP_ORDER_COUNT: i64 = 5;

#[derive(Clone)]
pub struct CustomerService {
    db: DbConnection,
}

impl CustomerService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// All customers for the seller, ordered by name.
    pub async fn list(&self, seller_id: &str) -> Result<Vec<Customer>, ApiError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"SELECT id, full_name, whatsapp_number, instagram_handle, address, total_orders
               FROM customers WHERE seller_id = ? ORDER BY full_name"#,
        )
        .bind(seller_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    pub async fn get(&self, seller_id: &str, id: &str) -> Result<Customer, ApiError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"SELECT id, full_name, whatsapp_number, instagram_handle, address, total_orders
               FROM customers WHERE seller_id = ? AND id = ? LIMIT 1"#,
        )
        .bind(seller_id)
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(ApiError::NotFound("customer"))?;

        Ok(row.into())
    }

    /// Insert a new customer; the orders counter starts at 0.
    pub async fn create(
        &self,
        seller_id: &str,
        payload: &CustomerPayload,
    ) -> Result<Customer, ApiError> {
        validate(payload)?;
        let id = new_id();

        info!("Creating customer {:?} for seller {}", payload.full_name, seller_id);

        sqlx::query(
            r#"INSERT INTO customers
               (id, full_name, whatsapp_number, instagram_handle, address, total_orders, seller_id)
               VALUES (?, ?, ?, ?, ?, 0, ?)"#,
        )
        .bind(&id)
        .bind(payload.full_name.trim())
        .bind(&payload.whatsapp_number)
        .bind(&payload.instagram_handle)
        .bind(&payload.address)
        .bind(seller_id)
        .execute(self.db.pool())
        .await?;

        self.get(seller_id, &id).await
    }

    /// Replace the editable fields; `total_orders` is left untouched.
    pub async fn update(
        &self,
        seller_id: &str,
        id: &str,
        payload: &CustomerPayload,
    ) -> Result<Customer, ApiError> {
        validate(payload)?;

        info!("Updating customer {} for seller {}", id, seller_id);

        let result = sqlx::query(
            r#"UPDATE customers
               SET full_name = ?, whatsapp_number = ?, instagram_handle = ?, address = ?
               WHERE id = ? AND seller_id = ?"#,
        )
        .bind(payload.full_name.trim())
        .bind(&payload.whatsapp_number)
        .bind(&payload.instagram_handle)
        .bind(&payload.address)
        .bind(id)
        .bind(seller_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("customer"));
        }
        self.get(seller_id, id).await
    }

    pub async fn delete(&self, seller_id: &str, id: &str) -> Result<(), ApiError> {
        info!("Deleting customer {} for seller {}", id, seller_id);

        let result = sqlx::query("DELETE FROM customers WHERE id = ? AND seller_id = ?")
            .bind(id)
            .bind(seller_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("customer"));
        }
        Ok(())
    }

    /// Headline numbers for the customers page.
    pub async fn stats(&self, seller_id: &str) -> Result<CustomerStats, ApiError> {
        let (total_customers, total_orders, vip_customers): (i64, i64, i64) = sqlx::query_as(
            r#"SELECT COUNT(*),
                      COALESCE(SUM(total_orders), 0),
                      COALESCE(SUM(total_orders >= ?), 0)
               FROM customers WHERE seller_id = ?"#,
        )
        .bind(VIP_ORDER_COUNT)
        .bind(seller_id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(CustomerStats {
            total_customers,
            total_orders,
            vip_customers,
        })
    }
}

fn validate(payload: &CustomerPayload) -> Result<(), ApiError> {
    if payload.full_name.trim().is_empty() {
        return Err(ApiError::validation("full_name is required"));
    }
    Ok(())
}
