//! Catalog entries for the inventory page and the appointment selector.

use tracing::info;

use crate::db::DbConnection;
use crate::error::ApiError;
use crate::models::{new_id, ProductRow};
use shared::{InventoryStats, Product, ProductPayload};

const SELECT_PRODUCT: &str =
    "SELECT id, name, description, price, stock_quantity, image_url FROM products";

#[derive(Clone)]
pub struct ProductService {
    db: DbConnection,
}

impl ProductService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// The full catalog for the seller, ordered by name.
    pub async fn list(&self, seller_id: &str) -> Result<Vec<Product>, ApiError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCT} WHERE seller_id = ? ORDER BY name"
        ))
        .bind(seller_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Products offered in the appointment selector.
    ///
    /// The filter is `stock_quantity > 0`. One page variant of the original
    /// chained an `= 0` and a `> 0` condition, which can never match; see
    /// DESIGN.md for the defect record.
    pub async fn list_available(&self, seller_id: &str) -> Result<Vec<Product>, ApiError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCT} WHERE seller_id = ? AND stock_quantity > 0 ORDER BY name"
        ))
        .bind(seller_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    pub async fn get(&self, seller_id: &str, id: &str) -> Result<Product, ApiError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCT} WHERE seller_id = ? AND id = ? LIMIT 1"
        ))
        .bind(seller_id)
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(ApiError::NotFound("product"))?;

        Ok(row.into())
    }

    pub async fn create(
        &self,
        seller_id: &str,
        payload: &ProductPayload,
    ) -> Result<Product, ApiError> {
        validate(payload)?;
        let id = new_id();

        info!("Creating product {:?} for seller {}", payload.name, seller_id);

        sqlx::query(
            r#"INSERT INTO products
               (id, name, description, price, stock_quantity, image_url, seller_id)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(payload.name.trim())
        .bind(&payload.description)
        .bind(payload.price)
        .bind(payload.stock_quantity)
        .bind(&payload.image_url)
        .bind(seller_id)
        .execute(self.db.pool())
        .await?;

        self.get(seller_id, &id).await
    }

    pub async fn update(
        &self,
        seller_id: &str,
        id: &str,
        payload: &ProductPayload,
    ) -> Result<Product, ApiError> {
        validate(payload)?;

        info!("Updating product {} for seller {}", id, seller_id);

        let result = sqlx::query(
            r#"UPDATE products
               SET name = ?, description = ?, price = ?, stock_quantity = ?, image_url = ?
               WHERE id = ? AND seller_id = ?"#,
        )
        .bind(payload.name.trim())
        .bind(&payload.description)
        .bind(payload.price)
        .bind(payload.stock_quantity)
        .bind(&payload.image_url)
        .bind(id)
        .bind(seller_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("product"));
        }
        self.get(seller_id, id).await
    }

    pub async fn delete(&self, seller_id: &str, id: &str) -> Result<(), ApiError> {
        info!("Deleting product {} for seller {}", id, seller_id);

        let result = sqlx::query("DELETE FROM products WHERE id = ? AND seller_id = ?")
            .bind(id)
            .bind(seller_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("product"));
        }
        Ok(())
    }

    /// Headline numbers for the inventory page.
    pub async fn stats(&self, seller_id: &str) -> Result<InventoryStats, ApiError> {
        let (total_products, total_value, low_stock, out_of_stock): (i64, f64, i64, i64) =
            sqlx::query_as(
                r#"SELECT COUNT(*),
                          COALESCE(SUM(price * stock_quantity), 0.0),
                          COALESCE(SUM(stock_quantity < 10), 0),
                          COALESCE(SUM(stock_quantity = 0), 0)
                   FROM products WHERE seller_id = ?"#,
            )
            .bind(seller_id)
            .fetch_one(self.db.pool())
            .await?;

        Ok(InventoryStats {
            total_products,
            total_value,
            low_stock,
            out_of_stock,
        })
    }
}

fn validate(payload: &ProductPayload) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("name is required"));
    }
    if !payload.price.is_finite() || payload.price < 0.0 {
        return Err(ApiError::validation("price must be a non-negative number"));
    }
    if payload.stock_quantity < 0 {
        return Err(ApiError::validation("stock_quantity must not be negative"));
    }
    Ok(())
}
