//! Row structs mapping query results onto the shared wire types.

use anyhow::{bail, Context, Result};
use shared::{
    Appointment, Customer, CustomerSummary, Order, Product, ProductSummary, SellerPreferences,
    PREFERENCES_VERSION,
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SellerRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub preferences: String,
}

/// Decode a stored preferences record.
///
/// Missing keys fall back to the defaults declared on the record (the
/// migration policy for rows written before a key existed); a version newer
/// than this build understands is rejected rather than guessed at.
pub fn load_preferences(raw: &str) -> Result<SellerPreferences> {
    let prefs: SellerPreferences =
        serde_json::from_str(raw).context("malformed preferences record")?;
    if prefs.version > PREFERENCES_VERSION {
        bail!("unsupported preferences version {}", prefs.version);
    }
    Ok(prefs)
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppointmentRow {
    pub id: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub duration_minutes: i64,
    pub status: String,
    pub potential_revenue: f64,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_whatsapp: Option<String>,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub product_price: Option<f64>,
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        // A weak reference only yields a summary when the joined row exists;
        // a dangling id renders the same as "no client"/"no product".
        let customer = match (row.customer_id, row.customer_name) {
            (Some(id), Some(full_name)) => Some(CustomerSummary {
                id,
                full_name,
                whatsapp_number: row.customer_whatsapp,
            }),
            _ => None,
        };
        let product = match (row.product_id, row.product_name, row.product_price) {
            (Some(id), Some(name), Some(price)) => Some(ProductSummary { id, name, price }),
            _ => None,
        };
        Appointment {
            id: row.id,
            appointment_date: row.appointment_date,
            appointment_time: row.appointment_time,
            duration_minutes: row.duration_minutes.max(0) as u32,
            status: row.status,
            potential_revenue: row.potential_revenue,
            location: row.location,
            notes: row.notes,
            customer,
            product,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerRow {
    pub id: String,
    pub full_name: String,
    pub whatsapp_number: Option<String>,
    pub instagram_handle: Option<String>,
    pub address: Option<String>,
    pub total_orders: i64,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            full_name: row.full_name,
            whatsapp_number: row.whatsapp_number,
            instagram_handle: row.instagram_handle,
            address: row.address,
            total_orders: row.total_orders,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    pub image_url: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            stock_quantity: row.stock_quantity,
            image_url: row.image_url,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: String,
    pub amount: f64,
    pub status: String,
    pub tracking_url: Option<String>,
    pub created_at: String,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_whatsapp: Option<String>,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub product_price: Option<f64>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        let customer = match (row.customer_id, row.customer_name) {
            (Some(id), Some(full_name)) => Some(CustomerSummary {
                id,
                full_name,
                whatsapp_number: row.customer_whatsapp,
            }),
            _ => None,
        };
        let product = match (row.product_id, row.product_name, row.product_price) {
            (Some(id), Some(name), Some(price)) => Some(ProductSummary { id, name, price }),
            _ => None,
        };
        Order {
            id: row.id,
            amount: row.amount,
            status: row.status,
            tracking_url: row.tracking_url,
            created_at: row.created_at,
            customer,
            product,
        }
    }
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
