//! Aggregates for the analytics page, derived from recorded orders.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use tracing::info;

use crate::db::DbConnection;
use crate::error::ApiError;
use shared::{AnalyticsSummary, MonthlyRevenue, OrderStatus, TopProduct, WeekdayOrders};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// How many rows the top-products table shows.
const TOP_PRODUCT_ROWS: usize = 5;

#[derive(Debug, Clone, sqlx::FromRow)]
struct AnalyticsOrderRow {
    amount: f64,
    status: String,
    created_at: String,
    customer_id: Option<String>,
    product_name: Option<String>,
}

#[derive(Clone)]
pub struct AnalyticsService {
    db: DbConnection,
}

impl AnalyticsService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Everything the analytics page shows for one inclusive date range.
    ///
    /// Cancelled orders count toward traffic (order count, weekday bars)
    /// but never toward revenue or products sold.
    pub async fn summary(
        &self,
        seller_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AnalyticsSummary, ApiError> {
        info!("Computing analytics for seller {} over {}..={}", seller_id, start, end);

        let rows = sqlx::query_as::<_, AnalyticsOrderRow>(
            r#"SELECT o.amount, o.status, o.created_at, o.customer_id, p.name AS product_name
               FROM orders o
               LEFT JOIN products p ON p.id = o.product_id
               WHERE o.seller_id = ?
                 AND substr(o.created_at, 1, 10) >= ?
                 AND substr(o.created_at, 1, 10) <= ?"#,
        )
        .bind(seller_id)
        .bind(start.format("%Y-%m-%d").to_string())
        .bind(end.format("%Y-%m-%d").to_string())
        .fetch_all(self.db.pool())
        .await?;

        let cancelled = OrderStatus::Cancelled.as_str();
        let sold: Vec<&AnalyticsOrderRow> =
            rows.iter().filter(|r| r.status != cancelled).collect();

        let total_revenue = sold.iter().map(|r| r.amount).sum();
        let order_count = rows.len() as i64;
        let active_customers = rows
            .iter()
            .filter_map(|r| r.customer_id.as_deref())
            .collect::<HashSet<_>>()
            .len() as i64;
        let products_sold = sold.iter().filter(|r| r.product_name.is_some()).count() as i64;

        // Monthly buckets keep calendar order via the yyyy-MM key.
        let mut by_month: BTreeMap<String, f64> = BTreeMap::new();
        for row in &sold {
            let bucket = row.created_at.chars().take(7).collect::<String>();
            *by_month.entry(bucket).or_insert(0.0) += row.amount;
        }
        let revenue_by_month = by_month
            .into_iter()
            .map(|(month, revenue)| MonthlyRevenue { month, revenue })
            .collect();

        let mut weekday_counts = [0i64; 7];
        for row in &rows {
            if let Some(date) = parse_order_date(&row.created_at) {
                weekday_counts[date.weekday().num_days_from_monday() as usize] += 1;
            }
        }
        let orders_by_weekday = WEEKDAYS
            .iter()
            .zip(weekday_counts)
            .map(|(weekday, count)| WeekdayOrders {
                weekday: weekday.to_string(),
                count,
            })
            .collect();

        let mut by_product: HashMap<&str, (i64, f64)> = HashMap::new();
        for row in &sold {
            if let Some(name) = row.product_name.as_deref() {
                let entry = by_product.entry(name).or_insert((0, 0.0));
                entry.0 += 1;
                entry.1 += row.amount;
            }
        }
        let mut top_products: Vec<TopProduct> = by_product
            .into_iter()
            .map(|(name, (sales, revenue))| TopProduct {
                name: name.to_string(),
                sales,
                revenue,
            })
            .collect();
        top_products.sort_by(|a, b| {
            b.revenue
                .partial_cmp(&a.revenue)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        top_products.truncate(TOP_PRODUCT_ROWS);

        Ok(AnalyticsSummary {
            total_revenue,
            order_count,
            active_customers,
            products_sold,
            revenue_by_month,
            orders_by_weekday,
            top_products,
        })
    }
}

fn parse_order_date(created_at: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(created_at.get(..10)?, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProductService;
    use crate::test_support::{seed_order, seed_order_for_product, seed_seller, test_db};
    use shared::ProductPayload;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_summary_over_an_empty_range() {
        let db = test_db().await;
        let seller = seed_seller(&db, "analytics@empty.test").await;
        let service = AnalyticsService::new(db);

        let summary = service
            .summary(&seller, date("2024-06-01"), date("2024-06-30"))
            .await
            .unwrap();
        assert_eq!(summary.total_revenue, 0.0);
        assert_eq!(summary.order_count, 0);
        assert_eq!(summary.orders_by_weekday.len(), 7);
        assert!(summary.orders_by_weekday.iter().all(|w| w.count == 0));
        assert!(summary.top_products.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_orders_count_as_traffic_not_revenue() {
        let db = test_db().await;
        let seller = seed_seller(&db, "analytics@cancelled.test").await;
        let service = AnalyticsService::new(db.clone());

        seed_order(&db, &seller, 100.0, "Delivered", "2024-06-03T09:00:00+00:00").await;
        seed_order(&db, &seller, 40.0, "Cancelled", "2024-06-03T10:00:00+00:00").await;

        let summary = service
            .summary(&seller, date("2024-06-01"), date("2024-06-30"))
            .await
            .unwrap();
        assert_eq!(summary.order_count, 2);
        assert_eq!(summary.total_revenue, 100.0);
        // Both landed on Monday June 3rd.
        assert_eq!(summary.orders_by_weekday[0].weekday, "Mon");
        assert_eq!(summary.orders_by_weekday[0].count, 2);
    }

    #[tokio::test]
    async fn test_range_bounds_are_inclusive() {
        let db = test_db().await;
        let seller = seed_seller(&db, "analytics@range.test").await;
        let service = AnalyticsService::new(db.clone());

        seed_order(&db, &seller, 10.0, "Delivered", "2024-05-31T23:00:00+00:00").await;
        seed_order(&db, &seller, 20.0, "Delivered", "2024-06-01T00:30:00+00:00").await;
        seed_order(&db, &seller, 30.0, "Delivered", "2024-06-30T23:30:00+00:00").await;
        seed_order(&db, &seller, 40.0, "Delivered", "2024-07-01T00:00:00+00:00").await;

        let summary = service
            .summary(&seller, date("2024-06-01"), date("2024-06-30"))
            .await
            .unwrap();
        assert_eq!(summary.order_count, 2);
        assert_eq!(summary.total_revenue, 50.0);
    }

    #[tokio::test]
    async fn test_monthly_buckets_and_top_products() {
        let db = test_db().await;
        let seller = seed_seller(&db, "analytics@buckets.test").await;
        let products = ProductService::new(db.clone());
        let service = AnalyticsService::new(db.clone());

        let cap = products
            .create(&seller, &ProductPayload {
                name: "Cap".to_string(),
                description: None,
                price: 25.0,
                stock_quantity: 10,
                image_url: None,
            })
            .await
            .unwrap();
        let lamp = products
            .create(&seller, &ProductPayload {
                name: "Lamp".to_string(),
                description: None,
                price: 50.0,
                stock_quantity: 10,
                image_url: None,
            })
            .await
            .unwrap();

        seed_order_for_product(&db, &seller, &cap.id, 25.0, "Delivered", "2024-05-10T09:00:00+00:00").await;
        seed_order_for_product(&db, &seller, &cap.id, 25.0, "Delivered", "2024-06-10T09:00:00+00:00").await;
        seed_order_for_product(&db, &seller, &lamp.id, 50.0, "Delivered", "2024-06-11T09:00:00+00:00").await;

        let summary = service
            .summary(&seller, date("2024-05-01"), date("2024-06-30"))
            .await
            .unwrap();

        assert_eq!(summary.revenue_by_month.len(), 2);
        assert_eq!(summary.revenue_by_month[0].month, "2024-05");
        assert_eq!(summary.revenue_by_month[0].revenue, 25.0);
        assert_eq!(summary.revenue_by_month[1].month, "2024-06");
        assert_eq!(summary.revenue_by_month[1].revenue, 75.0);

        assert_eq!(summary.products_sold, 3);
        assert_eq!(summary.top_products.len(), 2);
        assert_eq!(summary.top_products[0].name, "Cap");
        assert_eq!(summary.top_products[0].sales, 2);
        assert_eq!(summary.top_products[0].revenue, 50.0);
        assert_eq!(summary.top_products[1].name, "Lamp");
    }
}
