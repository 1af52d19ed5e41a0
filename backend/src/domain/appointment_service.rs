//! Appointment CRUD and the window fetch behind the calendar page.

use chrono::{NaiveDate, NaiveTime};
use tracing::{info, warn};

use crate::db::DbConnection;
use crate::error::ApiError;
use crate::models::{new_id, AppointmentRow};
use shared::{Appointment, AppointmentPayload, AppointmentStatus, DashboardStats, ALLOWED_DURATIONS};

/// Joined select used by every read; summaries come from weak references.
const SELECT_APPOINTMENT: &str = r#"
    SELECT a.id, a.appointment_date, a.appointment_time, a.duration_minutes, a.status,
           a.potential_revenue, a.location, a.notes,
           a.customer_id, c.full_name AS customer_name, c.whatsapp_number AS customer_whatsapp,
           a.product_id, p.name AS product_name, p.price AS product_price
    FROM appointments a
    LEFT JOIN customers c ON c.id = a.customer_id
    LEFT JOIN products p ON p.id = a.product_id
"#;

#[derive(Clone)]
pub struct AppointmentService {
    db: DbConnection,
}

impl AppointmentService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Appointments whose date lies within the inclusive window, joined with
    /// customer and product summaries, ordered ascending by date.
    pub async fn list_range(
        &self,
        seller_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Appointment>, ApiError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "{SELECT_APPOINTMENT}
             WHERE a.seller_id = ? AND a.appointment_date >= ? AND a.appointment_date <= ?
             ORDER BY a.appointment_date ASC, a.appointment_time ASC"
        ))
        .bind(seller_id)
        .bind(start.format("%Y-%m-%d").to_string())
        .bind(end.format("%Y-%m-%d").to_string())
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    pub async fn get(&self, seller_id: &str, id: &str) -> Result<Appointment, ApiError> {
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "{SELECT_APPOINTMENT} WHERE a.seller_id = ? AND a.id = ? LIMIT 1"
        ))
        .bind(seller_id)
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(ApiError::NotFound("appointment"))?;

        Ok(row.into())
    }

    /// Insert a new appointment, stamping the owning seller from the
    /// authenticated session.
    pub async fn create(
        &self,
        seller_id: &str,
        payload: &AppointmentPayload,
    ) -> Result<Appointment, ApiError> {
        validate(payload)?;
        let id = new_id();

        info!(
            "Creating appointment on {} {} for seller {}",
            payload.appointment_date, payload.appointment_time, seller_id
        );

        sqlx::query(
            r#"INSERT INTO appointments
               (id, appointment_date, appointment_time, duration_minutes, status,
                potential_revenue, location, notes, customer_id, product_id, seller_id)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&payload.appointment_date)
        .bind(&payload.appointment_time)
        .bind(payload.duration_minutes as i64)
        .bind(&payload.status)
        .bind(payload.potential_revenue)
        .bind(&payload.location)
        .bind(&payload.notes)
        .bind(&payload.customer_id)
        .bind(&payload.product_id)
        .bind(seller_id)
        .execute(self.db.pool())
        .await?;

        self.get(seller_id, &id).await
    }

    /// Full replace of the mutable fields, keyed by id.
    pub async fn update(
        &self,
        seller_id: &str,
        id: &str,
        payload: &AppointmentPayload,
    ) -> Result<Appointment, ApiError> {
        validate(payload)?;

        info!("Updating appointment {} for seller {}", id, seller_id);

        let result = sqlx::query(
            r#"UPDATE appointments
               SET appointment_date = ?, appointment_time = ?, duration_minutes = ?,
                   status = ?, potential_revenue = ?, location = ?, notes = ?,
                   customer_id = ?, product_id = ?
               WHERE id = ? AND seller_id = ?"#,
        )
        .bind(&payload.appointment_date)
        .bind(&payload.appointment_time)
        .bind(payload.duration_minutes as i64)
        .bind(&payload.status)
        .bind(payload.potential_revenue)
        .bind(&payload.location)
        .bind(&payload.notes)
        .bind(&payload.customer_id)
        .bind(&payload.product_id)
        .bind(id)
        .bind(seller_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            warn!("Appointment {} not found for update", id);
            return Err(ApiError::NotFound("appointment"));
        }

        self.get(seller_id, id).await
    }

    pub async fn delete(&self, seller_id: &str, id: &str) -> Result<(), ApiError> {
        info!("Deleting appointment {} for seller {}", id, seller_id);

        let result = sqlx::query("DELETE FROM appointments WHERE id = ? AND seller_id = ?")
            .bind(id)
            .bind(seller_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("appointment"));
        }
        Ok(())
    }

    /// Count and potential-revenue sum of appointments dated today or later.
    pub async fn upcoming_stats(
        &self,
        seller_id: &str,
        today: NaiveDate,
    ) -> Result<DashboardStats, ApiError> {
        let (upcoming_appointments, potential_revenue): (i64, f64) = sqlx::query_as(
            r#"SELECT COUNT(*), COALESCE(SUM(potential_revenue), 0.0)
               FROM appointments
               WHERE seller_id = ? AND appointment_date >= ?"#,
        )
        .bind(seller_id)
        .bind(today.format("%Y-%m-%d").to_string())
        .fetch_one(self.db.pool())
        .await?;

        Ok(DashboardStats {
            upcoming_appointments,
            potential_revenue,
        })
    }
}

/// Reject payloads outside the closed sets before touching the store.
fn validate(payload: &AppointmentPayload) -> Result<(), ApiError> {
    if NaiveDate::parse_from_str(&payload.appointment_date, "%Y-%m-%d").is_err() {
        return Err(ApiError::validation("appointment_date must be yyyy-MM-dd"));
    }
    if NaiveTime::parse_from_str(&payload.appointment_time, "%H:%M").is_err() {
        return Err(ApiError::validation("appointment_time must be HH:MM"));
    }
    if !ALLOWED_DURATIONS.contains(&payload.duration_minutes) {
        return Err(ApiError::validation(format!(
            "duration_minutes must be one of {:?}",
            ALLOWED_DURATIONS
        )));
    }
    if AppointmentStatus::parse(&payload.status).is_none() {
        return Err(ApiError::validation(format!(
            "unknown status {:?}",
            payload.status
        )));
    }
    if !payload.potential_revenue.is_finite() || payload.potential_revenue < 0.0 {
        return Err(ApiError::validation(
            "potential_revenue must be a non-negative number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomerService, ProductService};
    use crate::test_support::{seed_seller, test_db};
    use shared::{CustomerPayload, ProductPayload};

    fn payload(date: &str) -> AppointmentPayload {
        AppointmentPayload {
            appointment_date: date.to_string(),
            appointment_time: "14:00".to_string(),
            duration_minutes: 30,
            status: "Scheduled".to_string(),
            potential_revenue: 50.0,
            location: Some("Cafe".to_string()),
            notes: Some("follow-up".to_string()),
            customer_id: None,
            product_id: None,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_create_then_fetch_round_trip() {
        let db = test_db().await;
        let seller = seed_seller(&db, "round@trip.test").await;
        let service = AppointmentService::new(db);

        let created = service
            .create(&seller, &payload("2024-06-10"))
            .await
            .expect("create should succeed");

        let window = service
            .list_range(&seller, date("2024-06-10"), date("2024-06-16"))
            .await
            .expect("fetch should succeed");

        assert_eq!(window.len(), 1);
        let fetched = &window[0];
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.appointment_date, "2024-06-10");
        assert_eq!(fetched.appointment_time, "14:00");
        assert_eq!(fetched.duration_minutes, 30);
        assert_eq!(fetched.status, "Scheduled");
        assert_eq!(fetched.potential_revenue, 50.0);
        assert_eq!(fetched.location.as_deref(), Some("Cafe"));
        assert_eq!(fetched.notes.as_deref(), Some("follow-up"));
        assert!(fetched.customer.is_none());
        assert!(fetched.product.is_none());
    }

    #[tokio::test]
    async fn test_unchanged_edit_is_idempotent() {
        let db = test_db().await;
        let seller = seed_seller(&db, "edit@idempotent.test").await;
        let service = AppointmentService::new(db);

        let created = service.create(&seller, &payload("2024-06-10")).await.unwrap();

        // Re-submit exactly what is stored.
        let resubmitted = AppointmentPayload {
            appointment_date: created.appointment_date.clone(),
            appointment_time: created.appointment_time.clone(),
            duration_minutes: created.duration_minutes,
            status: created.status.clone(),
            potential_revenue: created.potential_revenue,
            location: created.location.clone(),
            notes: created.notes.clone(),
            customer_id: None,
            product_id: None,
        };
        let updated = service
            .update(&seller, &created.id, &resubmitted)
            .await
            .expect("update should succeed");

        assert_eq!(updated, created);
    }

    #[tokio::test]
    async fn test_update_replaces_all_mutable_fields() {
        let db = test_db().await;
        let seller = seed_seller(&db, "edit@replace.test").await;
        let service = AppointmentService::new(db);

        let created = service.create(&seller, &payload("2024-06-10")).await.unwrap();

        let mut changed = payload("2024-06-11");
        changed.appointment_time = "09:30".to_string();
        changed.duration_minutes = 90;
        changed.status = "Confirmed".to_string();
        changed.potential_revenue = 120.0;
        changed.location = None;
        changed.notes = None;

        let updated = service.update(&seller, &created.id, &changed).await.unwrap();
        assert_eq!(updated.appointment_date, "2024-06-11");
        assert_eq!(updated.appointment_time, "09:30");
        assert_eq!(updated.duration_minutes, 90);
        assert_eq!(updated.status, "Confirmed");
        assert_eq!(updated.potential_revenue, 120.0);
        assert_eq!(updated.location, None);
        assert_eq!(updated.notes, None);
    }

    #[tokio::test]
    async fn test_delete_removes_from_window_fetch() {
        let db = test_db().await;
        let seller = seed_seller(&db, "delete@gone.test").await;
        let service = AppointmentService::new(db);

        let created = service.create(&seller, &payload("2024-06-10")).await.unwrap();
        service.delete(&seller, &created.id).await.unwrap();

        let window = service
            .list_range(&seller, date("2024-06-10"), date("2024-06-16"))
            .await
            .unwrap();
        assert!(window.iter().all(|a| a.id != created.id));

        // A second delete finds nothing.
        let err = service.delete(&seller, &created.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_window_fetch_joins_summaries_and_orders_by_date() {
        let db = test_db().await;
        let seller = seed_seller(&db, "join@order.test").await;
        let customers = CustomerService::new(db.clone());
        let products = ProductService::new(db.clone());
        let service = AppointmentService::new(db);

        let customer = customers
            .create(
                &seller,
                &CustomerPayload {
                    full_name: "Jean Dupont".to_string(),
                    whatsapp_number: Some("+33 6 12 34 56 78".to_string()),
                    instagram_handle: None,
                    address: None,
                },
            )
            .await
            .unwrap();
        let product = products
            .create(
                &seller,
                &ProductPayload {
                    name: "Premium Cap".to_string(),
                    description: None,
                    price: 25.0,
                    stock_quantity: 12,
                    image_url: None,
                },
            )
            .await
            .unwrap();

        let mut late = payload("2024-06-12");
        late.customer_id = Some(customer.id.clone());
        late.product_id = Some(product.id.clone());
        service.create(&seller, &late).await.unwrap();
        service.create(&seller, &payload("2024-06-10")).await.unwrap();

        let window = service
            .list_range(&seller, date("2024-06-10"), date("2024-06-16"))
            .await
            .unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].appointment_date, "2024-06-10");
        assert_eq!(window[1].appointment_date, "2024-06-12");

        let joined = &window[1];
        let joined_customer = joined.customer.as_ref().expect("customer summary");
        assert_eq!(joined_customer.full_name, "Jean Dupont");
        let joined_product = joined.product.as_ref().expect("product summary");
        assert_eq!(joined_product.price, 25.0);
    }

    #[tokio::test]
    async fn test_window_excludes_other_sellers_and_dates() {
        let db = test_db().await;
        let seller = seed_seller(&db, "mine@only.test").await;
        let other = seed_seller(&db, "other@seller.test").await;
        let service = AppointmentService::new(db);

        service.create(&seller, &payload("2024-06-10")).await.unwrap();
        service.create(&seller, &payload("2024-06-17")).await.unwrap();
        service.create(&other, &payload("2024-06-10")).await.unwrap();

        let window = service
            .list_range(&seller, date("2024-06-10"), date("2024-06-16"))
            .await
            .unwrap();
        assert_eq!(window.len(), 1);
    }

    #[tokio::test]
    async fn test_validation_rejects_out_of_set_values() {
        let db = test_db().await;
        let seller = seed_seller(&db, "invalid@input.test").await;
        let service = AppointmentService::new(db);

        let mut bad_duration = payload("2024-06-10");
        bad_duration.duration_minutes = 25;
        assert!(matches!(
            service.create(&seller, &bad_duration).await.unwrap_err(),
            ApiError::Validation(_)
        ));

        let mut bad_status = payload("2024-06-10");
        bad_status.status = "Postponed".to_string();
        assert!(matches!(
            service.create(&seller, &bad_status).await.unwrap_err(),
            ApiError::Validation(_)
        ));

        let mut bad_date = payload("10/06/2024");
        bad_date.appointment_date = "10/06/2024".to_string();
        assert!(matches!(
            service.create(&seller, &bad_date).await.unwrap_err(),
            ApiError::Validation(_)
        ));

        let mut bad_revenue = payload("2024-06-10");
        bad_revenue.potential_revenue = -5.0;
        assert!(matches!(
            service.create(&seller, &bad_revenue).await.unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_double_booking_is_permitted() {
        let db = test_db().await;
        let seller = seed_seller(&db, "double@booking.test").await;
        let service = AppointmentService::new(db);

        service.create(&seller, &payload("2024-06-10")).await.unwrap();
        service.create(&seller, &payload("2024-06-10")).await.unwrap();

        let window = service
            .list_range(&seller, date("2024-06-10"), date("2024-06-10"))
            .await
            .unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].appointment_time, window[1].appointment_time);
    }

    #[tokio::test]
    async fn test_upcoming_stats_counts_from_today() {
        let db = test_db().await;
        let seller = seed_seller(&db, "stats@upcoming.test").await;
        let service = AppointmentService::new(db);

        let mut past = payload("2024-06-01");
        past.potential_revenue = 999.0;
        service.create(&seller, &past).await.unwrap();
        service.create(&seller, &payload("2024-06-10")).await.unwrap();
        let mut later = payload("2024-07-02");
        later.potential_revenue = 75.5;
        service.create(&seller, &later).await.unwrap();

        let stats = service.upcoming_stats(&seller, date("2024-06-10")).await.unwrap();
        assert_eq!(stats.upcoming_appointments, 2);
        assert_eq!(stats.potential_revenue, 125.5);
    }
}
