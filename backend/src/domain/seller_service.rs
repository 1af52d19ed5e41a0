//! Seller accounts, sessions, and the typed preferences record.

use chrono::Utc;
use tracing::{info, warn};

use crate::auth::{hash_password, verify_password, CurrentSeller};
use crate::db::DbConnection;
use crate::error::ApiError;
use crate::models::{load_preferences, new_id, SellerRow};
use shared::{
    OnboardingRequest, SellerPreferences, SellerProfile, SessionResponse, SignInRequest,
    SignUpRequest, UpdatePreferencesRequest,
};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone)]
pub struct SellerService {
    db: DbConnection,
}

impl SellerService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Create an account with default preferences and open a session.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<SessionResponse, ApiError> {
        let email = request.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(ApiError::validation("a valid email is required"));
        }
        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM sellers WHERE email = ?")
            .bind(&email)
            .fetch_optional(self.db.pool())
            .await?;
        if existing.is_some() {
            return Err(ApiError::validation("email already registered"));
        }

        let preferences = SellerPreferences {
            full_name: request
                .full_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from),
            ..SellerPreferences::default()
        };

        let id = new_id();
        let password_hash = hash_password(&request.password)
            .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;

        info!("Registering seller {}", email);

        sqlx::query(
            r#"INSERT INTO sellers (id, email, password_hash, preferences, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&email)
        .bind(&password_hash)
        .bind(serde_json::to_string(&preferences).map_err(anyhow::Error::from)?)
        .bind(Utc::now().to_rfc3339())
        .execute(self.db.pool())
        .await?;

        let token = self.open_session(&id).await?;
        let seller = self.profile(&id).await?;
        Ok(SessionResponse { token, seller })
    }

    /// Verify credentials and open a fresh session.
    ///
    /// A wrong email and a wrong password are indistinguishable to the
    /// caller.
    pub async fn sign_in(&self, request: &SignInRequest) -> Result<SessionResponse, ApiError> {
        let email = request.email.trim().to_lowercase();
        let row = sqlx::query_as::<_, SellerRow>(
            "SELECT id, email, password_hash, preferences FROM sellers WHERE email = ? LIMIT 1",
        )
        .bind(&email)
        .fetch_optional(self.db.pool())
        .await?;

        let Some(row) = row else {
            return Err(ApiError::Unauthorized);
        };
        if !verify_password(&request.password, &row.password_hash) {
            warn!("Failed sign-in for {}", email);
            return Err(ApiError::Unauthorized);
        }

        let token = self.open_session(&row.id).await?;
        let seller = self.profile(&row.id).await?;
        Ok(SessionResponse { token, seller })
    }

    /// Delete the presented session. Unknown tokens are a no-op.
    pub async fn sign_out(&self, token: &str) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    /// Resolve a session token to the authenticated identity.
    pub async fn resolve_session(&self, token: &str) -> Result<Option<CurrentSeller>, ApiError> {
        let row = sqlx::query_as::<_, SellerRow>(
            r#"SELECT s.id, s.email, s.password_hash, s.preferences
               FROM sessions
               JOIN sellers s ON s.id = sessions.seller_id
               WHERE sessions.token = ?
               LIMIT 1"#,
        )
        .bind(token)
        .fetch_optional(self.db.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let preferences = load_preferences(&row.preferences)?;
        Ok(Some(CurrentSeller {
            id: row.id,
            email: row.email,
            display_name: preferences.display_name().to_string(),
            preferences,
        }))
    }

    pub async fn profile(&self, seller_id: &str) -> Result<SellerProfile, ApiError> {
        let row = sqlx::query_as::<_, SellerRow>(
            "SELECT id, email, password_hash, preferences FROM sellers WHERE id = ? LIMIT 1",
        )
        .bind(seller_id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(ApiError::NotFound("seller"))?;

        let preferences = load_preferences(&row.preferences)?;
        Ok(SellerProfile {
            id: row.id,
            email: row.email,
            display_name: preferences.display_name().to_string(),
            preferences,
        })
    }

    /// Apply a partial preferences update; absent fields keep their value.
    pub async fn update_preferences(
        &self,
        seller_id: &str,
        request: &UpdatePreferencesRequest,
    ) -> Result<SellerProfile, ApiError> {
        let mut preferences = self.profile(seller_id).await?.preferences;

        if let Some(full_name) = &request.full_name {
            preferences.full_name = non_empty(full_name);
        }
        if let Some(store_name) = &request.store_name {
            preferences.store_name = non_empty(store_name);
        }
        if let Some(store_url) = &request.store_url {
            preferences.store_url = non_empty(store_url);
        }
        if let Some(value) = request.email_notifications {
            preferences.email_notifications = value;
        }
        if let Some(value) = request.order_notifications {
            preferences.order_notifications = value;
        }
        if let Some(value) = request.stock_notifications {
            preferences.stock_notifications = value;
        }

        self.store_preferences(seller_id, &preferences).await?;
        self.profile(seller_id).await
    }

    /// One-shot onboarding completion: record the chosen platform and focus
    /// and mark the wizard done.
    pub async fn complete_onboarding(
        &self,
        seller_id: &str,
        request: &OnboardingRequest,
    ) -> Result<SellerProfile, ApiError> {
        if request.sales_platform.trim().is_empty() || request.main_focus.trim().is_empty() {
            return Err(ApiError::validation(
                "sales_platform and main_focus are required",
            ));
        }

        let mut preferences = self.profile(seller_id).await?.preferences;
        preferences.sales_platform = Some(request.sales_platform.trim().to_string());
        preferences.main_focus = Some(request.main_focus.trim().to_string());
        preferences.onboarding_completed = true;

        info!("Seller {} completed onboarding", seller_id);

        self.store_preferences(seller_id, &preferences).await?;
        self.profile(seller_id).await
    }

    async fn store_preferences(
        &self,
        seller_id: &str,
        preferences: &SellerPreferences,
    ) -> Result<(), ApiError> {
        let result = sqlx::query("UPDATE sellers SET preferences = ? WHERE id = ?")
            .bind(serde_json::to_string(preferences).map_err(anyhow::Error::from)?)
            .bind(seller_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("seller"));
        }
        Ok(())
    }

    async fn open_session(&self, seller_id: &str) -> Result<String, ApiError> {
        let token = new_id();
        sqlx::query("INSERT INTO sessions (token, seller_id, created_at) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(seller_id)
            .bind(Utc::now().to_rfc3339())
            .execute(self.db.pool())
            .await?;
        Ok(token)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;
    use shared::DEFAULT_DISPLAY_NAME;

    fn sign_up_request(email: &str, full_name: Option<&str>) -> SignUpRequest {
        SignUpRequest {
            email: email.to_string(),
            password: "correct horse".to_string(),
            full_name: full_name.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let db = test_db().await;
        let service = SellerService::new(db);

        let signed_up = service
            .sign_up(&sign_up_request("amira@omnishop.test", Some("Amira")))
            .await
            .unwrap();
        assert_eq!(signed_up.seller.display_name, "Amira");
        assert!(!signed_up.seller.preferences.onboarding_completed);

        let signed_in = service
            .sign_in(&SignInRequest {
                email: "amira@omnishop.test".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(signed_in.seller.id, signed_up.seller.id);
        assert_ne!(signed_in.token, signed_up.token);
    }

    #[tokio::test]
    async fn test_wrong_credentials_are_indistinguishable() {
        let db = test_db().await;
        let service = SellerService::new(db);
        service
            .sign_up(&sign_up_request("amira@omnishop.test", None))
            .await
            .unwrap();

        let wrong_password = service
            .sign_in(&SignInRequest {
                email: "amira@omnishop.test".to_string(),
                password: "wrong password".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = service
            .sign_in(&SignInRequest {
                email: "nobody@omnishop.test".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, ApiError::Unauthorized));
        assert!(matches!(unknown_email, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = test_db().await;
        let service = SellerService::new(db);
        service
            .sign_up(&sign_up_request("amira@omnishop.test", None))
            .await
            .unwrap();

        let err = service
            .sign_up(&sign_up_request("Amira@Omnishop.test", None))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_session_resolution_and_sign_out() {
        let db = test_db().await;
        let service = SellerService::new(db);
        let session = service
            .sign_up(&sign_up_request("amira@omnishop.test", None))
            .await
            .unwrap();

        let current = service
            .resolve_session(&session.token)
            .await
            .unwrap()
            .expect("session should resolve");
        // No name set: the fixed placeholder applies.
        assert_eq!(current.display_name, DEFAULT_DISPLAY_NAME);

        service.sign_out(&session.token).await.unwrap();
        assert!(service.resolve_session(&session.token).await.unwrap().is_none());

        // Signing out an unknown token is a no-op.
        service.sign_out("not-a-token").await.unwrap();
    }

    #[tokio::test]
    async fn test_partial_preferences_update() {
        let db = test_db().await;
        let service = SellerService::new(db);
        let session = service
            .sign_up(&sign_up_request("amira@omnishop.test", Some("Amira")))
            .await
            .unwrap();

        let updated = service
            .update_preferences(
                &session.seller.id,
                &UpdatePreferencesRequest {
                    store_name: Some("My Store".to_string()),
                    stock_notifications: Some(false),
                    ..UpdatePreferencesRequest::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.preferences.store_name.as_deref(), Some("My Store"));
        assert!(!updated.preferences.stock_notifications);
        // Untouched fields survive.
        assert_eq!(updated.display_name, "Amira");
        assert!(updated.preferences.email_notifications);
    }

    #[tokio::test]
    async fn test_onboarding_sets_flags_once() {
        let db = test_db().await;
        let service = SellerService::new(db);
        let session = service
            .sign_up(&sign_up_request("amira@omnishop.test", None))
            .await
            .unwrap();

        let updated = service
            .complete_onboarding(
                &session.seller.id,
                &OnboardingRequest {
                    sales_platform: "whatsapp".to_string(),
                    main_focus: "stock".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(updated.preferences.onboarding_completed);
        assert_eq!(updated.preferences.sales_platform.as_deref(), Some("whatsapp"));
        assert_eq!(updated.preferences.main_focus.as_deref(), Some("stock"));

        let err = service
            .complete_onboarding(
                &session.seller.id,
                &OnboardingRequest {
                    sales_platform: "".to_string(),
                    main_focus: "stock".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_weak_password_and_bad_email_rejected() {
        let db = test_db().await;
        let service = SellerService::new(db);

        let mut weak = sign_up_request("amira@omnishop.test", None);
        weak.password = "short".to_string();
        assert!(matches!(
            service.sign_up(&weak).await.unwrap_err(),
            ApiError::Validation(_)
        ));

        assert!(matches!(
            service
                .sign_up(&sign_up_request("not-an-email", None))
                .await
                .unwrap_err(),
            ApiError::Validation(_)
        ));
    }
}
