//! Sign-up, sign-in, session read, and preference updates.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use tracing::info;

use crate::auth::{bearer_token, CurrentSeller};
use crate::error::ApiError;
use crate::state::AppState;
use shared::{
    OnboardingRequest, SellerProfile, SessionResponse, SignInRequest, SignUpRequest,
    UpdatePreferencesRequest,
};

pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    info!("POST /api/auth/signup");
    Ok(Json(state.sellers.sign_up(&request).await?))
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    info!("POST /api/auth/signin");
    Ok(Json(state.sellers.sign_in(&request).await?))
}

pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(), ApiError> {
    info!("POST /api/auth/signout");
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or(ApiError::Unauthorized)?;
    state.sellers.sign_out(token).await
}

pub async fn session(seller: CurrentSeller) -> Json<SellerProfile> {
    info!("GET /api/auth/session for {}", seller.id);
    Json(SellerProfile {
        id: seller.id,
        email: seller.email,
        display_name: seller.display_name,
        preferences: seller.preferences,
    })
}

pub async fn update_preferences(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Json(request): Json<UpdatePreferencesRequest>,
) -> Result<Json<SellerProfile>, ApiError> {
    info!("PUT /api/auth/preferences for {}", seller.id);
    Ok(Json(
        state.sellers.update_preferences(&seller.id, &request).await?,
    ))
}

pub async fn complete_onboarding(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Json(request): Json<OnboardingRequest>,
) -> Result<Json<SellerProfile>, ApiError> {
    info!("POST /api/auth/onboarding for {}", seller.id);
    Ok(Json(
        state.sellers.complete_onboarding(&seller.id, &request).await?,
    ))
}
