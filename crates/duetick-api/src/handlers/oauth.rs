//! OAuth sign-in handlers.
//!
//! The flow is front-end driven: the client asks for the provider's
//! authorization URL, redirects the browser there, and finishes by
//! passing the callback code to this API in exchange for tokens.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use duetick_entity::user::OauthProvider;

use crate::dto::request::{OAuthAuthorizeQuery, OAuthCallbackQuery};
use crate::dto::response::{ApiResponse, LoginResponse, OAuthAuthorizeResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/auth/oauth/{provider}/authorize
pub async fn authorize(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<OAuthAuthorizeQuery>,
) -> Result<Json<ApiResponse<OAuthAuthorizeResponse>>, ApiError> {
    let provider: OauthProvider = provider.parse()?;

    let csrf_state = if query.state.is_empty() {
        Uuid::new_v4().simple().to_string()
    } else {
        query.state
    };

    let authorize_url = state.auth_service.oauth_authorize_url(provider, &csrf_state)?;

    Ok(Json(ApiResponse::ok(OAuthAuthorizeResponse {
        authorize_url,
        state: csrf_state,
    })))
}

/// GET /api/auth/oauth/{provider}/callback
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let provider: OauthProvider = provider.parse()?;

    tracing::debug!(
        provider = %provider,
        state_present = !query.state.is_empty(),
        "OAuth callback received"
    );

    let (user, tokens) = state.auth_service.oauth_login(provider, &query.code).await?;

    Ok(Json(ApiResponse::ok(LoginResponse::new(user, tokens))))
}
