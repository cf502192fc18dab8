use crate::error::{ApiError, BuddyError};
use crate::plaid::LinkToken;
use crate::router::BuddyState;
use crate::types::link::{ExchangeRequest, ExchangeResponse, LinkTokenRequest};
use axum::{Json, body::Bytes, extract::State};
use serde::de::DeserializeOwned;

/// POST /api/create_link_token
pub async fn create_link_token(
    State(state): State<BuddyState>,
    body: Bytes,
) -> Result<Json<LinkToken>, ApiError> {
    let request: LinkTokenRequest = parse_body(&body)?;
    let token = state
        .links
        .create_link_token(request.user_id)
        .await
        .map_err(|e| ApiError::new("Failed to create link token", e))?;
    Ok(Json(token))
}

/// POST /api/exchange_and_create_accounts
///
/// Runs on its own task so a dropped connection does not abort writes already
/// in flight.
pub async fn exchange_and_create_accounts(
    State(state): State<BuddyState>,
    body: Bytes,
) -> Result<Json<ExchangeResponse>, ApiError> {
    let request: ExchangeRequest = parse_body(&body)?;
    let links = state.links.clone();
    let outcome = tokio::spawn(async move { links.exchange_and_persist(request).await })
        .await
        .map_err(BuddyError::from)
        .and_then(|res| res);

    outcome.map(Json).map_err(|e| match e {
        BuddyError::MissingFields(_) => ApiError::new("Missing required fields", e),
        other => ApiError::new("Failed to exchange token and create accounts", other),
    })
}

/// An empty body reads as `T::default()`; malformed JSON is a 400.
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::new("Invalid request body", BuddyError::InvalidBody(e.to_string())))
}
