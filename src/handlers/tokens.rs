//! Token holding queries.

use crate::auth::AuthenticatedParty;
use crate::error::AppError;
use crate::models::TokenInfo;
use crate::state::AppState;
use axum::{Json, extract::State};

/// GET /tokens - the caller's active token holdings.
pub async fn get_tokens(
    State(state): State<AppState>,
    user: AuthenticatedParty,
) -> Result<Json<Vec<TokenInfo>>, AppError> {
    tracing::info!(party = %user.party, "fetching token holdings");

    let tokens = state
        .orderbook
        .get_tokens(&user.party)
        .await
        .map_err(|err| {
            tracing::error!(party = %user.party, error = %err, "token query failed");
            AppError::from(err)
        })?;

    Ok(Json(tokens))
}
