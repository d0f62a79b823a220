//! Order book queries and order placement.

use crate::auth::AuthenticatedParty;
use crate::error::AppError;
use crate::models::{OrderInfo, PlaceOrderRequest};
use crate::orderbook::OrderBookError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

/// Query parameters selecting a trading pair. Both are required; axum
/// rejects requests missing either with a 400.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookParams {
    pub base_symbol: String,
    pub quote_symbol: String,
}

/// GET /orders - the live order book for one trading pair. No auth: the
/// book is public.
pub async fn get_order_book(
    State(state): State<AppState>,
    Query(params): Query<OrderBookParams>,
) -> Result<Json<Vec<OrderInfo>>, AppError> {
    tracing::info!(
        base_symbol = %params.base_symbol,
        quote_symbol = %params.quote_symbol,
        "fetching order book"
    );

    let orders = state
        .orderbook
        .get_order_book(&params.base_symbol, &params.quote_symbol)
        .await
        .map_err(|err| {
            tracing::error!(
                base_symbol = %params.base_symbol,
                quote_symbol = %params.quote_symbol,
                error = %err,
                "order book query failed"
            );
            AppError::from(err)
        })?;

    Ok(Json(orders))
}

/// POST /orders - precondition-checked order placement. The response body
/// is the created order's contract id as a JSON string.
pub async fn place_order(
    State(state): State<AppState>,
    user: AuthenticatedParty,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<Json<String>, AppError> {
    tracing::info!(
        trader = %user.party,
        order_type = %request.order_type,
        base_symbol = %request.base_symbol,
        quote_symbol = %request.quote_symbol,
        price = %request.price,
        quantity = %request.quantity,
        "placing order"
    );

    match state.orderbook.place_order(&user.party, &request).await {
        Ok(contract_id) => Ok(Json(contract_id)),
        Err(err @ OrderBookError::MissingExchange) => {
            tracing::warn!(trader = %user.party, error = %err, "order rejected by precondition");
            Err(err.into())
        }
        Err(err) => {
            tracing::error!(trader = %user.party, error = %err, "order placement failed");
            Err(err.into())
        }
    }
}
