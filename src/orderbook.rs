//! Order book read operations over the ledger projection.
//!
//! Translates read requests into parameterized SQL against the `active(...)`
//! views, runs the two book sides concurrently, and maps payload rows into
//! wire records. Order placement performs the exchange precondition lookup
//! only; ledger submission is not wired up yet.

use crate::models::{OrderInfo, OrderSide, Party, PlaceOrderRequest, TokenInfo};
use crate::pqs::{ContractRow, Pqs, PqsError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Sentinel contract id returned by the stubbed placement path.
pub const PLACEHOLDER_ORDER_ID: &str = "placeholder-order-id";

const TOKEN_TEMPLATE: &str = "OrderBook:Token";
const BUY_ORDER_TEMPLATE: &str = "OrderBook:BuyOrder";
const SELL_ORDER_TEMPLATE: &str = "OrderBook:SellOrder";

const TOKENS_BY_OWNER_SQL: &str = "SELECT contract_id, payload \
     FROM active('OrderBook:Token') \
     WHERE payload->>'owner' = $1 \
     ORDER BY payload->>'symbol', contract_id";

const BUY_ORDERS_SQL: &str = "SELECT contract_id, payload \
     FROM active('OrderBook:BuyOrder') \
     WHERE payload->>'baseSymbol' = $1 AND payload->>'quoteSymbol' = $2 \
     ORDER BY CAST(payload->>'price' AS DECIMAL) DESC";

const SELL_ORDERS_SQL: &str = "SELECT contract_id, payload \
     FROM active('OrderBook:SellOrder') \
     WHERE payload->>'baseSymbol' = $1 AND payload->>'quoteSymbol' = $2 \
     ORDER BY CAST(payload->>'price' AS DECIMAL) ASC";

const ACTIVE_EXCHANGE_SQL: &str =
    "SELECT contract_id, payload FROM active('OrderBook:Exchange') LIMIT 1";

/// Failures raised by order book operations.
#[derive(Debug, Error)]
pub enum OrderBookError {
    /// Infrastructure: the projection store failed or timed out.
    #[error(transparent)]
    Store(#[from] PqsError),

    /// Precondition: placement requires an active Exchange contract.
    #[error("no active Exchange contract found")]
    MissingExchange,

    /// A projected payload did not have the shape its template promises.
    #[error("malformed {template} payload on {contract_id}: {source}")]
    Payload {
        template: &'static str,
        contract_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// A projected price field was not a decimal string.
    #[error("{template} contract {contract_id} has non-decimal price {price:?}")]
    InvalidDecimal {
        template: &'static str,
        contract_id: String,
        price: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPayload {
    issuer: String,
    owner: String,
    symbol: String,
    amount: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderPayload {
    exchange: String,
    trader: String,
    base_symbol: String,
    quote_symbol: String,
    price: String,
    quantity: String,
    collateral_cid: String,
}

/// Read-side query composer for the order book API.
pub struct OrderBookService {
    pqs: Arc<dyn Pqs>,
}

impl OrderBookService {
    pub fn new(pqs: Arc<dyn Pqs>) -> Self {
        Self { pqs }
    }

    /// All currently-active token holdings of `owner`, ordered by symbol and
    /// then contract id. Owning nothing is an empty list, not an error.
    pub async fn get_tokens(&self, owner: &Party) -> Result<Vec<TokenInfo>, OrderBookError> {
        let rows = self
            .pqs
            .query(TOKENS_BY_OWNER_SQL, &[owner.as_str()])
            .await?;
        rows.into_iter().map(map_token).collect()
    }

    /// The active book for one trading pair: buys best-first (price
    /// descending), then sells best-first (price ascending).
    ///
    /// Both side queries run concurrently. If either side fails the whole
    /// operation fails; a partial book is never returned.
    pub async fn get_order_book(
        &self,
        base_symbol: &str,
        quote_symbol: &str,
    ) -> Result<Vec<OrderInfo>, OrderBookError> {
        let params = [base_symbol, quote_symbol];
        let (buy_rows, sell_rows) = tokio::try_join!(
            self.pqs.query(BUY_ORDERS_SQL, &params),
            self.pqs.query(SELL_ORDERS_SQL, &params),
        )?;

        let mut book = sorted_side(buy_rows, OrderSide::Buy)?;
        book.extend(sorted_side(sell_rows, OrderSide::Sell)?);
        Ok(book)
    }

    /// Check the placement precondition and return the placeholder id.
    ///
    /// Placement requires an active Exchange contract; without one the call
    /// fails before anything is submitted. The exercise against the ledger
    /// is not implemented, so a fixed sentinel stands in for the contract id
    /// of the created order.
    pub async fn place_order(
        &self,
        trader: &Party,
        request: &PlaceOrderRequest,
    ) -> Result<String, OrderBookError> {
        let exchanges = self.pqs.query(ACTIVE_EXCHANGE_SQL, &[]).await?;
        let Some(exchange) = exchanges.first() else {
            return Err(OrderBookError::MissingExchange);
        };

        tracing::warn!(
            exchange_cid = %exchange.contract_id,
            trader = %trader,
            order_type = %request.order_type,
            base_symbol = %request.base_symbol,
            quote_symbol = %request.quote_symbol,
            "order placement is not wired to ledger submission, returning placeholder id"
        );
        Ok(PLACEHOLDER_ORDER_ID.to_string())
    }
}

fn map_token(row: ContractRow) -> Result<TokenInfo, OrderBookError> {
    let payload: TokenPayload = serde_json::from_value(row.payload).map_err(|source| {
        OrderBookError::Payload {
            template: TOKEN_TEMPLATE,
            contract_id: row.contract_id.clone(),
            source,
        }
    })?;

    Ok(TokenInfo {
        issuer: payload.issuer,
        owner: payload.owner,
        symbol: payload.symbol,
        amount: payload.amount,
        contract_id: row.contract_id,
    })
}

/// Map one side's rows and stable-sort them by exact decimal price, best
/// price first for the given side. Equal prices keep the store's row order.
fn sorted_side(
    rows: Vec<ContractRow>,
    side: OrderSide,
) -> Result<Vec<OrderInfo>, OrderBookError> {
    let template = match side {
        OrderSide::Buy => BUY_ORDER_TEMPLATE,
        OrderSide::Sell => SELL_ORDER_TEMPLATE,
    };

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let payload: OrderPayload = serde_json::from_value(row.payload).map_err(|source| {
            OrderBookError::Payload {
                template,
                contract_id: row.contract_id.clone(),
                source,
            }
        })?;

        let price: Decimal =
            payload
                .price
                .parse()
                .map_err(|_| OrderBookError::InvalidDecimal {
                    template,
                    contract_id: row.contract_id.clone(),
                    price: payload.price.clone(),
                })?;

        entries.push((
            price,
            OrderInfo {
                exchange: payload.exchange,
                trader: payload.trader,
                base_symbol: payload.base_symbol,
                quote_symbol: payload.quote_symbol,
                price: payload.price,
                quantity: payload.quantity,
                collateral_cid: payload.collateral_cid,
                contract_id: row.contract_id,
                order_type: side,
            },
        ));
    }

    match side {
        OrderSide::Buy => entries.sort_by(|a, b| b.0.cmp(&a.0)),
        OrderSide::Sell => entries.sort_by(|a, b| a.0.cmp(&b.0)),
    }

    Ok(entries.into_iter().map(|(_, order)| order).collect())
}
