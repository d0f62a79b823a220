//! Wire-level records served by the gateway.
//!
//! Field names follow the ledger template payloads (camelCase on the wire).
//! Numeric ledger values stay decimal strings end to end; nothing here round
//! trips through floats.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A ledger party identifier, as resolved from a caller credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Party(String);

impl Party {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of the book an order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One active token holding, read from the `OrderBook:Token` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub issuer: String,
    pub owner: String,
    pub symbol: String,
    /// Decimal string, passed through from the ledger payload untouched.
    pub amount: String,
    pub contract_id: String,
}

/// One active order on the book, tagged with the side it was read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInfo {
    pub exchange: String,
    pub trader: String,
    pub base_symbol: String,
    pub quote_symbol: String,
    pub price: String,
    pub quantity: String,
    pub collateral_cid: String,
    pub contract_id: String,
    pub order_type: OrderSide,
}

/// Caller-supplied order intent; not yet a ledger entity, so no contract id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub order_type: OrderSide,
    pub base_symbol: String,
    pub quote_symbol: String,
    pub price: String,
    pub quantity: String,
    pub collateral_cid: String,
}
