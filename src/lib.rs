//! HTTP gateway for a Canton order book exchange.
//!
//! Serves token holdings and the live order book out of the ledger's
//! Participant Query Store (PQS) projection, and fronts order placement with
//! its exchange precondition check. The ledger is the only source of truth;
//! every response is a point-in-time read of currently-active contracts.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod orderbook;
pub mod pqs;
pub mod router;
pub mod state;
