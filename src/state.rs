//! Shared application state, assembled once at startup and injected into
//! every handler.

use crate::auth::PartyResolver;
use crate::orderbook::OrderBookService;
use crate::pqs::Pqs;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orderbook: Arc<OrderBookService>,
    pub pqs: Arc<dyn Pqs>,
    pub resolver: Arc<PartyResolver>,
}

impl AppState {
    pub fn new(pqs: Arc<dyn Pqs>, resolver: PartyResolver) -> Self {
        Self {
            orderbook: Arc::new(OrderBookService::new(pqs.clone())),
            pqs,
            resolver: Arc::new(resolver),
        }
    }
}
