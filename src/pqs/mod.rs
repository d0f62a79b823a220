//! Read-side access to the ledger projection store (PQS).
//!
//! The store materializes the currently-active contracts of each template
//! and is queried with SQL over `active('<Module>:<Template>')` views, with
//! payload fields addressed by JSON key. Callers own the SQL text; the store
//! only binds positional parameters and returns rows.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryPqs;
pub use postgres::PostgresPqs;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// One row of an `active(...)` view: the contract id plus its template payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractRow {
    pub contract_id: String,
    pub payload: Value,
}

impl ContractRow {
    pub fn new(contract_id: impl Into<String>, payload: Value) -> Self {
        Self {
            contract_id: contract_id.into(),
            payload,
        }
    }
}

/// Failures raised by the projection store.
#[derive(Debug, Error)]
pub enum PqsError {
    /// The store was unreachable or rejected the query.
    #[error("projection store error: {0}")]
    Store(String),

    /// The bounded query window elapsed before the store answered.
    #[error("projection store query timed out after {0:?}")]
    Timeout(Duration),
}

/// Queryable ledger projection.
///
/// `query` takes SQL text plus positional string parameters (`$1`..`$n`) and
/// resolves once the store has produced every matching row. `ping` is a cheap
/// connectivity probe for readiness checks.
#[async_trait]
pub trait Pqs: Send + Sync {
    async fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<ContractRow>, PqsError>;

    async fn ping(&self) -> Result<(), PqsError>;
}
