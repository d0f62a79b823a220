//! In-memory projection store for tests and local development.
//!
//! Rows are keyed by template name and a query is dispatched on the
//! `active('<template>')` view it addresses. Equality filters in the WHERE
//! clause are not emulated; assertions about filtering go through the
//! recorded call log instead. Failures can be injected per template or for
//! the store as a whole.

use super::{ContractRow, Pqs, PqsError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// A recorded `query` invocation: the SQL text and its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub sql: String,
    pub params: Vec<String>,
}

#[derive(Default)]
pub struct InMemoryPqs {
    rows: Mutex<HashMap<String, Vec<ContractRow>>>,
    failing_templates: Mutex<HashSet<String>>,
    unreachable: AtomicBool,
    calls: Mutex<Vec<RecordedQuery>>,
}

impl InMemoryPqs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload one active contract row for a template.
    pub fn insert(&self, template: &str, row: ContractRow) {
        lock(&self.rows)
            .entry(template.to_string())
            .or_default()
            .push(row);
    }

    /// Make every query against `template` fail.
    pub fn fail_template(&self, template: &str) {
        lock(&self.failing_templates).insert(template.to_string());
    }

    /// Make every query and ping fail, as if the store were down.
    pub fn set_unreachable(&self) {
        self.unreachable.store(true, Ordering::SeqCst);
    }

    /// All `query` calls seen so far, oldest first.
    pub fn recorded(&self) -> Vec<RecordedQuery> {
        lock(&self.calls).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Extract the template name from the first `active('...')` view in the SQL.
fn template_of(sql: &str) -> Option<&str> {
    let start = sql.find("active('")? + "active('".len();
    let rest = &sql[start..];
    let end = rest.find('\'')?;
    Some(&rest[..end])
}

#[async_trait]
impl Pqs for InMemoryPqs {
    async fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<ContractRow>, PqsError> {
        lock(&self.calls).push(RecordedQuery {
            sql: sql.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
        });

        if self.unreachable.load(Ordering::SeqCst) {
            return Err(PqsError::Store("connection refused".to_string()));
        }

        let template = template_of(sql)
            .ok_or_else(|| PqsError::Store(format!("no active(...) view in query: {sql}")))?;

        if lock(&self.failing_templates).contains(template) {
            return Err(PqsError::Store(format!("injected failure for {template}")));
        }

        let mut out = lock(&self.rows).get(template).cloned().unwrap_or_default();

        if sql.contains("LIMIT 1") {
            out.truncate(1);
        }

        Ok(out)
    }

    async fn ping(&self) -> Result<(), PqsError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(PqsError::Store("connection refused".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_template_name_from_active_view() {
        let sql = "SELECT contract_id, payload FROM active('OrderBook:Token') WHERE 1 = 1";
        assert_eq!(template_of(sql), Some("OrderBook:Token"));
        assert_eq!(template_of("SELECT 1"), None);
    }

    #[tokio::test]
    async fn dispatches_rows_by_template_and_records_calls() {
        let pqs = InMemoryPqs::new();
        pqs.insert(
            "OrderBook:Token",
            ContractRow::new("cid-1", json!({ "symbol": "BTC" })),
        );

        let rows = pqs
            .query(
                "SELECT contract_id, payload FROM active('OrderBook:Token') WHERE payload->>'owner' = $1",
                &["alice"],
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].contract_id, "cid-1");

        let empty = pqs
            .query(
                "SELECT contract_id, payload FROM active('OrderBook:BuyOrder')",
                &[],
            )
            .await
            .unwrap();
        assert!(empty.is_empty());

        let calls = pqs.recorded();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].params, vec!["alice".to_string()]);
    }

    #[tokio::test]
    async fn honors_limit_one() {
        let pqs = InMemoryPqs::new();
        pqs.insert("OrderBook:Exchange", ContractRow::new("ex-1", json!({})));
        pqs.insert("OrderBook:Exchange", ContractRow::new("ex-2", json!({})));

        let rows = pqs
            .query(
                "SELECT contract_id, payload FROM active('OrderBook:Exchange') LIMIT 1",
                &[],
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].contract_id, "ex-1");
    }

    #[tokio::test]
    async fn unreachable_store_fails_queries_and_pings() {
        let pqs = InMemoryPqs::new();
        pqs.set_unreachable();

        assert!(pqs.ping().await.is_err());
        let result = pqs
            .query("SELECT contract_id, payload FROM active('OrderBook:Token')", &[])
            .await;
        assert!(matches!(result, Err(PqsError::Store(_))));
    }
}
