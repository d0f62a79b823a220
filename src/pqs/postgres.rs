//! sqlx-backed projection store client.

use super::{ContractRow, Pqs, PqsError};
use async_trait::async_trait;
use sqlx::{Row, postgres::PgPool};
use std::time::Duration;

/// Postgres client over the PQS schema.
///
/// Every round trip is bounded by `query_timeout`, so an unresponsive store
/// fails the request instead of parking it indefinitely. The pool is expected
/// to be lazy; this type never connects at construction time.
#[derive(Clone)]
pub struct PostgresPqs {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresPqs {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, sqlx::Error>> + Send,
    ) -> Result<T, PqsError> {
        tokio::time::timeout(self.query_timeout, fut)
            .await
            .map_err(|_| PqsError::Timeout(self.query_timeout))?
            .map_err(|err| PqsError::Store(err.to_string()))
    }
}

#[async_trait]
impl Pqs for PostgresPqs {
    async fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<ContractRow>, PqsError> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(*param);
        }

        let rows = self.bounded(query.fetch_all(&self.pool)).await?;

        rows.into_iter()
            .map(|row| {
                Ok(ContractRow {
                    contract_id: row
                        .try_get("contract_id")
                        .map_err(|err| PqsError::Store(err.to_string()))?,
                    payload: row
                        .try_get("payload")
                        .map_err(|err| PqsError::Store(err.to_string()))?,
                })
            })
            .collect()
    }

    async fn ping(&self) -> Result<(), PqsError> {
        self.bounded(sqlx::query("SELECT 1").execute(&self.pool))
            .await
            .map(|_| ())
    }
}
