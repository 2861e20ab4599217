//! Catalog query execution.
//!
//! Runs a catalog entry against the store and times it, independently of
//! the presentation layer.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::catalog::CatalogEntry;
use crate::db::{DatabaseClient, QueryResult};
use crate::error::{ReportError, Result};

/// Runs catalog entries against a database client.
pub struct QueryExecutor<'a> {
    db: &'a dyn DatabaseClient,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor.
    pub fn new(db: &'a dyn DatabaseClient) -> Self {
        Self { db }
    }

    /// Executes the entry's SQL. Each call yields a fresh result.
    pub async fn run(&self, entry: &CatalogEntry) -> Result<QueryOutcome> {
        debug!(query = entry.number, "Running catalog query");

        let start = Instant::now();
        let result = self.db.execute_query(entry.sql).await;
        let execution_time = start.elapsed();

        match result {
            Ok(result) => {
                debug!(
                    query = entry.number,
                    rows = result.row_count,
                    elapsed_ms = execution_time.as_millis() as u64,
                    "Catalog query finished"
                );
                Ok(QueryOutcome {
                    entry: entry.number,
                    result,
                    execution_time,
                })
            }
            Err(e) => {
                warn!(query = entry.number, error = %e, "Catalog query failed");
                match e {
                    ReportError::Query(_) => Err(e),
                    other => Err(ReportError::query(other.to_string())),
                }
            }
        }
    }
}

/// Successful query execution outcome.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// Menu number of the entry that produced the result.
    pub entry: usize,
    /// The query result.
    pub result: QueryResult,
    /// How long the query took to execute.
    pub execution_time: Duration,
}
