//! Mock database clients for testing.
//!
//! Provide canned results and canned failures for exercising the
//! presentation layer without loading the data script.

use super::{ColumnInfo, DatabaseClient, QueryResult, Value};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A mock database client that returns the same predefined result for every query.
pub struct MockDatabaseClient {
    result: QueryResult,
    executions: AtomicUsize,
}

impl MockDatabaseClient {
    /// Creates a mock client returning a single-row, single-column result.
    pub fn new() -> Self {
        let columns = vec![ColumnInfo::new("result", "TEXT")];
        let rows = vec![vec![Value::Text("mock".to_string())]];
        Self::with_result(
            QueryResult::with_data(columns, rows).with_execution_time(Duration::from_millis(1)),
        )
    }

    /// Creates a mock client returning the given result.
    pub fn with_result(result: QueryResult) -> Self {
        Self {
            result,
            executions: AtomicUsize::new(0),
        }
    }

    /// Number of queries executed so far.
    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A database client whose every query fails with the given message.
pub struct FailingDatabaseClient {
    message: String,
}

impl FailingDatabaseClient {
    /// Creates a failing client.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(ReportError::query(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
