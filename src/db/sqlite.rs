//! In-memory SQLite store built from the bundled data script.
//!
//! Provides the `SqliteClient` struct that implements the `DatabaseClient` trait
//! over a single in-memory connection using sqlx.

use crate::config::DataSource;
use crate::db::{ColumnInfo, DatabaseClient, QueryResult, Row, Value};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as _, Executor as _, Row as _, Statement as _, TypeInfo as _, ValueRef as _};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Maximum rows to return from a query.
const MAX_ROWS: usize = 1000;

/// Copy of `data/contratos.sql` compiled into the binary.
pub const BUNDLED_SCRIPT: &str = include_str!("../../data/contratos.sql");

/// Row count of one table created by the data script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub rows: i64,
}

/// SQLite client holding the one in-memory database of this process.
#[derive(Debug)]
pub struct SqliteClient {
    pool: SqlitePool,
    source: Option<PathBuf>,
}

impl SqliteClient {
    /// Loads the store from a resolved data source.
    pub async fn load(source: &DataSource) -> Result<Self> {
        match source {
            DataSource::File(path) => Self::load_script(path).await,
            DataSource::Bundled => Self::from_script(BUNDLED_SCRIPT).await,
        }
    }

    /// Reads the script at `path` and loads it into a fresh in-memory store.
    ///
    /// A missing or unreadable file and a malformed script both fail with
    /// `ReportError::Script`; nothing is retried.
    pub async fn load_script(path: &Path) -> Result<Self> {
        let script = std::fs::read_to_string(path).map_err(|e| {
            error!("Failed to read data script {}: {e}", path.display());
            ReportError::script(format!("Failed to read {}: {e}", path.display()))
        })?;

        let mut client = Self::from_script(&script).await?;
        client.source = Some(path.to_path_buf());
        Ok(client)
    }

    /// Loads already-read script text into a fresh in-memory store.
    ///
    /// The whole script runs inside one transaction, so a failing statement
    /// leaves nothing behind.
    pub async fn from_script(script: &str) -> Result<Self> {
        let start = Instant::now();
        let pool = Self::open_memory_pool().await?;

        let mut tx = pool
            .begin()
            .await
            .map_err(|e| ReportError::script(format!("Failed to start load transaction: {e}")))?;

        if let Err(e) = sqlx::raw_sql(script).execute(&mut *tx).await {
            error!("Data script failed: {e}");
            drop(tx);
            pool.close().await;
            return Err(ReportError::script(format!(
                "Malformed data script: {}",
                format_query_error(e)
            )));
        }

        tx.commit()
            .await
            .map_err(|e| ReportError::script(format!("Failed to commit data script: {e}")))?;

        let client = Self { pool, source: None };
        let tables = client.tables().await?;
        info!(
            "Loaded data script: {} tables in {:?}",
            tables.len(),
            start.elapsed()
        );

        Ok(client)
    }

    /// Opens a pool pinned to exactly one connection that is never recycled,
    /// since an in-memory database lives and dies with its connection.
    async fn open_memory_pool() -> Result<SqlitePool> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| ReportError::internal(format!("Invalid in-memory options: {e}")))?
            .foreign_keys(true);

        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| ReportError::internal(format!("Failed to open in-memory store: {e}")))
    }

    /// Path of the script this store was loaded from, if loaded from a file.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Names of the user tables created by the data script.
    pub async fn tables(&self) -> Result<Vec<String>> {
        sqlx::query_scalar(
            r#"
            SELECT name
            FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ReportError::query(format!("Failed to list tables: {e}")))
    }

    /// Counts the rows of one table.
    pub async fn row_count(&self, table: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", table.replace('"', "\"\""));
        sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ReportError::query(format!("Failed to count rows of {table}: {e}")))
    }

    /// Row counts for every table, in name order.
    pub async fn summary(&self) -> Result<Vec<TableSummary>> {
        let mut summary = Vec::new();
        for name in self.tables().await? {
            let rows = self.row_count(&name).await?;
            summary.push(TableSummary { name, rows });
        }
        Ok(summary)
    }
}

#[async_trait]
impl DatabaseClient for SqliteClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();

        // Column metadata comes from the prepared statement so it is known
        // even when the query matches no rows.
        let statement = self
            .pool
            .prepare(sql)
            .await
            .map_err(|e| ReportError::query(format_query_error(e)))?;

        let columns: Vec<ColumnInfo> = statement
            .columns()
            .iter()
            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
            .collect();

        let mut stream = statement.query().fetch(&self.pool);
        let mut rows: Vec<Row> = Vec::new();
        let mut total_rows = 0usize;

        while let Some(row) = stream
            .try_next()
            .await
            .map_err(|e| ReportError::query(format_query_error(e)))?
        {
            total_rows += 1;
            if rows.len() < MAX_ROWS {
                rows.push(convert_row(&row));
            }
        }

        let execution_time = start.elapsed();
        let was_truncated = total_rows > MAX_ROWS;

        if was_truncated {
            warn!(
                "Query returned {} rows, truncating to {} rows",
                total_rows, MAX_ROWS
            );
        }
        debug!("Query returned {} rows in {:?}", total_rows, execution_time);

        let row_count = rows.len();

        Ok(QueryResult {
            columns,
            rows,
            execution_time,
            row_count,
            total_rows: Some(total_rows),
            was_truncated,
        })
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Extracts the engine message from a sqlx error.
fn format_query_error(e: sqlx::Error) -> String {
    match e {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        other => other.to_string(),
    }
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    (0..row.columns().len())
        .map(|i| convert_value(row, i))
        .collect()
}

/// Converts a single cell by the storage class of the value itself, not the
/// declared column type; computed columns have no declared type.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let class = match row.try_get_raw(index) {
        Ok(raw) if !raw.is_null() => raw.type_info().name().to_uppercase(),
        _ => return Value::Null,
    };

    let value = match class.as_str() {
        "INTEGER" => row.try_get_unchecked::<i64, _>(index).map(Value::Integer),
        "REAL" => row.try_get_unchecked::<f64, _>(index).map(Value::Real),
        "BLOB" => row.try_get_unchecked::<Vec<u8>, _>(index).map(Value::Blob),
        _ => row.try_get_unchecked::<String, _>(index).map(Value::Text),
    };
    value.unwrap_or(Value::Null)
}
