//! SQLite connector for score and ledger records.
//!
//! Opens one read-only connection per call and never creates the database
//! file. Every string operation returns a JSON array, including on failure:
//! callers tell "error" from "no rows" only through the log. Rows decoded
//! before a faulty row are still returned.
//!
//! # Expected schema
//!
//! ```sql
//! CREATE TABLE Scores (StudentName TEXT, Score INTEGER);
//! CREATE TABLE DailyRecords (
//!     UserName TEXT, RecordDate TEXT, TypeName TEXT,
//!     ItemName TEXT, Amount INTEGER, Remark TEXT
//! );
//! ```

use serde::Serialize;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{ConnectOptions, Connection, Row};
use std::path::{Path, PathBuf};
use tracing::{error, warn};

use crate::error::SourceError;
use crate::fsutil::source_exists;
use crate::models::{LedgerRecord, ScoreRecord};

const SCORES_SQL: &str = "SELECT StudentName, Score FROM Scores";
const LEDGER_SQL: &str =
    "SELECT UserName, RecordDate, TypeName, ItemName, Amount, Remark FROM DailyRecords";

#[derive(Debug, Clone)]
pub struct RelationalConnector {
    path: PathBuf,
}

impl RelationalConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn open(&self) -> Result<SqliteConnection, SourceError> {
        if !source_exists(&self.path).await {
            return Err(SourceError::NotFound(self.path.clone()));
        }
        SqliteConnectOptions::new()
            .filename(&self.path)
            .read_only(true)
            .create_if_missing(false)
            .connect()
            .await
            .map_err(|e| self.db_error(e))
    }

    fn db_error(&self, err: sqlx::Error) -> SourceError {
        match err {
            sqlx::Error::Io(e) => SourceError::from_io(&self.path, e),
            other => SourceError::Database {
                path: self.path.clone(),
                source: other,
            },
        }
    }

    /// Closes the connection; a failed close is logged and does not affect
    /// the records already read.
    async fn close(&self, conn: SqliteConnection) {
        if let Err(e) = conn.close().await {
            warn!(path = %self.path.display(), "failed to close database: {}", e);
        }
    }

    /// Maps rows in order, stopping at the first row that does not decode.
    fn map_rows<T>(
        &self,
        rows: &[SqliteRow],
        map: fn(&SqliteRow) -> Result<T, sqlx::Error>,
    ) -> Fetched<T> {
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match map(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    return Fetched {
                        records,
                        error: Some(self.db_error(e)),
                    }
                }
            }
        }
        Fetched {
            records,
            error: None,
        }
    }

    /// Every row of `Scores`, mapped positionally.
    pub async fn fetch_scores(&self) -> Fetched<ScoreRecord> {
        let mut conn = match self.open().await {
            Ok(conn) => conn,
            Err(e) => return Fetched::failed(e),
        };
        let fetched = match sqlx::query(SCORES_SQL).fetch_all(&mut conn).await {
            Ok(rows) => self.map_rows(&rows, score_from_row),
            Err(e) => Fetched::failed(self.db_error(e)),
        };
        self.close(conn).await;
        fetched
    }

    /// Rows of `DailyRecords`, restricted to `user_name` unless it is empty.
    ///
    /// An empty `user_name` means "no filter", so a user actually stored
    /// with an empty name cannot be selected on its own.
    pub async fn fetch_ledger(&self, user_name: &str) -> Fetched<LedgerRecord> {
        let mut conn = match self.open().await {
            Ok(conn) => conn,
            Err(e) => return Fetched::failed(e),
        };

        let rows = if user_name.is_empty() {
            sqlx::query(LEDGER_SQL).fetch_all(&mut conn).await
        } else {
            let sql = format!("{} WHERE UserName = ?", LEDGER_SQL);
            sqlx::query(&sql)
                .bind(user_name)
                .fetch_all(&mut conn)
                .await
        };
        let fetched = match rows {
            Ok(rows) => self.map_rows(&rows, ledger_from_row),
            Err(e) => Fetched::failed(self.db_error(e)),
        };
        self.close(conn).await;
        fetched
    }

    /// `ReadScores`: JSON array of [`ScoreRecord`].
    pub async fn read_scores(&self) -> String {
        let fetched = self.fetch_scores().await;
        self.to_json_array("ReadScores", fetched)
    }

    /// `ReadAllLedgerRecords`: same as `ReadUserLedgerRecords("")`.
    pub async fn read_all_ledger_records(&self) -> String {
        self.read_user_ledger_records("").await
    }

    /// `ReadUserLedgerRecords`: JSON array of [`LedgerRecord`].
    pub async fn read_user_ledger_records(&self, user_name: &str) -> String {
        let fetched = self.fetch_ledger(user_name).await;
        self.to_json_array("ReadUserLedgerRecords", fetched)
    }

    /// Logs the outcome and serializes whatever was read, so a fault after
    /// some rows still returns those rows.
    fn to_json_array<T: Serialize>(&self, operation: &str, fetched: Fetched<T>) -> String {
        let Fetched { records, error } = fetched;
        match &error {
            None if records.is_empty() => {
                warn!(path = %self.path.display(), operation, "no records found")
            }
            None => {}
            Some(e @ SourceError::NotFound(_)) => {
                warn!(path = %self.path.display(), operation, "database missing: {}", e)
            }
            Some(e) => error!(
                path = %self.path.display(),
                operation,
                kind = ?e.kind(),
                rows_read = records.len(),
                "{}",
                e
            ),
        }

        serde_json::to_string(&records).unwrap_or_else(|e| {
            error!(operation, "failed to serialize records: {}", e);
            "[]".to_string()
        })
    }
}

/// Outcome of one query: the rows decoded before the first fault, and that
/// fault if there was one.
#[derive(Debug)]
pub struct Fetched<T> {
    pub records: Vec<T>,
    pub error: Option<SourceError>,
}

impl<T> Fetched<T> {
    fn failed(error: SourceError) -> Self {
        Self {
            records: Vec::new(),
            error: Some(error),
        }
    }
}

/// Decodes column `index`, treating SQL `NULL` as a decode error instead of
/// letting it default to `""` or `0`.
fn non_null<'r, T>(row: &'r SqliteRow, index: usize) -> Result<T, sqlx::Error>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get::<Option<T>, _>(index)?
        .ok_or_else(|| sqlx::Error::ColumnDecode {
            index: index.to_string(),
            source: "unexpected NULL".into(),
        })
}

fn score_from_row(row: &SqliteRow) -> Result<ScoreRecord, sqlx::Error> {
    Ok(ScoreRecord {
        student_name: non_null(row, 0)?,
        score: non_null(row, 1)?,
    })
}

fn ledger_from_row(row: &SqliteRow) -> Result<LedgerRecord, sqlx::Error> {
    Ok(LedgerRecord {
        user_name: non_null(row, 0)?,
        record_date: non_null(row, 1)?,
        type_name: non_null(row, 2)?,
        item_name: non_null(row, 3)?,
        amount: non_null(row, 4)?,
        remark: non_null(row, 5)?,
    })
}
