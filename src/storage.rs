//! Run history persistence.
//!
//! A narrow key-value-style store over SQLite: save a finished run, list
//! past runs, delete one. Capacity is bounded: saving beyond
//! `MAX_HISTORY_RECORDS` evicts the oldest records by insertion order.
//! History is plumbing around the probe core: a failed write is the
//! caller's to log, never a reason to fail a run.

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Row, SqlitePool};
use std::path::Path;

use crate::config::MAX_HISTORY_RECORDS;
use crate::models::RunSummary;

/// One persisted run, as stored in the `run_history` table.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub created_at_ms: i64,
    pub proxy: Option<String>,
    pub total_count: i64,
    pub success_count: i64,
    pub failed_count: i64,
    pub valid_playlist_count: i64,
    pub results_json: String,
}

/// Opens (creating if missing) the history database at `path`.
pub async fn init_db_pool_with_path(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Applies the schema idempotently.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS run_history (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             created_at_ms INTEGER NOT NULL,
             proxy TEXT,
             total_count INTEGER NOT NULL,
             success_count INTEGER NOT NULL,
             failed_count INTEGER NOT NULL,
             valid_playlist_count INTEGER NOT NULL,
             results_json TEXT NOT NULL
         )",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_run_history_created_at
         ON run_history (created_at_ms DESC)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Saves a finished run, evicting the oldest records beyond capacity.
///
/// Returns the new record's id.
pub async fn save_run_record(
    pool: &SqlitePool,
    summary: &RunSummary,
    proxy: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let results_json =
        serde_json::to_string(&summary.results).unwrap_or_else(|_| "[]".to_string());
    let created_at_ms = chrono::Utc::now().timestamp_millis();

    let inserted = sqlx::query(
        "INSERT INTO run_history
             (created_at_ms, proxy, total_count, success_count, failed_count,
              valid_playlist_count, results_json)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(created_at_ms)
    .bind(proxy)
    .bind(summary.total_count as i64)
    .bind(summary.success_count as i64)
    .bind(summary.failed_count as i64)
    .bind(summary.valid_playlist_count as i64)
    .bind(&results_json)
    .execute(pool)
    .await?;

    sqlx::query(
        "DELETE FROM run_history
         WHERE id NOT IN (
             SELECT id FROM run_history
             ORDER BY created_at_ms DESC, id DESC
             LIMIT ?
         )",
    )
    .bind(MAX_HISTORY_RECORDS)
    .execute(pool)
    .await?;

    Ok(inserted.last_insert_rowid())
}

/// Lists stored runs, most recent first.
pub async fn query_run_history(pool: &SqlitePool) -> Result<Vec<RunRecord>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT id, created_at_ms, proxy, total_count, success_count,
                failed_count, valid_playlist_count, results_json
         FROM run_history
         ORDER BY created_at_ms DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| RunRecord {
            id: row.get("id"),
            created_at_ms: row.get("created_at_ms"),
            proxy: row.get("proxy"),
            total_count: row.get("total_count"),
            success_count: row.get("success_count"),
            failed_count: row.get("failed_count"),
            valid_playlist_count: row.get("valid_playlist_count"),
            results_json: row.get("results_json"),
        })
        .collect())
}

/// Deletes one stored run. Returns whether a record existed.
pub async fn delete_run_record(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM run_history WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
