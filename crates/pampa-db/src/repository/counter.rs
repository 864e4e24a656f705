//! # Counter Repository
//!
//! Atomic document counters. One row per counter; the remito sequence is the
//! only one seeded today.
//!
//! ## Why Not Read-Then-Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Terminal A: SELECT value → 41          Terminal B: SELECT value → 41  │
//! │  Terminal A: UPDATE value = 42          Terminal B: UPDATE value = 42  │
//! │                                                                         │
//! │  Both sales print remito 0001-00000042. Duplicate fiscal document.     │
//! │                                                                         │
//! │  Instead, one statement does both steps:                               │
//! │                                                                         │
//! │      UPDATE counters SET value = value + 1                             │
//! │      WHERE name = ?1                                                   │
//! │      RETURNING value                                                   │
//! │                                                                         │
//! │  SQLite serializes writers, so N concurrent calls return exactly       │
//! │  {last+1, ..., last+N} with no duplicates and no gaps.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Counter name for remito (delivery note) numbers.
pub const REMITO_COUNTER: &str = "remito";

/// Repository for shared document counters.
#[derive(Debug, Clone)]
pub struct CounterRepository {
    pool: SqlitePool,
}

impl CounterRepository {
    /// Creates a new CounterRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CounterRepository { pool }
    }

    /// Increments a counter and returns the new value.
    ///
    /// Seeds the counter at 0 on first use, so the first value handed out
    /// is 1. The increment-and-read is a single statement; concurrent
    /// callers always receive distinct values.
    pub async fn next(&self, name: &str) -> DbResult<i64> {
        sqlx::query("INSERT OR IGNORE INTO counters (name, value) VALUES (?1, 0)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        let value: i64 =
            sqlx::query_scalar("UPDATE counters SET value = value + 1 WHERE name = ?1 RETURNING value")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;

        debug!(counter = %name, value = %value, "Issued counter value");

        Ok(value)
    }

    /// Issues the next remito sequence number.
    pub async fn next_remito_number(&self) -> DbResult<u64> {
        let value = self.next(REMITO_COUNTER).await?;
        Ok(value as u64)
    }

    /// Reads a counter's current value without incrementing it.
    ///
    /// Unknown counters read as 0, matching what [`next`](Self::next) would
    /// seed them with.
    pub async fn current(&self, name: &str) -> DbResult<i64> {
        let value: Option<i64> = sqlx::query_scalar("SELECT value FROM counters WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value.unwrap_or(0))
    }
}
