//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `SummaryCacheService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use study_assistant_core::domain::StudentLevel;
use study_assistant_core::ports::{PortError, PortResult, SummaryCacheService};
use tracing::debug;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `SummaryCacheService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct SummaryRecord {
    summary_text: String,
    created_at: DateTime<Utc>,
}

//=========================================================================================
// `SummaryCacheService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SummaryCacheService for DbAdapter {
    async fn get_cached_summary(
        &self,
        document_id: Uuid,
        level: StudentLevel,
    ) -> PortResult<Option<String>> {
        let record = sqlx::query_as::<_, SummaryRecord>(
            "SELECT summary_text, created_at FROM summary_cache \
             WHERE document_id = $1 AND student_level = $2",
        )
        .bind(document_id)
        .bind(level.label())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(record.map(|r| {
            debug!(%document_id, cached_at = %r.created_at, "Found cached summary");
            r.summary_text
        }))
    }

    async fn save_summary(
        &self,
        document_id: Uuid,
        level: StudentLevel,
        summary_text: &str,
    ) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO summary_cache (document_id, student_level, summary_text) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (document_id, student_level) \
             DO UPDATE SET summary_text = EXCLUDED.summary_text, created_at = NOW()",
        )
        .bind(document_id)
        .bind(level.label())
        .bind(summary_text)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}
