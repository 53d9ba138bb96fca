//! Draft persistence — rehydrating a session that lost its in-memory
//! state.
//!
//! One row per session holding the same flat field→value mapping as the
//! answer store, plus the resolved major and the step the applicant was
//! on.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::DraftError;
use crate::questions::Major;
use crate::wizard::state::WizardStep;
use crate::wizard::store::AnswerStore;

/// Persisted snapshot of one registration session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRecord {
    pub answers: AnswerStore,
    pub major: Option<Major>,
    pub step: WizardStep,
    pub updated_at: DateTime<Utc>,
}

impl DraftRecord {
    pub fn new(answers: AnswerStore, major: Option<Major>, step: WizardStep) -> Self {
        Self {
            answers,
            major,
            step,
            updated_at: Utc::now(),
        }
    }
}

/// Backend-agnostic draft persistence.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Save (or overwrite) the draft for a session.
    async fn save_draft(&self, session: &str, draft: &DraftRecord) -> Result<(), DraftError>;

    /// Load a session's draft, if one exists.
    async fn load_draft(&self, session: &str) -> Result<Option<DraftRecord>, DraftError>;

    /// Remove a session's draft (after a successful submission).
    async fn delete_draft(&self, session: &str) -> Result<(), DraftError>;
}

/// libSQL draft backend. Supports local file and in-memory databases.
pub struct LibSqlDraftStore {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlDraftStore {
    /// Open (or create) a local database file and init the schema.
    pub async fn new_local(path: &Path) -> Result<Self, DraftError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DraftError::Pool(format!("Failed to create database directory: {e}")))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DraftError::Pool(format!("Failed to open libSQL database: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| DraftError::Pool(format!("Failed to create connection: {e}")))?;

        let store = Self {
            db: Arc::new(db),
            conn,
        };
        store.init_schema().await?;
        info!(path = %path.display(), "Draft database opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DraftError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| DraftError::Pool(format!("Failed to create in-memory database: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| DraftError::Pool(format!("Failed to create connection: {e}")))?;

        let store = Self {
            db: Arc::new(db),
            conn,
        };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), DraftError> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS drafts (
                    session    TEXT PRIMARY KEY,
                    payload    TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
                (),
            )
            .await
            .map_err(|e| DraftError::Query(format!("Failed to create drafts table: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl DraftStore for LibSqlDraftStore {
    async fn save_draft(&self, session: &str, draft: &DraftRecord) -> Result<(), DraftError> {
        let payload = serde_json::to_string(draft)
            .map_err(|e| DraftError::Serialization(e.to_string()))?;

        self.conn
            .execute(
                "INSERT INTO drafts (session, payload, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(session) DO UPDATE SET
                     payload = excluded.payload,
                     updated_at = excluded.updated_at",
                params![session, payload, draft.updated_at.to_rfc3339()],
            )
            .await
            .map_err(|e| DraftError::Query(format!("Failed to save draft: {e}")))?;
        Ok(())
    }

    async fn load_draft(&self, session: &str) -> Result<Option<DraftRecord>, DraftError> {
        let mut rows = self
            .conn
            .query(
                "SELECT payload FROM drafts WHERE session = ?1",
                params![session],
            )
            .await
            .map_err(|e| DraftError::Query(format!("Failed to load draft: {e}")))?;

        let Some(row) = rows
            .next()
            .await
            .map_err(|e| DraftError::Query(format!("Failed to read draft row: {e}")))?
        else {
            return Ok(None);
        };

        let payload: String = row
            .get(0)
            .map_err(|e| DraftError::Query(format!("Failed to read draft payload: {e}")))?;
        let draft = serde_json::from_str(&payload)
            .map_err(|e| DraftError::Serialization(e.to_string()))?;
        Ok(Some(draft))
    }

    async fn delete_draft(&self, session: &str) -> Result<(), DraftError> {
        self.conn
            .execute("DELETE FROM drafts WHERE session = ?1", params![session])
            .await
            .map_err(|e| DraftError::Query(format!("Failed to delete draft: {e}")))?;
        Ok(())
    }
}
