//! Repository Implementation

use crate::StorageError;
use chrono::Utc;
use feature_normalizer::FeatureRecord;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;
use tracing::{debug, info};

/// A prediction result to persist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPrediction {
    pub subject: String,
    pub gender: String,
    pub g1: f64,
    pub g2: f64,
    pub g3: f64,
    pub grade_level: String,
}

/// A stored prediction result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRow {
    pub id: i64,
    pub created_ms: i64,
    pub subject: String,
    pub gender: String,
    pub g1: f64,
    pub g2: f64,
    pub g3: f64,
    pub grade_level: String,
}

/// SQLite-backed repository for predictions and feedback rows
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Connect to the database at `url`, creating the file and schema as
    /// needed.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        info!(url, "connected to database");
        let repo = Self { pool };
        repo.migrate().await?;
        Ok(repo)
    }

    /// In-memory database for tests. Pinned to a single connection so every
    /// query sees the same database.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let repo = Self { pool };
        repo.migrate().await?;
        Ok(repo)
    }

    async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS predictions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_ms INTEGER NOT NULL,
                subject TEXT NOT NULL,
                gender TEXT NOT NULL,
                g1 REAL NOT NULL,
                g2 REAL NOT NULL,
                g3 REAL NOT NULL,
                grade_level TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS feedback (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_ms INTEGER NOT NULL,
                features TEXT NOT NULL,
                g1 REAL NOT NULL,
                g2 REAL NOT NULL,
                g3 REAL NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a prediction result, returning its id
    pub async fn insert_prediction(&self, record: &NewPrediction) -> Result<i64, StorageError> {
        let result = sqlx::query(
            "INSERT INTO predictions (created_ms, subject, gender, g1, g2, g3, grade_level)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(Utc::now().timestamp_millis())
        .bind(&record.subject)
        .bind(&record.gender)
        .bind(record.g1)
        .bind(record.g2)
        .bind(record.g3)
        .bind(&record.grade_level)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "stored prediction");
        Ok(id)
    }

    /// Most recent predictions, newest first
    pub async fn recent_predictions(&self, limit: i64) -> Result<Vec<PredictionRow>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, created_ms, subject, gender, g1, g2, g3, grade_level
             FROM predictions ORDER BY id DESC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| PredictionRow {
                id: row.get("id"),
                created_ms: row.get("created_ms"),
                subject: row.get("subject"),
                gender: row.get("gender"),
                g1: row.get("g1"),
                g2: row.get("g2"),
                g3: row.get("g3"),
                grade_level: row.get("grade_level"),
            })
            .collect())
    }

    /// Persist a feedback training row: the serialized feature record plus
    /// the observed grades.
    pub async fn insert_feedback(
        &self,
        features: &FeatureRecord,
        g1: f64,
        g2: f64,
        g3: f64,
    ) -> Result<i64, StorageError> {
        let payload = serde_json::to_string(features)?;

        let result = sqlx::query(
            "INSERT INTO feedback (created_ms, features, g1, g2, g3)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(Utc::now().timestamp_millis())
        .bind(payload)
        .bind(g1)
        .bind(g2)
        .bind(g3)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "stored feedback row");
        Ok(id)
    }

    /// Total stored predictions
    pub async fn prediction_count(&self) -> Result<i64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM predictions")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Total stored feedback rows
    pub async fn feedback_count(&self) -> Result<i64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM feedback")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }
}
