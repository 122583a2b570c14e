use chrono::{DateTime, NaiveDate, Utc};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

use crate::hydration::tracker::{HydrationTracker, IntakeDay};
use crate::models::WorkoutPlan;

/// Days of hydration history loaded when restoring a tracker
const RECENT_HISTORY_DAYS: usize = 30;

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Compression error: {0}")]
    Compression(#[from] std::io::Error),
    #[error("Plan not found: {0}")]
    NotFound(String),
    #[error("Duplicate plan: {0}")]
    Duplicate(String),
}

/// Compressed plan text for efficient storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressedPlanText {
    pub compressed_data: Vec<u8>,
    pub original_size: usize,
}

impl CompressedPlanText {
    /// Compress raw plan text
    pub fn compress(text: &str) -> Result<Self, StorageError> {
        let original_size = text.len();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes())?;
        let compressed_data = encoder.finish()?;

        Ok(Self {
            compressed_data,
            original_size,
        })
    }

    /// Decompress back to plan text
    pub fn decompress(&self) -> Result<String, StorageError> {
        let mut decoder = GzDecoder::new(self.compressed_data.as_slice());
        let mut text = String::new();
        decoder.read_to_string(&mut text)?;

        Ok(text)
    }

    /// Get compression ratio (original size / compressed size)
    pub fn compression_ratio(&self) -> f64 {
        self.original_size as f64 / self.compressed_data.len() as f64
    }
}

/// Content hash of raw plan text, used for duplicate detection
pub fn source_hash(raw_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A plan as returned from storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPlan {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub plan: WorkoutPlan,
}

/// One row of the plan listing
#[derive(Debug, Clone)]
pub struct PlanSummaryRow {
    pub id: String,
    pub plan_name: String,
    pub structure: String,
    pub day_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Plan database connection and management
pub struct PlanStore {
    conn: Connection,
}

impl PlanStore {
    /// Create or open a plan database at the specified path
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.init_schema()?;

        Ok(store)
    }

    /// Open an in-memory database, mainly for tests
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;

        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        // WAL mode for better concurrent access
        self.conn.pragma_update(None, "journal_mode", "WAL")?;
        self.conn.pragma_update(None, "synchronous", "NORMAL")?;
        self.conn.pragma_update(None, "cache_size", 10000)?;

        // Plans table (schedule as JSON, raw text compressed)
        self.conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS plans (
                id TEXT PRIMARY KEY,
                plan_name TEXT NOT NULL,
                structure TEXT NOT NULL,
                summary TEXT NOT NULL,
                day_count INTEGER NOT NULL,
                source_hash TEXT NOT NULL UNIQUE,
                schedule_json TEXT NOT NULL,
                full_plan_gz BLOB NOT NULL,
                full_plan_size INTEGER NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_plans_created_at ON plans(created_at)",
            [],
        )?;

        // Daily hydration log
        self.conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS hydration_days (
                date TEXT PRIMARY KEY,
                total_ml INTEGER NOT NULL,
                goal_ml INTEGER NOT NULL,
                last_drink_at TEXT
            )
            "#,
            [],
        )?;

        Ok(())
    }

    /// Store a parsed plan, returning its new id.
    ///
    /// The raw plan text is hashed for duplicate detection and stored
    /// gzip-compressed alongside the structured schedule.
    pub fn store_plan(&mut self, plan: &WorkoutPlan) -> Result<String, StorageError> {
        let hash = source_hash(&plan.full_plan);

        let existing: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM plans WHERE source_hash = ?1",
                params![hash],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Err(StorageError::Duplicate(format!(
                "plan text already stored as {}",
                id
            )));
        }

        let mut schedule = plan.clone();
        schedule.full_plan = String::new();
        let schedule_json = serde_json::to_string(&schedule)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let compressed = CompressedPlanText::compress(&plan.full_plan)?;
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO plans (
                id, plan_name, structure, summary, day_count, source_hash,
                schedule_json, full_plan_gz, full_plan_size, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                id,
                plan.plan_name,
                plan.structure,
                plan.summary,
                plan.weekly_schedule.len(),
                hash,
                schedule_json,
                compressed.compressed_data,
                compressed.original_size,
                created_at,
            ],
        )?;
        tx.commit()?;

        debug!(
            plan_id = %id,
            plan_name = %plan.plan_name,
            days = plan.weekly_schedule.len(),
            compression_ratio = compressed.compression_ratio(),
            "Plan stored"
        );

        Ok(id)
    }

    /// Load a plan by id
    pub fn get_plan(&self, plan_id: &str) -> Result<Option<StoredPlan>, StorageError> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT id, schedule_json, full_plan_gz, full_plan_size, created_at
                FROM plans
                WHERE id = ?1
                "#,
                params![plan_id],
                Self::plan_row_parts,
            )
            .optional()?;

        match row {
            Some(parts) => Ok(Some(Self::assemble_plan(parts)?)),
            None => Ok(None),
        }
    }

    /// Load the most recently stored plan
    pub fn latest_plan(&self) -> Result<Option<StoredPlan>, StorageError> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT id, schedule_json, full_plan_gz, full_plan_size, created_at
                FROM plans
                ORDER BY created_at DESC
                LIMIT 1
                "#,
                [],
                Self::plan_row_parts,
            )
            .optional()?;

        match row {
            Some(parts) => Ok(Some(Self::assemble_plan(parts)?)),
            None => Ok(None),
        }
    }

    /// List stored plans, newest first
    pub fn list_plans(&self, limit: Option<usize>) -> Result<Vec<PlanSummaryRow>, StorageError> {
        let query = if let Some(limit) = limit {
            format!(
                "SELECT id, plan_name, structure, day_count, created_at
                 FROM plans ORDER BY created_at DESC LIMIT {}",
                limit
            )
        } else {
            String::from(
                "SELECT id, plan_name, structure, day_count, created_at
                 FROM plans ORDER BY created_at DESC",
            )
        };

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map([], |row| {
            Ok(PlanSummaryRow {
                id: row.get("id")?,
                plan_name: row.get("plan_name")?,
                structure: row.get("structure")?,
                day_count: row.get("day_count")?,
                created_at: row.get("created_at")?,
            })
        })?;

        let mut plans = Vec::new();
        for row in rows {
            plans.push(row?);
        }

        Ok(plans)
    }

    /// Delete a plan by id
    pub fn delete_plan(&mut self, plan_id: &str) -> Result<(), StorageError> {
        let affected = self
            .conn
            .execute("DELETE FROM plans WHERE id = ?1", params![plan_id])?;
        if affected == 0 {
            return Err(StorageError::NotFound(plan_id.to_string()));
        }

        debug!(plan_id = %plan_id, "Plan deleted");
        Ok(())
    }

    /// Insert or update one day of hydration history
    pub fn upsert_intake_day(
        &mut self,
        day: &IntakeDay,
        last_drink: Option<DateTime<Utc>>,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO hydration_days (date, total_ml, goal_ml, last_drink_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![day.date, day.total_ml, day.goal_ml, last_drink],
        )?;

        Ok(())
    }

    /// Recent hydration history, ascending by date
    pub fn recent_intake_days(&self, limit: usize) -> Result<Vec<IntakeDay>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT date, total_ml, goal_ml FROM hydration_days ORDER BY date DESC LIMIT {}",
            limit
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(IntakeDay {
                date: row.get("date")?,
                total_ml: row.get("total_ml")?,
                goal_ml: row.get("goal_ml")?,
            })
        })?;

        let mut days = Vec::new();
        for row in rows {
            days.push(row?);
        }
        days.reverse();

        Ok(days)
    }

    /// Rebuild a hydration tracker from persisted history
    pub fn load_tracker(
        &self,
        daily_goal_ml: u32,
        today: NaiveDate,
    ) -> Result<HydrationTracker, StorageError> {
        let history = self.recent_intake_days(RECENT_HISTORY_DAYS)?;

        let last_drink: Option<DateTime<Utc>> = self
            .conn
            .query_row(
                "SELECT last_drink_at FROM hydration_days WHERE date = ?1",
                params![today],
                |row| row.get(0),
            )
            .optional()?
            .flatten();

        Ok(HydrationTracker::from_history(
            daily_goal_ml,
            history,
            last_drink,
            today,
        ))
    }

    /// Persist the tracker's current day
    pub fn save_tracker(
        &mut self,
        tracker: &HydrationTracker,
        today: NaiveDate,
    ) -> Result<(), StorageError> {
        self.upsert_intake_day(&tracker.today(today), tracker.last_drink)
    }

    fn plan_row_parts(
        row: &rusqlite::Row,
    ) -> rusqlite::Result<(String, String, Vec<u8>, usize, DateTime<Utc>)> {
        Ok((
            row.get("id")?,
            row.get("schedule_json")?,
            row.get("full_plan_gz")?,
            row.get("full_plan_size")?,
            row.get("created_at")?,
        ))
    }

    fn assemble_plan(
        (id, schedule_json, compressed_data, original_size, created_at): (
            String,
            String,
            Vec<u8>,
            usize,
            DateTime<Utc>,
        ),
    ) -> Result<StoredPlan, StorageError> {
        let mut plan: WorkoutPlan = serde_json::from_str(&schedule_json)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let compressed = CompressedPlanText {
            compressed_data,
            original_size,
        };
        plan.full_plan = compressed.decompress()?;

        Ok(StoredPlan {
            id,
            created_at,
            plan,
        })
    }
}
