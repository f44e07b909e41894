// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Pattern store: persistent correction events, learned patterns, and
//! user preferences

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Transaction};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::config::LearningConfig;
use crate::features::FileFeatures;
use crate::{FilewiseError, Result};

/// Pattern store for Filewise (thread-safe wrapper)
#[derive(Clone)]
pub struct PatternStore {
    conn: Arc<Mutex<Connection>>,
}

/// The kind of signal a learned pattern was extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Extension,
    Keyword,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Extension => "extension",
            PatternKind::Keyword => "keyword",
        }
    }

    fn from_db(value: &str) -> rusqlite::Result<Self> {
        match value {
            "extension" => Ok(PatternKind::Extension),
            "keyword" => Ok(PatternKind::Keyword),
            other => Err(rusqlite::Error::InvalidParameterName(format!(
                "unknown pattern kind: {}", other
            ))),
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A learned association between one pattern and one target category.
///
/// `confidence` is a strength score, monotonically reinforced and not
/// capped at write time; readers that need a probability-like value must
/// clamp it themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRecord {
    pub kind: PatternKind,
    pub value: String,
    pub target_category: String,
    pub confidence: f64,
    pub usage_count: i64,
    pub last_updated: DateTime<Utc>,
}

/// One user-supplied ground-truth label, appended once and never mutated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionEvent {
    pub id: String,
    pub filename: String,
    pub original_category: String,
    pub corrected_category: String,
    pub extension: Option<String>,
    pub keywords: Vec<String>,
    pub feedback: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl CorrectionEvent {
    /// Build an event from a filename's extracted features
    pub fn new(
        filename: &str,
        original_category: &str,
        corrected_category: &str,
        features: &FileFeatures,
        feedback: Option<&str>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            original_category: original_category.to_string(),
            corrected_category: corrected_category.to_string(),
            extension: features.extension.clone(),
            keywords: features.keywords.clone(),
            feedback: feedback.map(String::from),
            recorded_at: Utc::now(),
        }
    }
}

/// A recorded user preference (e.g. a clarification answer)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub preference_type: String,
    pub preference_value: String,
    pub category_context: Option<String>,
    pub strength: f64,
    pub created_at: DateTime<Utc>,
}

/// Per-kind aggregate over learned patterns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternStrength {
    pub kind: String,
    pub pattern_count: i64,
    pub avg_confidence: f64,
}

impl PatternStore {
    /// Open or create the store
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.initialize()?;
        Ok(store)
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| FilewiseError::Config("Store lock poisoned".to_string()))
    }

    /// Initialize store schema
    fn initialize(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute_batch(r#"
            CREATE TABLE IF NOT EXISTS corrections (
                id TEXT PRIMARY KEY,
                filename TEXT NOT NULL,
                original_category TEXT NOT NULL,
                corrected_category TEXT NOT NULL,
                extension TEXT,
                keywords TEXT,
                feedback TEXT,
                recorded_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS patterns (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                pattern_kind TEXT NOT NULL,
                pattern_value TEXT NOT NULL,
                target_category TEXT NOT NULL,
                confidence REAL NOT NULL,
                usage_count INTEGER NOT NULL,
                last_updated TEXT NOT NULL,
                UNIQUE(pattern_kind, pattern_value, target_category)
            );

            CREATE TABLE IF NOT EXISTS preferences (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                preference_type TEXT NOT NULL,
                preference_value TEXT NOT NULL,
                category_context TEXT,
                strength REAL NOT NULL DEFAULT 1.0,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_patterns_lookup
                ON patterns(pattern_kind, pattern_value);
            CREATE INDEX IF NOT EXISTS idx_corrections_corrected
                ON corrections(corrected_category);
        "#)?;
        Ok(())
    }

    /// Apply one correction: append the event and reinforce every pattern
    /// it carries, all inside a single transaction. Either everything
    /// lands or nothing does.
    pub fn apply_correction(&self, event: &CorrectionEvent, config: &LearningConfig) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"INSERT INTO corrections
               (id, filename, original_category, corrected_category, extension, keywords, feedback, recorded_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            params![
                event.id,
                event.filename,
                event.original_category,
                event.corrected_category,
                event.extension,
                event.keywords.join(" "),
                event.feedback,
                event.recorded_at.to_rfc3339(),
            ],
        )?;

        if let Some(ref ext) = event.extension {
            upsert_pattern(&tx, PatternKind::Extension, ext, &event.corrected_category, config)?;
        }
        for keyword in &event.keywords {
            upsert_pattern(&tx, PatternKind::Keyword, keyword, &event.corrected_category, config)?;
        }

        tx.commit()?;
        Ok(())
    }

    /// All learned records for one (kind, value), across every category,
    /// ordered by confidence descending then usage_count descending
    pub fn lookup(&self, kind: PatternKind, value: &str) -> Result<Vec<PatternRecord>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT pattern_kind, pattern_value, target_category, confidence, usage_count, last_updated
               FROM patterns
               WHERE pattern_kind = ?1 AND pattern_value = ?2
               ORDER BY confidence DESC, usage_count DESC"#
        )?;

        let records = stmt.query_map(params![kind.as_str(), value], map_pattern_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// All learned patterns (for inspection/export)
    pub fn all_patterns(&self) -> Result<Vec<PatternRecord>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT pattern_kind, pattern_value, target_category, confidence, usage_count, last_updated
               FROM patterns
               ORDER BY confidence DESC, usage_count DESC"#
        )?;
        let records = stmt.query_map([], map_pattern_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Record a user preference (clarification answers land here)
    pub fn record_preference(&self, pref: &PreferenceRecord) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            r#"INSERT INTO preferences
               (preference_type, preference_value, category_context, strength, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
            params![
                pref.preference_type,
                pref.preference_value,
                pref.category_context,
                pref.strength,
                pref.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Total number of recorded corrections
    pub fn correction_count(&self) -> Result<i64> {
        let conn = self.lock_conn()?;
        conn.query_row("SELECT COUNT(*) FROM corrections", [], |row| row.get(0))
            .map_err(Into::into)
    }

    /// Categories the user most often corrected away from
    pub fn most_corrected(&self, limit: usize) -> Result<Vec<(String, i64)>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT original_category, COUNT(*) as cnt
               FROM corrections GROUP BY original_category
               ORDER BY cnt DESC LIMIT ?1"#
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Categories the user most often corrected toward
    pub fn preferred_categories(&self, limit: usize) -> Result<Vec<(String, i64)>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT corrected_category, COUNT(*) as cnt
               FROM corrections GROUP BY corrected_category
               ORDER BY cnt DESC LIMIT ?1"#
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Pattern count and average confidence per pattern kind
    pub fn pattern_strength(&self) -> Result<Vec<PatternStrength>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT pattern_kind, COUNT(*), AVG(confidence)
               FROM patterns GROUP BY pattern_kind ORDER BY pattern_kind"#
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(PatternStrength {
                kind: row.get(0)?,
                pattern_count: row.get(1)?,
                avg_confidence: row.get(2)?,
            })
        })?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Vacuum the store (reclaim space)
    pub fn vacuum(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute("VACUUM", [])?;
        Ok(())
    }

    #[cfg(test)]
    fn execute_raw(&self, sql: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute_batch(sql)?;
        Ok(())
    }
}

/// Read-then-write reinforcement inside the surrounding transaction.
/// Confidence grows without a write-time cap; the scorer clamps on read.
fn upsert_pattern(
    tx: &Transaction<'_>,
    kind: PatternKind,
    value: &str,
    target_category: &str,
    config: &LearningConfig,
) -> Result<()> {
    let existing: Option<(f64, i64)> = tx
        .query_row(
            r#"SELECT confidence, usage_count FROM patterns
               WHERE pattern_kind = ?1 AND pattern_value = ?2 AND target_category = ?3"#,
            params![kind.as_str(), value, target_category],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    let now = Utc::now().to_rfc3339();
    match existing {
        Some((confidence, usage_count)) => {
            tx.execute(
                r#"UPDATE patterns
                   SET confidence = ?1, usage_count = ?2, last_updated = ?3
                   WHERE pattern_kind = ?4 AND pattern_value = ?5 AND target_category = ?6"#,
                params![
                    confidence + config.reinforcement_step,
                    usage_count + 1,
                    now,
                    kind.as_str(),
                    value,
                    target_category,
                ],
            )?;
        }
        None => {
            tx.execute(
                r#"INSERT INTO patterns
                   (pattern_kind, pattern_value, target_category, confidence, usage_count, last_updated)
                   VALUES (?1, ?2, ?3, ?4, 1, ?5)"#,
                params![
                    kind.as_str(),
                    value,
                    target_category,
                    config.base_confidence + config.reinforcement_step,
                    now,
                ],
            )?;
        }
    }

    Ok(())
}

fn map_pattern_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatternRecord> {
    let kind_str: String = row.get(0)?;
    let updated_str: String = row.get(5)?;
    Ok(PatternRecord {
        kind: PatternKind::from_db(&kind_str)?,
        value: row.get(1)?,
        target_category: row.get(2)?,
        confidence: row.get(3)?,
        usage_count: row.get(4)?,
        last_updated: DateTime::parse_from_rfc3339(&updated_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
