//! Database module - SQLite document store for training data
//!
//! Logs and profiles are kept as JSON documents under the owning user's id,
//! in the same shape the documents have always had. Documents are validated
//! on the way out.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{ProfilePatch, RawTrainingLog, TrainingLog, UserProfile, Validation};
use crate::store::DataSource;

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> EngineResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> EngineResult<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> EngineResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS training_logs (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                document TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_training_logs_user ON training_logs (user_id, date);
            CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY,
                document TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Append a new training log, returns the assigned id
    pub fn add_training_log(&self, user_id: &str, log: &TrainingLog) -> EngineResult<String> {
        let id = Uuid::new_v4().to_string();
        let document = serde_json::to_string(log)?;

        self.conn.execute(
            "INSERT INTO training_logs (id, user_id, date, document, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id,
                user_id,
                log.date.format("%Y-%m-%d").to_string(),
                document,
                Utc::now().to_rfc3339(),
            ],
        )?;
        debug!(user_id, id = %id, "Training log stored");
        Ok(id)
    }

    /// All logs of a user, oldest first. Documents that fail validation are skipped.
    pub fn get_training_logs(&self, user_id: &str) -> EngineResult<Vec<TrainingLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, document FROM training_logs WHERE user_id = ?1 ORDER BY date ASC, rowid ASC",
        )?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut logs = Vec::with_capacity(rows.len());
        for (id, document) in rows {
            let parsed = serde_json::from_str::<RawTrainingLog>(&document)
                .map_err(|e| e.to_string())
                .and_then(|raw| raw.validate(Validation::Structural).map_err(|e| e.to_string()));

            match parsed {
                Ok(mut log) => {
                    log.id = Some(id);
                    logs.push(log);
                }
                Err(reason) => warn!(id = %id, %reason, "Skipping invalid training log"),
            }
        }
        Ok(logs)
    }

    pub fn get_profile(&self, user_id: &str) -> EngineResult<Option<UserProfile>> {
        let document: Option<String> = self
            .conn
            .query_row(
                "SELECT document FROM profiles WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(document) = document else {
            return Ok(None);
        };
        let mut profile: UserProfile = serde_json::from_str(&document)?;
        profile.user_id = user_id.to_string();
        Ok(Some(profile))
    }

    /// Create or merge the profile in one transaction
    pub fn merge_profile(&self, user_id: &str, patch: ProfilePatch) -> EngineResult<UserProfile> {
        let tx = self.conn.unchecked_transaction()?;

        let mut profile = self.get_profile(user_id)?.unwrap_or_default();
        profile.user_id = user_id.to_string();
        profile.apply(patch);

        tx.execute(
            "INSERT INTO profiles (user_id, document, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET document = excluded.document, updated_at = excluded.updated_at",
            params![user_id, serde_json::to_string(&profile)?, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;

        debug!(user_id, "Profile saved");
        Ok(profile)
    }
}

impl DataSource for Database {
    fn load_logs(&self, user_id: &str) -> EngineResult<Vec<TrainingLog>> {
        self.get_training_logs(user_id)
    }

    fn append_log(&self, user_id: &str, log: &TrainingLog) -> EngineResult<String> {
        self.add_training_log(user_id, log)
    }

    fn load_profile(&self, user_id: &str) -> EngineResult<Option<UserProfile>> {
        self.get_profile(user_id)
    }

    fn merge_profile(&self, user_id: &str, patch: ProfilePatch) -> EngineResult<UserProfile> {
        Database::merge_profile(self, user_id, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::{MuscleGroup, PriorityTier};
    use crate::identity::Identity;
    use crate::models::{Exercise, PriorityMuscles, TrainingSet};
    use crate::store::Store;
    use chrono::NaiveDate;

    fn log_on(y: i32, m: u32, d: u32, name: &str) -> TrainingLog {
        TrainingLog::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            vec![Exercise::new(name, MuscleGroup::Back, vec![TrainingSet::new(10, 70.0).with_rir(2)])],
        )
    }

    #[test]
    fn test_add_and_get_logs_ordered_by_date() {
        let db = Database::open_in_memory().unwrap();
        db.add_training_log("u1", &log_on(2024, 3, 10, "Row")).unwrap();
        let id = db.add_training_log("u1", &log_on(2024, 3, 1, "Pulldown")).unwrap();
        db.add_training_log("u1", &log_on(2024, 3, 10, "Pull-up")).unwrap();

        let logs = db.get_training_logs("u1").unwrap();
        let names: Vec<_> = logs.iter().map(|l| l.exercises[0].name.as_str()).collect();
        assert_eq!(names, vec!["Pulldown", "Row", "Pull-up"]);
        assert_eq!(logs[0].id.as_deref(), Some(id.as_str()));
    }

    #[test]
    fn test_logs_are_per_user() {
        let db = Database::open_in_memory().unwrap();
        db.add_training_log("u1", &log_on(2024, 3, 10, "Row")).unwrap();
        assert!(db.get_training_logs("u2").unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_keeps_values() {
        let db = Database::open_in_memory().unwrap();
        let original = log_on(2024, 1, 3, "Row");
        db.add_training_log("u1", &original).unwrap();

        let loaded = db.get_training_logs("u1").unwrap().remove(0);
        assert_eq!(loaded.date, original.date);
        assert_eq!(loaded.exercises, original.exercises);
    }

    #[test]
    fn test_invalid_documents_skipped() {
        let db = Database::open_in_memory().unwrap();
        db.add_training_log("u1", &log_on(2024, 3, 10, "Row")).unwrap();
        db.conn
            .execute(
                "INSERT INTO training_logs (id, user_id, date, document, created_at) VALUES ('bad', 'u1', '2024-03-11', '{\"date\": \"2024-03-11\", \"exercises\": []}', '')",
                [],
            )
            .unwrap();
        db.conn
            .execute(
                "INSERT INTO training_logs (id, user_id, date, document, created_at) VALUES ('junk', 'u1', '2024-03-12', 'not json', '')",
                [],
            )
            .unwrap();

        assert_eq!(db.get_training_logs("u1").unwrap().len(), 1);
    }

    #[test]
    fn test_legacy_document_readable() {
        let db = Database::open_in_memory().unwrap();
        let doc = r#"{"date": "2024-01-03", "exercises": [{"name": "Press de Banca", "muscleGroup": "Pecho",
            "sets": [{"reps": 8, "load": 60, "rir": 1, "mindMuscle": null, "estimated1RM": 74.5}],
            "performanceScore": "1", "painScore": "0", "notes": "", "showSubjectiveMetrics": true}]}"#;
        db.conn
            .execute(
                "INSERT INTO training_logs (id, user_id, date, document, created_at) VALUES ('old', 'u1', '2024-01-03', ?1, '')",
                params![doc],
            )
            .unwrap();

        let logs = db.get_training_logs("u1").unwrap();
        assert_eq!(logs[0].id.as_deref(), Some("old"));
        assert_eq!(logs[0].exercises[0].muscle_group, MuscleGroup::Chest);
        assert_eq!(logs[0].exercises[0].performance_score, Some(1));
    }

    #[test]
    fn test_malformed_profile_does_not_fail_log_write() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO profiles (user_id, document, updated_at) VALUES ('u1', '{\"priorityMuscles\":{\"custom\":[\"Chest\"]}}', '')",
                [],
            )
            .unwrap();
        let store = Store::new(Some(Box::new(db)), Some(Identity::resolve(Some("u1"))));

        let raw: RawTrainingLog = serde_json::from_str(
            r#"{"date": "2024-01-03", "exercises": [{"name": "Bench", "muscleGroup": "Chest",
                "sets": [{"reps": 8, "load": 60, "rir": 1}]}]}"#,
        )
        .unwrap();
        store.add_log(&raw).unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.logs.len(), 1);
        assert!(snapshot.profile.is_none());
    }

    #[test]
    fn test_profile_missing() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_profile("u1").unwrap().is_none());
    }

    #[test]
    fn test_profile_merge() {
        let db = Database::open_in_memory().unwrap();
        db.merge_profile("u1", ProfilePatch {
            objectives: Some("Wider back".into()),
            time_constraints: Some("4x week".into()),
            ..Default::default()
        })
        .unwrap();

        let mut priorities = PriorityMuscles::default();
        priorities.set_tier(PriorityTier::Max, vec!["Back".into()]);
        let merged = db
            .merge_profile("u1", ProfilePatch {
                priority_muscles: Some(priorities),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(merged.objectives, "Wider back");

        let stored = db.get_profile("u1").unwrap().unwrap();
        assert_eq!(stored.user_id, "u1");
        assert_eq!(stored.objectives, "Wider back");
        assert_eq!(stored.time_constraints, "4x week");
        assert_eq!(stored.priority_muscles.tier_of(MuscleGroup::Back), Some(PriorityTier::Max));
    }
}
