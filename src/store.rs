//! Application state - the current user's profile and logs
//!
//! Writes go through the store, which validates them, hands them to the data
//! source and publishes a fresh snapshot. Readers either take a snapshot or
//! subscribe and get notified on every change.

use tokio::sync::watch;
use tracing::{info, warn};

use crate::analytics::Analytics;
use crate::error::{EngineError, EngineResult};
use crate::identity::Identity;
use crate::models::{ProfilePatch, RawTrainingLog, TrainingLog, UserProfile, Validation};

/// Per-user document storage
pub trait DataSource {
    /// Every log of the user, oldest first
    fn load_logs(&self, user_id: &str) -> EngineResult<Vec<TrainingLog>>;

    /// Persist a new log and return the id it was given
    fn append_log(&self, user_id: &str, log: &TrainingLog) -> EngineResult<String>;

    fn load_profile(&self, user_id: &str) -> EngineResult<Option<UserProfile>>;

    /// Create or update the profile, leaving fields absent from `patch` untouched
    fn merge_profile(&self, user_id: &str, patch: ProfilePatch) -> EngineResult<UserProfile>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub profile: Option<UserProfile>,
    pub logs: Vec<TrainingLog>,
}

impl Snapshot {
    pub fn analytics(&self) -> Analytics<'_> {
        Analytics::new(&self.logs, self.profile.as_ref())
    }
}

pub struct Store {
    source: Option<Box<dyn DataSource>>,
    identity: Option<Identity>,
    tx: watch::Sender<Snapshot>,
}

impl Store {
    pub fn new(source: Option<Box<dyn DataSource>>, identity: Option<Identity>) -> Self {
        let (tx, _) = watch::channel(Snapshot::default());
        Self { source, identity, tx }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    fn ready(&self) -> EngineResult<(&dyn DataSource, &str)> {
        let source = self
            .source
            .as_deref()
            .ok_or(EngineError::ConfigurationUnavailable("training store"))?;
        let identity = self
            .identity
            .as_ref()
            .ok_or(EngineError::ConfigurationUnavailable("user id"))?;
        Ok((source, identity.user_id.as_str()))
    }

    /// Reload everything and notify subscribers. An unreadable profile
    /// document is dropped from the snapshot, the logs still load.
    pub fn refresh(&self) -> EngineResult<()> {
        let (source, user_id) = self.ready()?;
        let logs = source.load_logs(user_id)?;
        let profile = match source.load_profile(user_id) {
            Ok(profile) => profile,
            Err(EngineError::Document(e)) => {
                warn!(error = %e, "Skipping unreadable profile");
                None
            }
            Err(e) => return Err(e),
        };
        self.tx.send_replace(Snapshot { profile, logs });
        Ok(())
    }

    // The write is committed at this point, so a failed reload must not fail it
    fn refresh_after_write(&self) {
        if let Err(e) = self.refresh() {
            warn!(error = %e, "Saved, but reloading training data failed");
        }
    }

    /// Validate and persist a submitted session
    pub fn add_log(&self, raw: &RawTrainingLog) -> EngineResult<TrainingLog> {
        let mut log = raw.validate(Validation::Submission)?;

        let (source, user_id) = self.ready().inspect_err(|e| {
            warn!(error = %e, "Training log not saved");
        })?;

        let id = source.append_log(user_id, &log)?;
        info!(id = %id, date = %log.date, exercises = log.exercises.len(), "Training log added");
        log.id = Some(id);

        self.refresh_after_write();
        Ok(log)
    }

    pub fn save_profile(&self, patch: ProfilePatch) -> EngineResult<UserProfile> {
        let (source, user_id) = self.ready().inspect_err(|e| {
            warn!(error = %e, "Profile not saved");
        })?;

        let profile = source.merge_profile(user_id, patch)?;
        info!("Profile settings saved");

        self.refresh_after_write();
        Ok(profile)
    }

    /// Import sessions exported by older app versions. Stored values are
    /// taken as they are; documents missing required fields are skipped.
    /// Returns how many were imported.
    pub fn import_logs(&self, raws: &[RawTrainingLog]) -> EngineResult<usize> {
        let (source, user_id) = self.ready().inspect_err(|e| {
            warn!(error = %e, "Nothing imported");
        })?;

        let mut imported = 0;
        for (i, raw) in raws.iter().enumerate() {
            match raw.validate(Validation::Structural) {
                Ok(log) => {
                    source.append_log(user_id, &log)?;
                    imported += 1;
                }
                Err(e) => warn!(index = i, error = %e, "Skipping invalid document"),
            }
        }
        info!(imported, skipped = raws.len() - imported, "Import finished");

        if imported > 0 {
            self.refresh_after_write();
        }
        Ok(imported)
    }
}
