//! Runtime configuration - where data lives, who the user is, which model to ask

use tracing::{info, warn};

use crate::ai::{DEFAULT_MODEL, GeminiClient, TextGenerator};
use crate::db::Database;
use crate::error::{EngineError, EngineResult};
use crate::identity::Identity;
use crate::store::Store;

pub const DEFAULT_DB_PATH: &str = "hypertrack.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub user_id: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            user_id: None,
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Config {
    /// Gemini client, if an API key is configured
    pub fn text_generator(&self) -> EngineResult<Box<dyn TextGenerator>> {
        let key = self
            .gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(EngineError::ConfigurationUnavailable("Gemini API key"))?;
        Ok(Box::new(GeminiClient::new(key, &self.gemini_model)))
    }

    /// Store with the user's data loaded. A database that cannot be opened
    /// leaves the store without a source: reads are empty, writes fail.
    pub fn open_store(&self) -> Store {
        let identity = Identity::resolve(self.user_id.as_deref());

        let store = match Database::open(&self.db_path) {
            Ok(db) => {
                info!(path = %self.db_path, user_id = %identity.user_id, "Database opened");
                Store::new(Some(Box::new(db)), Some(identity))
            }
            Err(e) => {
                warn!(path = %self.db_path, error = %e, "Database unavailable");
                Store::new(None, Some(identity))
            }
        };

        if let Err(e) = store.refresh() {
            warn!(error = %e, "Could not load training data");
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key() {
        let config = Config {
            gemini_api_key: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(
            config.text_generator(),
            Err(EngineError::ConfigurationUnavailable("Gemini API key"))
        ));
    }

    #[test]
    fn test_api_key_present() {
        let config = Config {
            gemini_api_key: Some("KEY".into()),
            ..Default::default()
        };
        assert!(config.text_generator().is_ok());
    }

    #[test]
    fn test_open_store_in_memory() {
        let config = Config {
            db_path: ":memory:".into(),
            user_id: Some("athlete".into()),
            ..Default::default()
        };
        let store = config.open_store();
        assert_eq!(store.identity().unwrap().user_id, "athlete");
        assert!(store.snapshot().logs.is_empty());
        assert!(store.refresh().is_ok());
    }

    #[test]
    fn test_unopenable_database() {
        let config = Config {
            db_path: "/nonexistent-dir/sub/hypertrack.db".into(),
            user_id: Some("athlete".into()),
            ..Default::default()
        };
        let store = config.open_store();
        assert!(matches!(
            store.refresh(),
            Err(EngineError::ConfigurationUnavailable("training store"))
        ));
    }
}
