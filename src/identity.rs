//! User identity - who the stored documents belong to

use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    /// True when no id was configured and a throwaway one was generated
    pub degraded: bool,
}

impl Identity {
    /// Use the configured id, or fall back to a random one for this run
    pub fn resolve(configured: Option<&str>) -> Self {
        match configured.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Self {
                user_id: id.to_string(),
                degraded: false,
            },
            None => {
                let user_id = Uuid::new_v4().to_string();
                warn!(user_id = %user_id, "No user id configured, data will not be found on the next run");
                Self {
                    user_id,
                    degraded: true,
                }
            }
        }
    }
}
