use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::models::{SessionAssets, SessionRecord};

/// Persistence collaborator. Called off the sequencing context once per
/// finished session; failures are logged by the core and never retried.
pub trait SessionStore: Send + Sync + 'static {
    fn save(&self, record: &SessionRecord) -> Result<()>;
}

/// Remote sync collaborator. Owns its own timeout and retry policy; the
/// core's contract is "hand off an immutable record, get nothing back".
pub trait SessionSync: Send + Sync + 'static {
    fn upload_and_insert(
        &self,
        created_at: DateTime<Utc>,
        duration_secs: u64,
        assets: &SessionAssets,
    ) -> Result<()>;
}
