use serde::{Deserialize, Serialize};

/// Ledger entry for a source key Trakt reported as nonexistent. Once
/// recorded, the key is skipped on later runs unless force-refresh is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotFoundEntry {
    pub mal_id: u64,
    pub title: String,
}
