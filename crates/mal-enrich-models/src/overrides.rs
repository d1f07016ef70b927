use crate::externals::Letterboxd;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Manual correction record keyed by MAL id, loaded once per run from
/// `json/overrides/{tv,movies}_overrides.json`. Read-only during
/// processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub mal_id: u64,
    pub description: String,
    #[serde(default)]
    pub ignore: bool,
    #[serde(default)]
    pub trakt: Option<CanonicalPatch>,
    #[serde(default)]
    pub externals: Option<ExternalsPatch>,
}

/// Field-level patch over the canonical Trakt block. Only present fields
/// are applied, so applying the same patch twice is a no-op.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanonicalPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Field-level patch over the cross-reference set. The file shape is shared
/// between shows and movies; fields that do not apply to a media type are
/// ignored by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalsPatch {
    #[serde(default)]
    pub tvdb: Option<u32>,
    #[serde(default)]
    pub tmdb: Option<u32>,
    #[serde(default)]
    pub imdb: Option<String>,
    #[serde(default)]
    pub tvrage: Option<u32>,
    #[serde(default)]
    pub letterboxd: Option<Letterboxd>,
}

/// Overrides for one batch, indexed by MAL id.
#[derive(Debug, Clone, Default)]
pub struct OverrideSet {
    entries: HashMap<u64, OverrideEntry>,
}

impl OverrideSet {
    pub fn from_entries(entries: Vec<OverrideEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.mal_id, e)).collect(),
        }
    }

    pub fn get(&self, mal_id: u64) -> Option<&OverrideEntry> {
        self.entries.get(&mal_id)
    }

    pub fn is_ignored(&self, mal_id: u64) -> bool {
        self.get(mal_id).map(|e| e.ignore).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_override_deserializes() {
        let entry: OverrideEntry = serde_json::from_str(
            r#"{"mal_id": 42, "description": "wrong slug", "trakt": {"slug": "fixed"}}"#,
        )
        .unwrap();

        assert_eq!(entry.mal_id, 42);
        assert!(!entry.ignore);
        assert_eq!(entry.trakt.unwrap().slug.as_deref(), Some("fixed"));
        assert!(entry.externals.is_none());
    }

    #[test]
    fn set_indexes_by_mal_id() {
        let set = OverrideSet::from_entries(vec![OverrideEntry {
            mal_id: 7,
            description: "dupe listing".into(),
            ignore: true,
            trakt: None,
            externals: None,
        }]);

        assert!(set.is_ignored(7));
        assert!(!set.is_ignored(8));
        assert_eq!(set.len(), 1);
    }
}
