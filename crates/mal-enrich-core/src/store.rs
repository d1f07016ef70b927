use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::warn;

/// Load a required JSON document. A missing or malformed file aborts the
/// run: silently enriching an empty input would look like mass deletion
/// downstream.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Load an auxiliary JSON document. Missing is normal (first run, no
/// overrides yet) and yields the default; a file that exists but fails to
/// parse is logged and treated as absent.
pub fn load_json_optional<T: DeserializeOwned + Default>(path: &Path) -> T {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return T::default(),
    };
    match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unreadable auxiliary file");
            T::default()
        }
    }
}

/// Write a JSON document, creating parent directories as needed. Output
/// is pretty-printed with a trailing newline so diffs in version control
/// stay readable.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut content = serde_json::to_vec_pretty(value).context("failed to serialize output")?;
    content.push(b'\n');
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mal_enrich_models::NotFoundEntry;

    #[test]
    fn required_load_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<Vec<NotFoundEntry>> = load_json(&dir.path().join("absent.json"));
        assert!(result.is_err());
    }

    #[test]
    fn optional_load_defaults_on_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let missing: Vec<NotFoundEntry> = load_json_optional(&dir.path().join("absent.json"));
        assert!(missing.is_empty());

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let broken: Vec<NotFoundEntry> = load_json_optional(&path);
        assert!(broken.is_empty());
    }

    #[test]
    fn save_creates_parents_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/ledger.json");
        let entries = vec![NotFoundEntry {
            mal_id: 5,
            title: "Lost".into(),
        }];

        save_json(&path, &entries).unwrap();
        let loaded: Vec<NotFoundEntry> = load_json(&path).unwrap();
        assert_eq!(loaded, entries);
        assert!(std::fs::read_to_string(&path).unwrap().ends_with('\n'));
    }
}
