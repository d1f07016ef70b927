use anyhow::Result;
use mal_enrich_models::MediaKind;
use std::path::{Path, PathBuf};

/// Locates the per-user configuration directory.
pub struct PathManager {
    config_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("anitrakt");
        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}

/// Default output path for an input list: `json/output/<stem>_ex.json`.
pub fn default_output_file(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    Path::new("json/output").join(format!("{stem}_ex.json"))
}

/// Not-found ledger path paired with an output file:
/// `json/not_found/not_exist_<output-basename>`.
pub fn not_found_file(output: &Path) -> PathBuf {
    let base = output
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("output.json");
    Path::new("json/not_found").join(format!("not_exist_{base}"))
}

/// Override file for a batch: `json/overrides/<kind>_overrides.json`.
pub fn overrides_file(kind: MediaKind) -> PathBuf {
    Path::new("json/overrides").join(format!("{}_overrides.json", kind.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_derives_from_input_stem() {
        assert_eq!(
            default_output_file(Path::new("json/input/anime_tv.json")),
            Path::new("json/output/anime_tv_ex.json")
        );
    }

    #[test]
    fn ledger_path_derives_from_output_basename() {
        assert_eq!(
            not_found_file(Path::new("json/output/anime_tv_ex.json")),
            Path::new("json/not_found/not_exist_anime_tv_ex.json")
        );
    }

    #[test]
    fn overrides_path_per_media_kind() {
        assert_eq!(
            overrides_file(MediaKind::Tv),
            Path::new("json/overrides/tv_overrides.json")
        );
        assert_eq!(
            overrides_file(MediaKind::Movies),
            Path::new("json/overrides/movies_overrides.json")
        );
    }
}
