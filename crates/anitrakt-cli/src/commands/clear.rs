use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use mal_enrich_config::{PathManager, Settings};
use mal_enrich_sources::FsCache;

/// Wipe the response cache directory. The bare command and `--cache` do
/// the same thing; the flag exists for symmetry with scripts that spell
/// out what they clear.
pub async fn run_clear(_cache: bool, output: &Output) -> Result<()> {
    let path_manager =
        PathManager::new().map_err(|e| eyre!("Failed to locate config directory: {}", e))?;
    let settings = Settings::load(&path_manager.config_file())
        .map_err(|e| eyre!("Failed to load settings: {:#}", e))?;

    let cache_dir = settings.cache_dir();
    let cache = FsCache::new(&cache_dir)
        .map_err(|e| eyre!("Failed to open response cache: {:#}", e))?;
    cache
        .clear_all()
        .map_err(|e| eyre!("Failed to clear response cache: {:#}", e))?;

    output.success(format!("Cleared response cache: {}", cache_dir.display()));
    Ok(())
}
