use color_eyre::Result;

/// Resolve the Trakt API key: flag value first, then the TRAKT_API_KEY
/// environment variable, then an interactive masked prompt.
pub fn resolve_api_key(flag: Option<String>) -> Result<String> {
    if let Some(key) = flag.filter(|k| !k.trim().is_empty()) {
        return Ok(key);
    }
    if let Ok(key) = std::env::var("TRAKT_API_KEY") {
        if !key.trim().is_empty() {
            return Ok(key);
        }
    }

    let key = rpassword::prompt_password("Trakt API key: ")
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read API key: {}", e))?;
    if key.trim().is_empty() {
        return Err(color_eyre::eyre::eyre!("No API key provided"));
    }
    Ok(key)
}
