use super::{prompts, summary};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use mal_enrich_config::{
    default_output_file, not_found_file, overrides_file, PathManager, RunConfig, Settings,
};
use mal_enrich_core::{load_json, load_json_optional, reconcile_movies, reconcile_shows, save_json};
use mal_enrich_models::{
    InputMovie, InputShow, MediaKind, NotFoundEntry, OutputMovie, OutputShow, OverrideSet,
    RunStats,
};
use mal_enrich_sources::{
    FsCache, LetterboxdClient, RateLimiter, ResponseCache, TraktClient,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct EnrichArgs {
    pub tv: Option<PathBuf>,
    pub movies: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub api_key: Option<String>,
    pub force: bool,
    pub no_progress: bool,
}

pub async fn run_enrich(args: EnrichArgs, output: &Output) -> Result<()> {
    tracing::debug!("Enrich command started");

    if args.tv.is_none() && args.movies.is_none() {
        return Err(eyre!("Nothing to do: pass --tv and/or --movies"));
    }
    if args.output.is_some() && args.tv.is_some() && args.movies.is_some() {
        return Err(eyre!(
            "--output is ambiguous with both --tv and --movies; use the derived per-batch paths"
        ));
    }

    let path_manager =
        PathManager::new().map_err(|e| eyre!("Failed to locate config directory: {}", e))?;
    let settings = Settings::load(&path_manager.config_file())
        .map_err(|e| eyre!("Failed to load settings: {:#}", e))?;
    let api_key = prompts::resolve_api_key(args.api_key)?;

    let config = RunConfig {
        api_key,
        tv_file: args.tv,
        movie_file: args.movies,
        output_file: args.output,
        force: args.force,
        no_progress: args.no_progress,
        settings,
    };

    let cache = Arc::new(
        FsCache::new(config.settings.cache_dir())
            .map_err(|e| eyre!("Failed to create response cache: {:#}", e))?,
    );
    let trakt_limiter = Arc::new(RateLimiter::from_limits(&config.settings.trakt));
    let letterboxd_limiter = Arc::new(RateLimiter::from_limits(&config.settings.letterboxd));
    let trakt = TraktClient::new(
        &config,
        trakt_limiter,
        Arc::clone(&cache) as Arc<dyn ResponseCache>,
    )
    .map_err(|e| eyre!("Failed to create Trakt client: {:#}", e))?;
    let letterboxd = LetterboxdClient::new(
        &config,
        letterboxd_limiter,
        Arc::clone(&cache) as Arc<dyn ResponseCache>,
    )
    .map_err(|e| eyre!("Failed to create Letterboxd client: {:#}", e))?;

    let mut batches = Vec::new();

    if let Some(tv_file) = config.tv_file.clone() {
        batches.push(enrich_shows(&trakt, &tv_file, &config, output).await?);
    }
    if let Some(movie_file) = config.movie_file.clone() {
        batches.push(enrich_movies(&trakt, &letterboxd, &movie_file, &config, output).await?);
    }

    summary::report(&batches, output)?;

    // Show/movie/season responses only help within a run; the Letterboxd
    // entries stay for next time.
    if let Err(err) = cache.clear_volatile() {
        tracing::warn!(error = %err, "failed to clear volatile cache entries");
    }

    Ok(())
}

async fn enrich_shows(
    trakt: &TraktClient,
    input_file: &Path,
    config: &RunConfig,
    output: &Output,
) -> Result<RunStats> {
    let inputs: Vec<InputShow> =
        load_json(input_file).map_err(|e| eyre!("Failed to load tv input: {:#}", e))?;
    let output_file = config
        .output_file
        .clone()
        .unwrap_or_else(|| default_output_file(input_file));
    let ledger_file = not_found_file(&output_file);

    let existing: Vec<OutputShow> = load_json_optional(&output_file);
    let known_missing: Vec<NotFoundEntry> = load_json_optional(&ledger_file);
    let overrides =
        OverrideSet::from_entries(load_json_optional(&overrides_file(MediaKind::Tv)));

    output.info(format!(
        "Enriching {} tv entries from {}",
        inputs.len(),
        input_file.display()
    ));
    let bar = progress_bar(inputs.len() as u64, config.no_progress);

    let outcome = reconcile_shows(
        trakt,
        &inputs,
        existing,
        known_missing,
        &overrides,
        config.force,
        || bar.inc(1),
    )
    .await;
    bar.finish_and_clear();

    let results: Vec<OutputShow> = outcome.results.into_values().collect();
    persist(&output_file, &results, &ledger_file, &outcome.ledger, output);
    output.success(format!(
        "tv: {} records ({} created, {} updated, {} modified, {} not found)",
        results.len(),
        outcome.stats.created(),
        outcome.stats.updated(),
        outcome.stats.modified(),
        outcome.stats.not_found(),
    ));

    Ok(outcome.stats)
}

async fn enrich_movies(
    trakt: &TraktClient,
    letterboxd: &LetterboxdClient,
    input_file: &Path,
    config: &RunConfig,
    output: &Output,
) -> Result<RunStats> {
    let inputs: Vec<InputMovie> =
        load_json(input_file).map_err(|e| eyre!("Failed to load movie input: {:#}", e))?;
    let output_file = config
        .output_file
        .clone()
        .unwrap_or_else(|| default_output_file(input_file));
    let ledger_file = not_found_file(&output_file);

    let existing: Vec<OutputMovie> = load_json_optional(&output_file);
    let known_missing: Vec<NotFoundEntry> = load_json_optional(&ledger_file);
    let overrides =
        OverrideSet::from_entries(load_json_optional(&overrides_file(MediaKind::Movies)));

    output.info(format!(
        "Enriching {} movie entries from {}",
        inputs.len(),
        input_file.display()
    ));
    let bar = progress_bar(inputs.len() as u64, config.no_progress);

    let outcome = reconcile_movies(
        trakt,
        letterboxd,
        &inputs,
        existing,
        known_missing,
        &overrides,
        config.force,
        || bar.inc(1),
    )
    .await;
    bar.finish_and_clear();

    let results: Vec<OutputMovie> = outcome.results.into_values().collect();
    persist(&output_file, &results, &ledger_file, &outcome.ledger, output);
    output.success(format!(
        "movies: {} records ({} created, {} updated, {} modified, {} not found)",
        results.len(),
        outcome.stats.created(),
        outcome.stats.updated(),
        outcome.stats.modified(),
        outcome.stats.not_found(),
    ));

    Ok(outcome.stats)
}

/// Output and ledger writes are warnings, not failures: the run already
/// paid for its fetches and the summary should still be reported.
fn persist<T: serde::Serialize>(
    output_file: &Path,
    results: &[T],
    ledger_file: &Path,
    ledger: &[NotFoundEntry],
    output: &Output,
) {
    if let Err(err) = save_json(output_file, &results) {
        output.warn(format!("Failed to write {}: {err:#}", output_file.display()));
    }
    if let Err(err) = save_json(ledger_file, &ledger) {
        output.warn(format!("Failed to write {}: {err:#}", ledger_file.display()));
    }
}

fn progress_bar(len: u64, no_progress: bool) -> ProgressBar {
    if no_progress || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .expect("valid progress template")
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    bar
}
