use crate::overrides::{apply_movie_override, apply_show_override};
use mal_enrich_models::{
    Change, InputMovie, InputShow, MediaKind, MovieEntry, MovieExternals, NotFoundEntry,
    OutputMovie, OutputShow, OverrideSet, RunStats, SeasonEntry, SeasonExternals, ShowEntry,
    ShowExternals, SourceEntry,
};
use mal_enrich_sources::{FetchError, FilmIndex, MovieCatalog, ShowCatalog};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Result of reconciling one input batch: the full output set (existing
/// records merged with this run's work), the updated not-found ledger,
/// and per-record change classifications.
pub struct ReconcileOutcome<T> {
    pub results: BTreeMap<u64, T>,
    pub ledger: Vec<NotFoundEntry>,
    pub stats: RunStats,
}

/// Merge one batch of show inputs into the existing output set.
///
/// Records already present are kept as-is unless `force` is set; keys on
/// the not-found ledger are skipped the same way. An ignore override
/// removes the record from both the output and the ledger. Exactly one
/// change bucket is reported per record, with Modified taking precedence
/// when an override altered the final record.
///
/// Per-record fetch failures are isolated: a failed record is logged and
/// skipped, and the rest of the batch still completes.
pub async fn reconcile_shows(
    catalog: &dyn ShowCatalog,
    inputs: &[InputShow],
    existing: Vec<OutputShow>,
    known_missing: Vec<NotFoundEntry>,
    overrides: &OverrideSet,
    force: bool,
    mut progress: impl FnMut(),
) -> ReconcileOutcome<OutputShow> {
    let mut results: BTreeMap<u64, OutputShow> =
        existing.into_iter().map(|r| (r.mal_id(), r)).collect();
    let mut ledger: BTreeMap<u64, NotFoundEntry> =
        known_missing.into_iter().map(|e| (e.mal_id, e)).collect();
    let mut stats = RunStats::new(MediaKind::Tv, results.len());

    for input in inputs {
        let mal_id = input.mal_id;

        if overrides.is_ignored(mal_id) {
            if results.remove(&mal_id).is_some() {
                info!(mal_id, title = %input.title, "removed ignored record");
            }
            ledger.remove(&mal_id);
            progress();
            continue;
        }

        if !force {
            if let Some(record) = results.get_mut(&mal_id) {
                if let Some(entry) = overrides.get(mal_id) {
                    if apply_show_override(record, entry) {
                        stats.record(Change::Modified, mal_id, &input.title, &entry.description);
                    }
                }
                progress();
                continue;
            }
            if ledger.contains_key(&mal_id) {
                debug!(mal_id, title = %input.title, "skipping known missing entry");
                progress();
                continue;
            }
        }

        match fetch_show(catalog, input).await {
            Ok(mut record) => {
                ledger.remove(&mal_id);
                let mut modified_reason = None;
                if let Some(entry) = overrides.get(mal_id) {
                    if apply_show_override(&mut record, entry) {
                        modified_reason = Some(entry.description.clone());
                    }
                }
                let previous = results.insert(mal_id, record.clone());
                let existed = previous.is_some();
                let canonical_changed = previous
                    .map(|old| {
                        old.trakt.id != record.trakt.id || old.trakt.slug != record.trakt.slug
                    })
                    .unwrap_or(false);
                classify(&mut stats, mal_id, &input.title, modified_reason, existed, canonical_changed);
            }
            Err(err) if err.is_not_found() => {
                warn!(mal_id, trakt_id = input.trakt_id, title = %input.title, "show not found upstream");
                stats.record(Change::NotFound, mal_id, &input.title, "no canonical match");
                ledger.entry(mal_id).or_insert_with(|| NotFoundEntry {
                    mal_id,
                    title: input.title.clone(),
                });
            }
            Err(err) => {
                warn!(
                    mal_id,
                    trakt_id = input.trakt_id,
                    title = %input.title,
                    error = %err,
                    "skipping show after fetch failure"
                );
            }
        }
        progress();
    }

    stats.total_after = results.len();
    ReconcileOutcome {
        results,
        ledger: ledger.into_values().collect(),
        stats,
    }
}

/// Merge one batch of movie inputs. Same policy as shows, plus a
/// best-effort Letterboxd backfill for records fetched this run.
pub async fn reconcile_movies(
    catalog: &dyn MovieCatalog,
    films: &dyn FilmIndex,
    inputs: &[InputMovie],
    existing: Vec<OutputMovie>,
    known_missing: Vec<NotFoundEntry>,
    overrides: &OverrideSet,
    force: bool,
    mut progress: impl FnMut(),
) -> ReconcileOutcome<OutputMovie> {
    let mut results: BTreeMap<u64, OutputMovie> =
        existing.into_iter().map(|r| (r.mal_id(), r)).collect();
    let mut ledger: BTreeMap<u64, NotFoundEntry> =
        known_missing.into_iter().map(|e| (e.mal_id, e)).collect();
    let mut stats = RunStats::new(MediaKind::Movies, results.len());

    for input in inputs {
        let mal_id = input.mal_id;

        if overrides.is_ignored(mal_id) {
            if results.remove(&mal_id).is_some() {
                info!(mal_id, title = %input.title, "removed ignored record");
            }
            ledger.remove(&mal_id);
            progress();
            continue;
        }

        if !force {
            if let Some(record) = results.get_mut(&mal_id) {
                if let Some(entry) = overrides.get(mal_id) {
                    if apply_movie_override(record, entry) {
                        stats.record(Change::Modified, mal_id, &input.title, &entry.description);
                    }
                }
                progress();
                continue;
            }
            if ledger.contains_key(&mal_id) {
                debug!(mal_id, title = %input.title, "skipping known missing entry");
                progress();
                continue;
            }
        }

        match fetch_movie(catalog, films, input).await {
            Ok(mut record) => {
                ledger.remove(&mal_id);
                let mut modified_reason = None;
                if let Some(entry) = overrides.get(mal_id) {
                    if apply_movie_override(&mut record, entry) {
                        modified_reason = Some(entry.description.clone());
                    }
                }
                let previous = results.insert(mal_id, record.clone());
                let existed = previous.is_some();
                let canonical_changed = previous
                    .map(|old| {
                        old.trakt.id != record.trakt.id || old.trakt.slug != record.trakt.slug
                    })
                    .unwrap_or(false);
                classify(&mut stats, mal_id, &input.title, modified_reason, existed, canonical_changed);
            }
            Err(err) if err.is_not_found() => {
                warn!(mal_id, trakt_id = input.trakt_id, title = %input.title, "movie not found upstream");
                stats.record(Change::NotFound, mal_id, &input.title, "no canonical match");
                ledger.entry(mal_id).or_insert_with(|| NotFoundEntry {
                    mal_id,
                    title: input.title.clone(),
                });
            }
            Err(err) => {
                warn!(
                    mal_id,
                    trakt_id = input.trakt_id,
                    title = %input.title,
                    error = %err,
                    "skipping movie after fetch failure"
                );
            }
        }
        progress();
    }

    stats.total_after = results.len();
    ReconcileOutcome {
        results,
        ledger: ledger.into_values().collect(),
        stats,
    }
}

/// One reporting bucket per record: Modified (an override changed the
/// canonical id, slug, or externals) beats Created/Updated; Updated means
/// the refetched canonical id or slug differs from the prior record.
fn classify(
    stats: &mut RunStats,
    mal_id: u64,
    title: &str,
    modified_reason: Option<String>,
    existed: bool,
    canonical_changed: bool,
) {
    if let Some(reason) = modified_reason {
        stats.record(Change::Modified, mal_id, title, &reason);
    } else if !existed {
        stats.record(Change::Created, mal_id, title, "new record");
    } else if canonical_changed {
        stats.record(Change::Updated, mal_id, title, "canonical id or slug changed");
    }
}

async fn fetch_show(
    catalog: &dyn ShowCatalog,
    input: &InputShow,
) -> Result<OutputShow, FetchError> {
    let show = catalog.show(input.trakt_id).await?;

    // A show without the requested season number is a split-cour listing:
    // MAL counts cours, Trakt counts broadcast seasons. Season lookup
    // failures degrade to the same marker rather than losing the record.
    let (season, is_split_cour) = match catalog.season(input.trakt_id, input.season).await {
        Ok(Some(season)) => (
            Some(SeasonEntry {
                id: season.ids.trakt,
                number: season.number,
                externals: Some(SeasonExternals {
                    tvdb: season.ids.tvdb,
                    tmdb: season.ids.tmdb,
                    tvrage: season.ids.tvrage,
                }),
            }),
            false,
        ),
        Ok(None) => (None, true),
        Err(err) => {
            warn!(
                trakt_id = input.trakt_id,
                season = input.season,
                error = %err,
                "season lookup failed, marking split-cour"
            );
            (None, true)
        }
    };

    Ok(OutputShow {
        myanimelist: SourceEntry {
            title: input.title.clone(),
            id: input.mal_id,
        },
        trakt: ShowEntry {
            title: show.title,
            id: show.ids.trakt,
            slug: show.ids.slug,
            kind: "shows".into(),
            season,
            is_split_cour,
        },
        release_year: show.year,
        externals: Some(ShowExternals {
            tvdb: show.ids.tvdb,
            tmdb: show.ids.tmdb,
            imdb: show.ids.imdb,
            tvrage: None,
        }),
    })
}

async fn fetch_movie(
    catalog: &dyn MovieCatalog,
    films: &dyn FilmIndex,
    input: &InputMovie,
) -> Result<OutputMovie, FetchError> {
    let movie = catalog.movie(input.trakt_id).await?;

    let mut externals = MovieExternals {
        tmdb: movie.ids.tmdb,
        imdb: movie.ids.imdb.clone(),
        letterboxd: None,
    };

    // Letterboxd enrichment is best effort: a record without the
    // cross-reference is still a valid record.
    if let Some(tmdb_id) = externals.tmdb {
        match films.film(tmdb_id).await {
            Ok(film) => externals.letterboxd = Some(film),
            Err(err) => {
                warn!(tmdb_id, title = %input.title, error = %err, "letterboxd lookup failed");
            }
        }
    }

    Ok(OutputMovie {
        myanimelist: SourceEntry {
            title: input.title.clone(),
            id: input.mal_id,
        },
        trakt: MovieEntry {
            title: movie.title,
            id: movie.ids.trakt,
            slug: movie.ids.slug,
            kind: "movies".into(),
        },
        release_year: movie.year,
        externals: Some(externals),
    })
}
