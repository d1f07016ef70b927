use crate::error::FetchError;
use async_trait::async_trait;
use mal_enrich_models::{Letterboxd, TraktMovie, TraktSeason, TraktShow};

/// Show lookups against the primary catalog service. The reconciler only
/// sees these traits so tests can substitute canned catalogs.
#[async_trait]
pub trait ShowCatalog: Send + Sync {
    async fn show(&self, id: u64) -> Result<TraktShow, FetchError>;

    /// Look up one season by number. `Ok(None)` means the show exists but
    /// has no such season; that is the split-cour trigger, not an error.
    async fn season(&self, show_id: u64, number: u32) -> Result<Option<TraktSeason>, FetchError>;
}

#[async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn movie(&self, id: u64) -> Result<TraktMovie, FetchError>;
}

/// Secondary-catalog lookup keyed by TMDB id (the two-step Letterboxd
/// redirect protocol).
#[async_trait]
pub trait FilmIndex: Send + Sync {
    async fn film(&self, tmdb_id: u32) -> Result<Letterboxd, FetchError>;
}
