use crate::cache::{CacheKind, ResponseCache};
use crate::error::FetchError;
use crate::ratelimit::RateLimiter;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::traits::{MovieCatalog, ShowCatalog};
use anyhow::Result;
use async_trait::async_trait;
use mal_enrich_config::RunConfig;
use mal_enrich_models::{TraktMovie, TraktSeason, TraktShow};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const TRAKT_BASE: &str = "https://api.trakt.tv";
const API_VERSION: &str = "2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the primary catalog service. Every live request waits on
/// the shared limiter, sleeps the pacing delay, then goes through the
/// retrying transport; successful bodies are written back to the cache.
pub struct TraktClient {
    http: Client,
    api_key: String,
    limiter: Arc<RateLimiter>,
    cache: Arc<dyn ResponseCache>,
    retry: RetryPolicy,
    pacing: Duration,
    force: bool,
}

impl TraktClient {
    pub fn new(
        config: &RunConfig,
        limiter: Arc<RateLimiter>,
        cache: Arc<dyn ResponseCache>,
    ) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            limiter,
            cache,
            retry: RetryPolicy::from(&config.settings.retry),
            pacing: config.settings.trakt.pacing(),
            force: config.force,
        })
    }

    fn cached(&self, kind: CacheKind, id: u64) -> Option<Vec<u8>> {
        if self.force {
            None
        } else {
            self.cache.get(kind, id)
        }
    }

    async fn request(
        &self,
        kind: CacheKind,
        cache_id: u64,
        path: &str,
    ) -> Result<Vec<u8>, FetchError> {
        self.limiter.acquire().await;
        tokio::time::sleep(self.pacing).await;

        let url = format!("{TRAKT_BASE}{path}");
        debug!(%url, "fetching from Trakt");
        let response = retry_with_backoff(&self.retry, || {
            self.http
                .get(&url)
                .header("Content-Type", "application/json")
                .header("trakt-api-version", API_VERSION)
                .header("trakt-api-key", &self.api_key)
                .send()
        })
        .await?;

        match response.status().as_u16() {
            200 => {}
            404 => return Err(FetchError::NotFound),
            status => return Err(FetchError::Upstream(status)),
        }

        let body = response.bytes().await?.to_vec();
        self.cache.put(kind, cache_id, &body);
        Ok(body)
    }
}

#[async_trait]
impl ShowCatalog for TraktClient {
    async fn show(&self, id: u64) -> Result<TraktShow, FetchError> {
        if let Some(body) = self.cached(CacheKind::Show, id) {
            if let Ok(show) = serde_json::from_slice::<TraktShow>(&body) {
                debug!(id, "using cached show");
                return Ok(show);
            }
        }

        let body = self.request(CacheKind::Show, id, &format!("/shows/{id}")).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn season(&self, show_id: u64, number: u32) -> Result<Option<TraktSeason>, FetchError> {
        // Cache key is the parent show; the payload is the full season
        // list. A cached list without the requested number still falls
        // through to a live fetch in case the list grew upstream.
        if let Some(body) = self.cached(CacheKind::Season, show_id) {
            if let Ok(seasons) = serde_json::from_slice::<Vec<TraktSeason>>(&body) {
                if let Some(season) = seasons.into_iter().find(|s| s.number == number) {
                    debug!(show_id, number, "using cached season");
                    return Ok(Some(season));
                }
            }
        }

        let body = self
            .request(CacheKind::Season, show_id, &format!("/shows/{show_id}/seasons"))
            .await?;
        let seasons: Vec<TraktSeason> = serde_json::from_slice(&body)?;
        Ok(seasons.into_iter().find(|s| s.number == number))
    }
}

#[async_trait]
impl MovieCatalog for TraktClient {
    async fn movie(&self, id: u64) -> Result<TraktMovie, FetchError> {
        if let Some(body) = self.cached(CacheKind::Movie, id) {
            if let Ok(movie) = serde_json::from_slice::<TraktMovie>(&body) {
                debug!(id, "using cached movie");
                return Ok(movie);
            }
        }

        let body = self.request(CacheKind::Movie, id, &format!("/movies/{id}")).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use mal_enrich_config::Settings;
    use serde_json::json;

    fn test_config() -> RunConfig {
        RunConfig {
            api_key: "test-key".into(),
            tv_file: None,
            movie_file: None,
            output_file: None,
            force: false,
            no_progress: true,
            settings: Settings::default(),
        }
    }

    fn client_with_cache(cache: Arc<MemoryCache>) -> TraktClient {
        let limiter = Arc::new(RateLimiter::new(1000, Duration::from_secs(300)));
        TraktClient::new(&test_config(), limiter, cache).unwrap()
    }

    #[tokio::test]
    async fn cached_show_is_served_without_a_request() {
        let cache = Arc::new(MemoryCache::new());
        let body = json!({
            "title": "Cached Show",
            "year": 2010,
            "ids": {"trakt": 42, "slug": "cached-show", "tmdb": 7}
        });
        cache.put(CacheKind::Show, 42, body.to_string().as_bytes());

        let client = client_with_cache(Arc::clone(&cache));
        let show = client.show(42).await.unwrap();

        assert_eq!(show.title, "Cached Show");
        assert_eq!(show.ids.slug, "cached-show");
        assert_eq!(show.ids.tmdb, Some(7));
    }

    #[tokio::test]
    async fn cached_season_list_is_scanned_by_number() {
        let cache = Arc::new(MemoryCache::new());
        let body = json!([
            {"number": 1, "ids": {"trakt": 901, "tvdb": 11}},
            {"number": 2, "ids": {"trakt": 902, "tvdb": 12}}
        ]);
        cache.put(CacheKind::Season, 42, body.to_string().as_bytes());

        let client = client_with_cache(Arc::clone(&cache));
        let season = client.season(42, 2).await.unwrap().unwrap();

        assert_eq!(season.number, 2);
        assert_eq!(season.ids.trakt, 902);
        assert_eq!(season.ids.tvdb, Some(12));
    }

    #[tokio::test]
    async fn cached_movie_is_served_without_a_request() {
        let cache = Arc::new(MemoryCache::new());
        let body = json!({
            "title": "Cached Film",
            "year": 1997,
            "ids": {"trakt": 9, "slug": "cached-film", "imdb": "tt0000001"}
        });
        cache.put(CacheKind::Movie, 9, body.to_string().as_bytes());

        let client = client_with_cache(Arc::clone(&cache));
        let movie = client.movie(9).await.unwrap();

        assert_eq!(movie.title, "Cached Film");
        assert_eq!(movie.ids.imdb.as_deref(), Some("tt0000001"));
    }
}
