use crate::cache::{CacheKind, ResponseCache};
use crate::error::FetchError;
use crate::ratelimit::RateLimiter;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::traits::FilmIndex;
use anyhow::Result;
use async_trait::async_trait;
use mal_enrich_config::RunConfig;
use mal_enrich_models::Letterboxd;
use reqwest::{redirect, Client};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const LETTERBOXD_BASE: &str = "https://letterboxd.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// The site serves the redirect and film JSON to browsers only.
const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Subset of the film JSON document we keep.
#[derive(Debug, Deserialize)]
struct FilmDetail {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    lid: Option<String>,
}

/// Two-step film lookup: a TMDB-keyed request that redirects to the
/// canonical film page (the slug lives in the `Location` header), then
/// the film's JSON document for its numeric and short ids.
pub struct LetterboxdClient {
    // Redirects carry the slug, so this client must not follow them.
    bare: Client,
    limiter: Arc<RateLimiter>,
    cache: Arc<dyn ResponseCache>,
    retry: RetryPolicy,
    pacing: Duration,
    force: bool,
}

impl LetterboxdClient {
    pub fn new(
        config: &RunConfig,
        limiter: Arc<RateLimiter>,
        cache: Arc<dyn ResponseCache>,
    ) -> Result<Self> {
        let bare = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self {
            bare,
            limiter,
            cache,
            retry: RetryPolicy::from(&config.settings.retry),
            pacing: config.settings.letterboxd.pacing(),
            force: config.force,
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        self.limiter.acquire().await;
        tokio::time::sleep(self.pacing).await;

        debug!(%url, "fetching from Letterboxd");
        retry_with_backoff(&self.retry, || {
            self.bare
                .get(url)
                .header(reqwest::header::USER_AGENT, BROWSER_UA)
                .send()
        })
        .await
    }

    async fn resolve_slug(&self, tmdb_id: u32) -> Result<String, FetchError> {
        let response = self
            .get(&format!("{LETTERBOXD_BASE}/tmdb/{tmdb_id}/"))
            .await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(FetchError::NotFound);
        }
        if !status.is_redirection() {
            return Err(FetchError::Upstream(status.as_u16()));
        }

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| FetchError::RedirectParse("missing Location header".into()))?;
        parse_film_slug(location)
    }

    async fn fetch_detail(&self, slug: &str) -> Result<FilmDetail, FetchError> {
        let response = self
            .get(&format!("{LETTERBOXD_BASE}/film/{slug}/json/"))
            .await?;

        match response.status().as_u16() {
            200 => {}
            404 => return Err(FetchError::NotFound),
            status => return Err(FetchError::Upstream(status)),
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl FilmIndex for LetterboxdClient {
    async fn film(&self, tmdb_id: u32) -> Result<Letterboxd, FetchError> {
        // The assembled record is cached, not the raw responses, because
        // one lookup spans two requests.
        if !self.force {
            if let Some(body) = self.cache.get(CacheKind::Letterboxd, u64::from(tmdb_id)) {
                if let Ok(film) = serde_json::from_slice::<Letterboxd>(&body) {
                    if film.slug.is_some() {
                        debug!(tmdb_id, "using cached film");
                        return Ok(film);
                    }
                }
            }
        }

        let slug = self.resolve_slug(tmdb_id).await?;
        let detail = self.fetch_detail(&slug).await?;

        let film = Letterboxd {
            slug: Some(slug),
            uid: detail.id,
            lid: detail.lid,
        };
        if let Ok(body) = serde_json::to_vec(&film) {
            self.cache.put(CacheKind::Letterboxd, u64::from(tmdb_id), &body);
        }
        Ok(film)
    }
}

/// Extract the film slug from a redirect target, which may be absolute
/// (`https://letterboxd.com/film/akira/`) or site-relative
/// (`/film/akira/`).
fn parse_film_slug(location: &str) -> Result<String, FetchError> {
    let path = location
        .strip_prefix(LETTERBOXD_BASE)
        .unwrap_or(location);
    let slug = path
        .strip_prefix("/film/")
        .and_then(|rest| rest.split('/').next())
        .filter(|slug| !slug.is_empty())
        .ok_or_else(|| FetchError::RedirectParse(format!("unexpected redirect target {location:?}")))?;
    Ok(slug.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use mal_enrich_config::Settings;

    #[tokio::test]
    async fn cached_film_is_served_without_a_request() {
        let cache = Arc::new(MemoryCache::new());
        let film = Letterboxd {
            slug: Some("akira".into()),
            uid: Some(51234),
            lid: Some("29Q0".into()),
        };
        cache.put(
            CacheKind::Letterboxd,
            603,
            &serde_json::to_vec(&film).unwrap(),
        );

        let config = RunConfig {
            api_key: String::new(),
            tv_file: None,
            movie_file: None,
            output_file: None,
            force: false,
            no_progress: true,
            settings: Settings::default(),
        };
        let limiter = Arc::new(RateLimiter::new(100, Duration::from_secs(60)));
        let client = LetterboxdClient::new(&config, limiter, cache).unwrap();

        assert_eq!(client.film(603).await.unwrap(), film);
    }

    #[test]
    fn parses_relative_redirect() {
        assert_eq!(parse_film_slug("/film/akira/").unwrap(), "akira");
    }

    #[test]
    fn parses_absolute_redirect() {
        assert_eq!(
            parse_film_slug("https://letterboxd.com/film/perfect-blue/").unwrap(),
            "perfect-blue"
        );
    }

    #[test]
    fn parses_redirect_without_trailing_slash() {
        assert_eq!(parse_film_slug("/film/paprika-2006").unwrap(), "paprika-2006");
    }

    #[test]
    fn rejects_non_film_redirect() {
        assert!(matches!(
            parse_film_slug("/search/akira/"),
            Err(FetchError::RedirectParse(_))
        ));
        assert!(matches!(
            parse_film_slug("/film//"),
            Err(FetchError::RedirectParse(_))
        ));
    }
}
