use serde::{Deserialize, Serialize};

/// Canonical show record as returned by `GET /shows/{id}`. Immutable
/// snapshot of a single fetch; also the cache payload shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraktShow {
    pub title: String,
    pub year: Option<u32>,
    pub ids: TraktShowIds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraktShowIds {
    pub trakt: u64,
    pub slug: String,
    #[serde(default)]
    pub tvdb: Option<u32>,
    #[serde(default)]
    pub imdb: Option<String>,
    #[serde(default)]
    pub tmdb: Option<u32>,
}

/// Canonical movie record as returned by `GET /movies/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraktMovie {
    pub title: String,
    pub year: Option<u32>,
    pub ids: TraktMovieIds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraktMovieIds {
    pub trakt: u64,
    pub slug: String,
    #[serde(default)]
    pub imdb: Option<String>,
    #[serde(default)]
    pub tmdb: Option<u32>,
}

/// One entry of the season list returned by `GET /shows/{id}/seasons`.
/// The endpoint returns the whole list; callers scan for a season number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraktSeason {
    pub number: u32,
    pub ids: TraktSeasonIds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraktSeasonIds {
    pub trakt: u64,
    #[serde(default)]
    pub tvdb: Option<u32>,
    #[serde(default)]
    pub tmdb: Option<u32>,
    #[serde(default)]
    pub tvrage: Option<u32>,
}
