use serde::{Deserialize, Serialize};

/// Cross-reference identifiers attached to a show. Every field is
/// independently nullable; absence means "unknown", not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowExternals {
    pub tvdb: Option<u32>,
    pub tmdb: Option<u32>,
    pub imdb: Option<String>,
    pub tvrage: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonExternals {
    pub tvdb: Option<u32>,
    pub tmdb: Option<u32>,
    pub tvrage: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieExternals {
    pub tmdb: Option<u32>,
    pub imdb: Option<String>,
    pub letterboxd: Option<Letterboxd>,
}

/// Letterboxd identifiers resolved through the redirect + JSON detail
/// protocol. `uid` is Letterboxd's numeric film id, `lid` the short id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letterboxd {
    pub slug: Option<String>,
    pub uid: Option<u64>,
    pub lid: Option<String>,
}
