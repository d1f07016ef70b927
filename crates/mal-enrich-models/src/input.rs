use serde::{Deserialize, Serialize};

/// Which input batch a record belongs to. Drives output/override/ledger
/// file naming and the summary headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Tv,
    Movies,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Tv => "tv",
            MediaKind::Movies => "movies",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One show entry from the MAL-sourced input list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputShow {
    pub title: String,
    pub mal_id: u64,
    pub trakt_id: u64,
    #[serde(default)]
    pub guessed_slug: String,
    pub season: u32,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// One movie entry from the MAL-sourced input list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMovie {
    pub title: String,
    pub mal_id: u64,
    pub trakt_id: u64,
    #[serde(default)]
    pub guessed_slug: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}
