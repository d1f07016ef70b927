use crate::externals::{MovieExternals, SeasonExternals, ShowExternals};
use serde::{Deserialize, Serialize};

/// The MAL side of an output record: the source primary key and the
/// title it carried in the input list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub title: String,
    pub id: u64,
}

/// Canonical Trakt block of a show output record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowEntry {
    pub title: String,
    pub id: u64,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub season: Option<SeasonEntry>,
    pub is_split_cour: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonEntry {
    pub id: u64,
    pub number: u32,
    pub externals: Option<SeasonExternals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieEntry {
    pub title: String,
    pub id: u64,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Durable, persisted show record: source title/id plus the (possibly
/// overridden) canonical entity. One per source key; never deleted
/// automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputShow {
    pub myanimelist: SourceEntry,
    pub trakt: ShowEntry,
    pub release_year: Option<u32>,
    pub externals: Option<ShowExternals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputMovie {
    pub myanimelist: SourceEntry,
    pub trakt: MovieEntry,
    pub release_year: Option<u32>,
    pub externals: Option<MovieExternals>,
}

impl OutputShow {
    pub fn mal_id(&self) -> u64 {
        self.myanimelist.id
    }
}

impl OutputMovie {
    pub fn mal_id(&self) -> u64 {
        self.myanimelist.id
    }
}
