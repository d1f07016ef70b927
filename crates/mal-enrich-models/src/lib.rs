pub mod externals;
pub mod input;
pub mod not_found;
pub mod output;
pub mod overrides;
pub mod stats;
pub mod trakt;

pub use externals::{Letterboxd, MovieExternals, SeasonExternals, ShowExternals};
pub use input::{InputMovie, InputShow, MediaKind};
pub use not_found::NotFoundEntry;
pub use output::{MovieEntry, OutputMovie, OutputShow, SeasonEntry, ShowEntry, SourceEntry};
pub use overrides::{CanonicalPatch, ExternalsPatch, OverrideEntry, OverrideSet};
pub use stats::{Change, ChangeDetail, RunStats};
pub use trakt::{
    TraktMovie, TraktMovieIds, TraktSeason, TraktSeasonIds, TraktShow, TraktShowIds,
};
