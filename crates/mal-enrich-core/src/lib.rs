pub mod overrides;
pub mod reconcile;
pub mod store;

pub use overrides::{apply_movie_override, apply_show_override};
pub use reconcile::{reconcile_movies, reconcile_shows, ReconcileOutcome};
pub use store::{load_json, load_json_optional, save_json};
