pub mod cache;
pub mod error;
pub mod letterboxd;
pub mod ratelimit;
pub mod retry;
pub mod traits;
pub mod trakt;

pub use cache::{CacheKind, FsCache, MemoryCache, ResponseCache};
pub use error::FetchError;
pub use letterboxd::LetterboxdClient;
pub use ratelimit::RateLimiter;
pub use retry::{retry_with_backoff, RetryPolicy};
pub use traits::{FilmIndex, MovieCatalog, ShowCatalog};
pub use trakt::TraktClient;
