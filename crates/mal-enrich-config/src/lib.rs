pub mod config;
pub mod paths;

pub use config::{RetrySettings, RunConfig, ServiceLimits, Settings};
pub use paths::{default_output_file, not_found_file, overrides_file, PathManager};
