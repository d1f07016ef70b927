pub mod clear;
pub mod enrich;
pub mod prompts;
pub mod summary;
