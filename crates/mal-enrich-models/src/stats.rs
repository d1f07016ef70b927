use crate::input::MediaKind;
use serde::{Deserialize, Serialize};

/// Per-record change classification for one run. Exactly one bucket is
/// reported per processed record; Modified takes precedence over
/// Created/Updated when an override changed the final record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    Created,
    Updated,
    Modified,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDetail {
    pub mal_id: u64,
    pub title: String,
    pub reason: String,
}

/// Summary of one batch run, consumed by the CLI reporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub media_type: MediaKind,
    pub total_before: usize,
    pub total_after: usize,
    pub created_details: Vec<ChangeDetail>,
    pub updated_details: Vec<ChangeDetail>,
    pub modified_details: Vec<ChangeDetail>,
    pub not_found_details: Vec<ChangeDetail>,
}

impl RunStats {
    pub fn new(media_type: MediaKind, total_before: usize) -> Self {
        Self {
            media_type,
            total_before,
            total_after: 0,
            created_details: Vec::new(),
            updated_details: Vec::new(),
            modified_details: Vec::new(),
            not_found_details: Vec::new(),
        }
    }

    pub fn record(&mut self, change: Change, mal_id: u64, title: &str, reason: &str) {
        let detail = ChangeDetail {
            mal_id,
            title: title.to_string(),
            reason: reason.to_string(),
        };
        match change {
            Change::Created => self.created_details.push(detail),
            Change::Updated => self.updated_details.push(detail),
            Change::Modified => self.modified_details.push(detail),
            Change::NotFound => self.not_found_details.push(detail),
        }
    }

    pub fn created(&self) -> usize {
        self.created_details.len()
    }

    pub fn updated(&self) -> usize {
        self.updated_details.len()
    }

    pub fn modified(&self) -> usize {
        self.modified_details.len()
    }

    pub fn not_found(&self) -> usize {
        self.not_found_details.len()
    }
}
