use super::image::GeneratedImage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub prompt: String,
    pub image: GeneratedImage,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Creates an entry with a fresh v4 identifier.
    pub fn new(prompt: impl Into<String>, image: GeneratedImage) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            image,
            created_at: Utc::now(),
        }
    }
}

/// Oldest first.
pub type HistoryLog = Vec<HistoryEntry>;
