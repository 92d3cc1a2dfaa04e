use std::collections::HashMap;

use serde::Deserialize;
use uuid::Uuid;

/// `GET /statistics/manga/:id` keys the payload by the queried id.
#[derive(Debug, Clone, Deserialize)]
pub struct MangaStatistics {
    pub result: String,
    #[serde(default)]
    pub statistics: HashMap<Uuid, MangaStatisticsEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MangaStatisticsEntry {
    #[serde(default)]
    pub rating: Rating,
    #[serde(default)]
    pub follows: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Rating {
    #[serde(default)]
    pub average: Option<f64>,
    #[serde(default)]
    pub bayesian: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChapterStatistics {
    pub result: String,
    #[serde(default)]
    pub statistics: HashMap<Uuid, ChapterStatisticsEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChapterStatisticsEntry {
    #[serde(default)]
    pub comments: Option<CommentThread>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThread {
    pub thread_id: u64,
    pub replies_count: u64,
}

impl MangaStatistics {
    pub fn entry(&self, manga_id: Uuid) -> Option<&MangaStatisticsEntry> {
        self.statistics.get(&manga_id)
    }
}
