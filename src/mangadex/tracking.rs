use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    Reading,
    OnHold,
    PlanToRead,
    Dropped,
    ReReading,
    Completed,
}

/// `GET /manga/:id/status`; `status` is null when the user never set one.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadingStatusEnvelope {
    pub result: String,
    #[serde(default)]
    pub status: Option<ReadingStatus>,
}

#[derive(Debug, Serialize)]
pub struct ReadingStatusUpdate {
    pub status: ReadingStatus,
}

/// `GET /manga/:id/read`, a flat list of read chapter ids.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadMarkers {
    pub result: String,
    #[serde(default)]
    pub data: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadMarkersUpdate {
    pub chapter_ids: Vec<Uuid>,
}

/// `GET /user/history` entries.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadingHistory {
    pub result: String,
    #[serde(default)]
    pub ratings: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub chapter_id: Uuid,
    pub read_date: DateTime<Utc>,
}
