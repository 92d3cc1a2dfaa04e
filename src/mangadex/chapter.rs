use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{Relationship, RelationshipKind};

/// One installment of a manga. The chapter feed returns these newest first
/// when ordered by chapter number descending, so index 0 is the most recent.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Chapter {
    pub id: Uuid,
    pub attributes: ChapterAttributes,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterAttributes {
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub chapter: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub translated_language: String,
    #[serde(default)]
    pub pages: u32,
    pub publish_at: DateTime<Utc>,
}

impl Chapter {
    /// Human-readable label, e.g. `v3c21 - The Last Stop`.
    pub fn label(&self) -> String {
        let attrs = &self.attributes;
        let volume = attrs.volume.as_deref().unwrap_or("U");
        let chapter = attrs.chapter.as_deref().unwrap_or("U");
        match attrs.title.as_deref() {
            Some(title) if !title.is_empty() => format!("v{volume}c{chapter} - {title}"),
            _ => format!("v{volume}c{chapter}"),
        }
    }

    pub fn scanlation_group(&self) -> Option<&Relationship> {
        self.relationships
            .iter()
            .find(|r| r.kind == RelationshipKind::ScanlationGroup)
    }
}

/// Volume/chapter summary from `GET /manga/:id/aggregate`.
#[derive(Debug, Clone, Deserialize)]
pub struct MangaAggregate {
    pub result: String,
    #[serde(default)]
    pub volumes: BTreeMap<String, AggregateVolume>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregateVolume {
    pub volume: String,
    pub count: u32,
    #[serde(default)]
    pub chapters: BTreeMap<String, AggregateChapter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregateChapter {
    pub chapter: String,
    pub id: Uuid,
    #[serde(default)]
    pub others: Vec<Uuid>,
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn label_falls_back_to_u_for_missing_numbers() {
        let chapter: Chapter = serde_json::from_value(json!({
            "id": "f9f62aaa-0000-4000-8000-000000000000",
            "type": "chapter",
            "attributes": {
                "volume": null,
                "chapter": "12.5",
                "title": null,
                "translatedLanguage": "en",
                "pages": 18,
                "publishAt": "2021-05-24T17:02:37+00:00"
            },
            "relationships": []
        }))
        .unwrap();
        assert_eq!(chapter.label(), "vUc12.5");
        assert_eq!(chapter.attributes.pages, 18);
    }

    #[test]
    fn aggregate_decodes_nested_volume_map() {
        let aggregate: MangaAggregate = serde_json::from_value(json!({
            "result": "ok",
            "volumes": {
                "1": {
                    "volume": "1",
                    "count": 2,
                    "chapters": {
                        "1": {
                            "chapter": "1",
                            "id": "f9f62aaa-0000-4000-8000-000000000001",
                            "others": [],
                            "count": 1
                        }
                    }
                }
            }
        }))
        .unwrap();
        assert_eq!(aggregate.volumes["1"].chapters["1"].chapter, "1");
    }
}
