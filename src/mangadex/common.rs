use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Paged response envelope shared by the list endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Paginated<T> {
    pub result: String,
    pub data: Vec<T>,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub total: u32,
}

/// Single-record envelope, e.g. `GET /manga/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct Entity<T> {
    pub result: String,
    pub data: T,
}

/// Bare `{"result": "ok"}` acknowledgement returned by the POST endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultEnvelope {
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Author,
    Artist,
    CoverArt,
    ScanlationGroup,
    Manga,
    User,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Relationship {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
    #[serde(default)]
    pub attributes: Option<RelationshipAttributes>,
}

/// Attributes only present when the relationship was expanded via `includes[]`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipAttributes {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_relationship_kinds_do_not_fail_decoding() {
        let rel: Relationship = serde_json::from_value(json!({
            "id": "b77668ed-0810-4327-9684-46ca371e370e",
            "type": "creator"
        }))
        .unwrap();
        assert_eq!(rel.kind, RelationshipKind::Other);
        assert!(rel.attributes.is_none());
    }

    #[test]
    fn expanded_cover_art_carries_its_filename() {
        let rel: Relationship = serde_json::from_value(json!({
            "id": "69060a67-1d4e-4110-9d29-838bfd99917f",
            "type": "cover_art",
            "attributes": {"fileName": "cover.jpg"}
        }))
        .unwrap();
        assert_eq!(rel.kind, RelationshipKind::CoverArt);
        assert_eq!(
            rel.attributes.unwrap().file_name.as_deref(),
            Some("cover.jpg")
        );
    }
}
