use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::common::{Relationship, RelationshipKind};
use super::locale::LocalizedText;

/// Read-only projection of a catalog entry; immutable once fetched.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Manga {
    pub id: Uuid,
    pub attributes: MangaAttributes,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MangaAttributes {
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub alt_titles: Vec<LocalizedText>,
    #[serde(default)]
    pub description: LocalizedText,
    pub status: MangaStatus,
    #[serde(default)]
    pub year: Option<i32>,
    pub content_rating: ContentRating,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub last_volume: Option<String>,
    #[serde(default)]
    pub last_chapter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MangaStatus {
    Ongoing,
    Completed,
    Hiatus,
    Cancelled,
}

impl MangaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MangaStatus::Ongoing => "ongoing",
            MangaStatus::Completed => "completed",
            MangaStatus::Hiatus => "hiatus",
            MangaStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRating {
    Safe,
    Suggestive,
    Erotica,
    Pornographic,
}

impl ContentRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentRating::Safe => "safe",
            ContentRating::Suggestive => "suggestive",
            ContentRating::Erotica => "erotica",
            ContentRating::Pornographic => "pornographic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Tag {
    pub id: Uuid,
    pub attributes: TagAttributes,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TagAttributes {
    #[serde(default)]
    pub name: LocalizedText,
    #[serde(default)]
    pub group: Option<String>,
}

impl Manga {
    pub fn title(&self) -> &str {
        self.attributes.title.preferred().unwrap_or("Unknown Title")
    }

    /// Cover image URL derived from the expanded cover-art relationship:
    /// `{uploads}/covers/{mangaId}/{fileName}`. `None` when the cover art was
    /// not included or carries no filename.
    pub fn cover_url(&self, uploads_url: &Url) -> Option<Url> {
        let file_name = self
            .relationships
            .iter()
            .find(|r| r.kind == RelationshipKind::CoverArt)
            .and_then(|r| r.attributes.as_ref())
            .and_then(|a| a.file_name.as_deref())?;
        uploads_url
            .join(&format!("/covers/{}/{}", self.id, file_name))
            .ok()
    }

    pub fn credits(&self, kind: RelationshipKind) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().filter(move |r| r.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Manga {
        serde_json::from_value(json!({
            "id": "69060a67-1d4e-4110-9d29-838bfd99917f",
            "type": "manga",
            "attributes": {
                "title": {"en": "Bloom Into You"},
                "altTitles": [{"ja": "やがて君になる"}],
                "description": {"en": "A story."},
                "status": "completed",
                "year": 2015,
                "contentRating": "safe",
                "tags": [{
                    "id": "423e2eae-a7a2-4a8b-ac03-a8351462d71d",
                    "type": "tag",
                    "attributes": {"name": {"en": "Romance"}, "group": "genre"}
                }],
                "originalLanguage": "ja",
                "lastVolume": "8",
                "lastChapter": "45"
            },
            "relationships": [
                {"id": "b77668ed-0810-4327-9684-46ca371e370e", "type": "author"},
                {
                    "id": "dc2aa700-0000-4000-8000-000000000000",
                    "type": "cover_art",
                    "attributes": {"fileName": "cover.jpg"}
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn decodes_wire_shape() {
        let manga = sample();
        assert_eq!(manga.title(), "Bloom Into You");
        assert_eq!(manga.attributes.status, MangaStatus::Completed);
        assert_eq!(manga.attributes.content_rating, ContentRating::Safe);
        assert_eq!(manga.attributes.year, Some(2015));
        assert_eq!(manga.attributes.tags[0].attributes.name.preferred(), Some("Romance"));
    }

    #[test]
    fn cover_url_is_derived_from_the_cover_art_relationship() {
        let manga = sample();
        let uploads = Url::parse("https://uploads.mangadex.org").unwrap();
        let cover = manga.cover_url(&uploads).unwrap();
        assert_eq!(
            cover.as_str(),
            "https://uploads.mangadex.org/covers/69060a67-1d4e-4110-9d29-838bfd99917f/cover.jpg"
        );
    }

    #[test]
    fn cover_url_is_none_without_an_expanded_cover() {
        let mut manga = sample();
        manga.relationships.retain(|r| r.kind != RelationshipKind::CoverArt);
        let uploads = Url::parse("https://uploads.mangadex.org").unwrap();
        assert!(manga.cover_url(&uploads).is_none());
    }
}
