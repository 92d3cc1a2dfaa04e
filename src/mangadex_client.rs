use std::time::Duration;

use log::debug;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::configuration::Settings;
use crate::mangadex::author::{Author, Cover, ScanlationGroup};
use crate::mangadex::tracking::{
    ReadMarkers, ReadMarkersUpdate, ReadingHistory, ReadingStatusEnvelope, ReadingStatusUpdate,
};
use crate::mangadex::{
    AtHome, Chapter, ChapterStatistics, Entity, HistoryEntry, Manga, MangaAggregate,
    MangaStatistics, MangaStatus, Paginated, ReadingStatus, ResultEnvelope, Tag,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0} from {1}")]
    Status(StatusCode, Url),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Catalog listing parameters. Anything left unset falls back to the fixed
/// defaults the browser always sends (cover/author/artist includes,
/// safe+suggestive content rating, most-followed first).
#[derive(Debug, Clone, Default)]
pub struct MangaListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
    pub title: Option<String>,
    pub authors: Vec<Uuid>,
    pub artists: Vec<Uuid>,
    pub year: Option<i32>,
    pub included_tags: Vec<Uuid>,
    pub excluded_tags: Vec<Uuid>,
    pub status: Vec<MangaStatus>,
    pub order: Vec<(String, SortDirection)>,
}

impl MangaListQuery {
    pub fn ordered_by(field: &str, direction: SortDirection) -> Self {
        Self {
            order: vec![(field.to_string(), direction)],
            ..Self::default()
        }
    }

    fn to_pairs(&self, default_limit: u32) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("limit".into(), self.limit.unwrap_or(default_limit).to_string()),
            ("offset".into(), self.offset.to_string()),
        ];
        if let Some(title) = &self.title {
            pairs.push(("title".into(), title.clone()));
        }
        for id in &self.authors {
            pairs.push(("authors[]".into(), id.to_string()));
        }
        for id in &self.artists {
            pairs.push(("artists[]".into(), id.to_string()));
        }
        if let Some(year) = self.year {
            pairs.push(("year".into(), year.to_string()));
        }
        for id in &self.included_tags {
            pairs.push(("includedTags[]".into(), id.to_string()));
        }
        for id in &self.excluded_tags {
            pairs.push(("excludedTags[]".into(), id.to_string()));
        }
        for status in &self.status {
            pairs.push(("status[]".into(), status.as_str().into()));
        }
        if self.order.is_empty() {
            pairs.push(("order[followedCount]".into(), "desc".into()));
        } else {
            for (field, direction) in &self.order {
                pairs.push((format!("order[{field}]"), direction.as_str().into()));
            }
        }
        for include in ["cover_art", "author", "artist"] {
            pairs.push(("includes[]".into(), include.into()));
        }
        push_content_rating(&mut pairs);
        pairs
    }
}

/// Chapter feed parameters; defaults come from the client configuration
/// (translated language, feed page size) plus `order[chapter]=desc`, which
/// makes index 0 the newest chapter.
#[derive(Debug, Clone, Default)]
pub struct ChapterQuery {
    pub limit: Option<u32>,
    pub offset: u32,
    pub translated_language: Option<String>,
    pub order: Vec<(String, SortDirection)>,
}

impl ChapterQuery {
    fn to_pairs(&self, default_limit: u32, default_language: &str) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("limit".into(), self.limit.unwrap_or(default_limit).to_string()),
            ("offset".into(), self.offset.to_string()),
            (
                "translatedLanguage[]".into(),
                self.translated_language
                    .clone()
                    .unwrap_or_else(|| default_language.into()),
            ),
        ];
        if self.order.is_empty() {
            pairs.push(("order[chapter]".into(), "desc".into()));
        } else {
            for (field, direction) in &self.order {
                pairs.push((format!("order[{field}]"), direction.as_str().into()));
            }
        }
        pairs.push(("includes[]".into(), "scanlation_group".into()));
        pairs
    }
}

/// Shared offset/name parameters for the author, group and cover listings.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
    pub name: Option<String>,
}

impl ListQuery {
    fn to_pairs(&self, default_limit: u32) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("limit".into(), self.limit.unwrap_or(default_limit).to_string()),
            ("offset".into(), self.offset.to_string()),
        ];
        if let Some(name) = &self.name {
            pairs.push(("name".into(), name.clone()));
        }
        pairs
    }
}

fn push_content_rating(pairs: &mut Vec<(String, String)>) {
    pairs.push(("contentRating[]".into(), "safe".into()));
    pairs.push(("contentRating[]".into(), "suggestive".into()));
}

fn default_includes() -> Vec<(String, String)> {
    ["cover_art", "author", "artist"]
        .into_iter()
        .map(|include| ("includes[]".to_string(), include.to_string()))
        .collect()
}

/// Typed adapter over the catalog API. Applies the browser's default query
/// parameters and decodes into the `mangadex` wire types. No retries, no
/// caching; a non-2xx response or transport failure surfaces as `ApiError`.
pub struct MangaDexClient {
    http: reqwest::Client,
    api_url: Url,
    uploads_url: Url,
    language: String,
    catalog_limit: u32,
    feed_limit: u32,
}

impl MangaDexClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_url: Url::parse(&settings.api_url)?,
            uploads_url: Url::parse(&settings.uploads_url)?,
            language: settings.language.clone(),
            catalog_limit: settings.catalog_limit,
            feed_limit: settings.feed_limit,
        })
    }

    pub fn catalog_limit(&self) -> u32 {
        self.catalog_limit
    }

    pub fn cover_url(&self, manga: &Manga) -> Option<Url> {
        manga.cover_url(&self.uploads_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ApiError> {
        let url = self.api_url.join(path)?;
        debug!("GET {url} {query:?}");
        let response = self.http.get(url.clone()).query(query).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status(), url));
        }
        Ok(response.json().await?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.api_url.join(path)?;
        debug!("POST {url}");
        let response = self.http.post(url.clone()).json(body).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status(), url));
        }
        Ok(response.json().await?)
    }

    pub async fn list_manga(&self, query: &MangaListQuery) -> Result<Paginated<Manga>, ApiError> {
        self.get_json("/manga", &query.to_pairs(self.catalog_limit))
            .await
    }

    /// The lighter search call: title match, cover include only.
    pub async fn search_manga(&self, title: &str) -> Result<Paginated<Manga>, ApiError> {
        let mut pairs = vec![
            ("title".to_string(), title.to_string()),
            ("limit".to_string(), self.catalog_limit.to_string()),
            ("includes[]".to_string(), "cover_art".to_string()),
        ];
        push_content_rating(&mut pairs);
        self.get_json("/manga", &pairs).await
    }

    pub async fn get_manga(&self, id: Uuid) -> Result<Manga, ApiError> {
        let entity: Entity<Manga> = self
            .get_json(&format!("/manga/{id}"), &default_includes())
            .await?;
        Ok(entity.data)
    }

    pub async fn random_manga(&self) -> Result<Manga, ApiError> {
        let entity: Entity<Manga> = self.get_json("/manga/random", &default_includes()).await?;
        Ok(entity.data)
    }

    pub async fn manga_aggregate(&self, id: Uuid) -> Result<MangaAggregate, ApiError> {
        self.get_json(&format!("/manga/{id}/aggregate"), &[]).await
    }

    pub async fn manga_feed(
        &self,
        id: Uuid,
        query: &ChapterQuery,
    ) -> Result<Paginated<Chapter>, ApiError> {
        self.get_json(
            &format!("/manga/{id}/feed"),
            &query.to_pairs(self.feed_limit, &self.language),
        )
        .await
    }

    /// Manga-scoped `GET /chapter`, the listing both reader surfaces use.
    pub async fn manga_chapters(
        &self,
        manga_id: Uuid,
        query: &ChapterQuery,
    ) -> Result<Paginated<Chapter>, ApiError> {
        let mut pairs = query.to_pairs(self.feed_limit, &self.language);
        pairs.push(("manga".into(), manga_id.to_string()));
        self.get_json("/chapter", &pairs).await
    }

    pub async fn chapter_pages(&self, chapter_id: Uuid) -> Result<AtHome, ApiError> {
        self.get_json(&format!("/at-home/server/{chapter_id}"), &[])
            .await
    }

    pub async fn list_authors(&self, query: &ListQuery) -> Result<Paginated<Author>, ApiError> {
        self.get_json("/author", &query.to_pairs(self.catalog_limit))
            .await
    }

    pub async fn get_author(&self, id: Uuid) -> Result<Author, ApiError> {
        let entity: Entity<Author> = self.get_json(&format!("/author/{id}"), &[]).await?;
        Ok(entity.data)
    }

    pub async fn list_covers(
        &self,
        manga_ids: &[Uuid],
        query: &ListQuery,
    ) -> Result<Paginated<Cover>, ApiError> {
        let mut pairs = query.to_pairs(self.catalog_limit);
        for id in manga_ids {
            pairs.push(("manga[]".into(), id.to_string()));
        }
        self.get_json("/cover", &pairs).await
    }

    pub async fn list_groups(
        &self,
        query: &ListQuery,
    ) -> Result<Paginated<ScanlationGroup>, ApiError> {
        self.get_json("/group", &query.to_pairs(self.catalog_limit))
            .await
    }

    pub async fn get_group(&self, id: Uuid) -> Result<ScanlationGroup, ApiError> {
        let entity: Entity<ScanlationGroup> = self.get_json(&format!("/group/{id}"), &[]).await?;
        Ok(entity.data)
    }

    pub async fn manga_statistics(&self, id: Uuid) -> Result<MangaStatistics, ApiError> {
        self.get_json(&format!("/statistics/manga/{id}"), &[]).await
    }

    pub async fn chapter_statistics(&self, id: Uuid) -> Result<ChapterStatistics, ApiError> {
        self.get_json(&format!("/statistics/chapter/{id}"), &[])
            .await
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        let page: Paginated<Tag> = self.get_json("/manga/tag", &[]).await?;
        Ok(page.data)
    }

    pub async fn reading_status(&self, manga_id: Uuid) -> Result<Option<ReadingStatus>, ApiError> {
        let envelope: ReadingStatusEnvelope = self
            .get_json(&format!("/manga/{manga_id}/status"), &[])
            .await?;
        Ok(envelope.status)
    }

    pub async fn update_reading_status(
        &self,
        manga_id: Uuid,
        status: ReadingStatus,
    ) -> Result<(), ApiError> {
        let _: ResultEnvelope = self
            .post_json(
                &format!("/manga/{manga_id}/status"),
                &ReadingStatusUpdate { status },
            )
            .await?;
        Ok(())
    }

    pub async fn read_markers(&self, manga_id: Uuid) -> Result<Vec<Uuid>, ApiError> {
        let markers: ReadMarkers = self
            .get_json(&format!("/manga/{manga_id}/read"), &[])
            .await?;
        Ok(markers.data)
    }

    pub async fn mark_chapters_read(
        &self,
        manga_id: Uuid,
        chapter_ids: Vec<Uuid>,
    ) -> Result<(), ApiError> {
        let _: ResultEnvelope = self
            .post_json(
                &format!("/manga/{manga_id}/read"),
                &ReadMarkersUpdate { chapter_ids },
            )
            .await?;
        Ok(())
    }

    pub async fn reading_history(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<HistoryEntry>, ApiError> {
        let history: ReadingHistory = self
            .get_json(
                "/user/history",
                &[
                    ("limit".into(), limit.to_string()),
                    ("offset".into(), offset.to_string()),
                ],
            )
            .await?;
        Ok(history.ratings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(String, String)], key: &str) -> Vec<String> {
        pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    #[test]
    fn manga_query_applies_fixed_defaults() {
        let pairs = MangaListQuery::default().to_pairs(20);

        assert_eq!(values(&pairs, "limit"), vec!["20"]);
        assert_eq!(values(&pairs, "offset"), vec!["0"]);
        assert_eq!(values(&pairs, "order[followedCount]"), vec!["desc"]);
        assert_eq!(
            values(&pairs, "includes[]"),
            vec!["cover_art", "author", "artist"]
        );
        assert_eq!(values(&pairs, "contentRating[]"), vec!["safe", "suggestive"]);
        assert!(values(&pairs, "title").is_empty());
    }

    #[test]
    fn manga_query_flattens_filters_and_order() {
        let author: Uuid = "b77668ed-0810-4327-9684-46ca371e370e".parse().unwrap();
        let query = MangaListQuery {
            limit: Some(5),
            offset: 40,
            title: Some("yuru".into()),
            authors: vec![author],
            year: Some(2015),
            status: vec![MangaStatus::Ongoing, MangaStatus::Hiatus],
            order: vec![("latestUploadedChapter".into(), SortDirection::Descending)],
            ..MangaListQuery::default()
        };
        let pairs = query.to_pairs(20);

        assert_eq!(values(&pairs, "limit"), vec!["5"]);
        assert_eq!(values(&pairs, "offset"), vec!["40"]);
        assert_eq!(values(&pairs, "title"), vec!["yuru"]);
        assert_eq!(values(&pairs, "authors[]"), vec![author.to_string()]);
        assert_eq!(values(&pairs, "year"), vec!["2015"]);
        assert_eq!(values(&pairs, "status[]"), vec!["ongoing", "hiatus"]);
        assert_eq!(values(&pairs, "order[latestUploadedChapter]"), vec!["desc"]);
        assert!(values(&pairs, "order[followedCount]").is_empty());
    }

    #[test]
    fn chapter_query_defaults_to_newest_first() {
        let pairs = ChapterQuery::default().to_pairs(100, "en");

        assert_eq!(values(&pairs, "limit"), vec!["100"]);
        assert_eq!(values(&pairs, "translatedLanguage[]"), vec!["en"]);
        assert_eq!(values(&pairs, "order[chapter]"), vec!["desc"]);
        assert_eq!(values(&pairs, "includes[]"), vec!["scanlation_group"]);
    }

    #[test]
    fn chapter_query_overrides_replace_defaults() {
        let query = ChapterQuery {
            limit: Some(10),
            offset: 30,
            translated_language: Some("pt-br".into()),
            order: vec![("publishAt".into(), SortDirection::Ascending)],
        };
        let pairs = query.to_pairs(100, "en");

        assert_eq!(values(&pairs, "translatedLanguage[]"), vec!["pt-br"]);
        assert_eq!(values(&pairs, "order[publishAt]"), vec!["asc"]);
        assert!(values(&pairs, "order[chapter]").is_empty());
    }
}
